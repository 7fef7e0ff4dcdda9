//! Skill catalog types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog skill identifier (row id)
pub type SkillId = i64;

/// Learner identity threaded through every per-user operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Domain category a skill belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SkillCategory {
    ComputerScience,
    Art,
    Science,
    Business,
    Music,
    /// Skills that bridge two skills from (usually) different domains
    Connector,
    /// Any label outside the known set, kept verbatim
    Other(String),
}

impl SkillCategory {
    /// All known categories, in display order
    pub const KNOWN: [SkillCategory; 6] = [
        SkillCategory::ComputerScience,
        SkillCategory::Art,
        SkillCategory::Science,
        SkillCategory::Business,
        SkillCategory::Music,
        SkillCategory::Connector,
    ];

    /// Convert to string for database storage
    pub fn as_str(&self) -> &str {
        match self {
            SkillCategory::ComputerScience => "Computer Science",
            SkillCategory::Art => "Art",
            SkillCategory::Science => "Science",
            SkillCategory::Business => "Business",
            SkillCategory::Music => "Music",
            SkillCategory::Connector => "Connector",
            SkillCategory::Other(label) => label,
        }
    }

    /// Parse from database string (case-insensitive for known labels)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "computer science" | "computer_science" | "cs" => SkillCategory::ComputerScience,
            "art" => SkillCategory::Art,
            "science" => SkillCategory::Science,
            "business" => SkillCategory::Business,
            "music" => SkillCategory::Music,
            "connector" => SkillCategory::Connector,
            _ => SkillCategory::Other(s.to_string()),
        }
    }

    pub fn is_connector(&self) -> bool {
        matches!(self, SkillCategory::Connector)
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SkillCategory> for String {
    fn from(category: SkillCategory) -> Self {
        category.as_str().to_string()
    }
}

impl From<String> for SkillCategory {
    fn from(s: String) -> Self {
        SkillCategory::parse(&s)
    }
}

/// A catalog entry representing a learnable topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    /// Globally unique name
    pub name: String,
    pub category: SkillCategory,
    pub description: String,
    /// Where to start learning (usually a URL)
    pub learning_resources: String,
}

/// A skill the learner has acquired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquiredSkill {
    #[serde(flatten)]
    pub skill: Skill,
    pub acquired_at: DateTime<Utc>,
}

/// A connector skill bridging two base skills
///
/// The base pair is unordered; `skill1_id`/`skill2_id` keep the direction the
/// connection was defined in, which is the direction reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillConnection {
    pub id: i64,
    pub skill1_id: SkillId,
    pub skill2_id: SkillId,
    pub connector_skill_id: SkillId,
    /// Relationship weight; not used by any computation yet
    pub strength: f64,
}

impl SkillConnection {
    /// The base pair in ascending id order
    pub fn base_pair(&self) -> (SkillId, SkillId) {
        pair_key(self.skill1_id, self.skill2_id)
    }

    /// Whether this connection bridges `a` and `b`, in either direction
    pub fn bridges(&self, a: SkillId, b: SkillId) -> bool {
        self.base_pair() == pair_key(a, b)
    }
}

/// Order-independent key for a pair of skills
pub fn pair_key(a: SkillId, b: SkillId) -> (SkillId, SkillId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog, connections and one learner's acquisitions read in a single
/// transaction
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// All skills, ordered by (category, name)
    pub catalog: Vec<Skill>,
    /// All connections, ordered by id
    pub connections: Vec<SkillConnection>,
    /// The learner's skills in acquisition order
    pub acquired: Vec<AcquiredSkill>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_known_labels() {
        for category in SkillCategory::KNOWN {
            assert_eq!(SkillCategory::parse(category.as_str()), category);
        }
    }

    #[test]
    fn test_category_unknown_label_kept() {
        let category = SkillCategory::parse("Cooking");
        assert_eq!(category, SkillCategory::Other("Cooking".into()));
        assert_eq!(category.as_str(), "Cooking");
        assert!(!category.is_connector());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&SkillCategory::ComputerScience).unwrap();
        assert_eq!(json, "\"Computer Science\"");

        let parsed: SkillCategory = serde_json::from_str("\"connector\"").unwrap();
        assert!(parsed.is_connector());
    }

    #[test]
    fn test_connection_bridges_either_direction() {
        let connection = SkillConnection {
            id: 1,
            skill1_id: 7,
            skill2_id: 3,
            connector_skill_id: 20,
            strength: 1.0,
        };

        assert!(connection.bridges(7, 3));
        assert!(connection.bridges(3, 7));
        assert!(!connection.bridges(7, 20));
        assert_eq!(connection.base_pair(), (3, 7));
    }
}
