//! Connector recommendations
//!
//! For every unordered pair of skills a learner holds, look up the connections
//! bridging that pair and suggest each connector the learner has not acquired
//! yet. Pairs are visited in acquisition order (outer `i`, inner `j > i`),
//! matches within a pair in connection id order, and a connector reported for
//! an earlier pair is not repeated for a later one.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::skills::{
    CatalogSnapshot, Skill, SkillCategory, SkillConnection, SkillId, SkillStore, UserId, pair_key,
};

/// A connector skill implied by two acquired base skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: SkillId,
    pub name: String,
    pub category: SkillCategory,
    pub description: String,
    pub learning_resources: String,
    /// Names of the two base skills, in the connection's defined direction
    pub connects: [String; 2],
}

impl Recommendation {
    fn new(connector: &Skill, first: &Skill, second: &Skill) -> Self {
        Self {
            id: connector.id,
            name: connector.name.clone(),
            category: connector.category.clone(),
            description: connector.description.clone(),
            learning_resources: connector.learning_resources.clone(),
            connects: [first.name.clone(), second.name.clone()],
        }
    }
}

/// Connections indexed by their unordered base pair
struct ConnectionIndex<'a> {
    by_pair: HashMap<(SkillId, SkillId), Vec<&'a SkillConnection>>,
}

impl<'a> ConnectionIndex<'a> {
    fn new(connections: &'a [SkillConnection]) -> Self {
        let mut by_pair: HashMap<(SkillId, SkillId), Vec<&'a SkillConnection>> = HashMap::new();
        for connection in connections {
            by_pair.entry(connection.base_pair()).or_default().push(connection);
        }
        for bucket in by_pair.values_mut() {
            bucket.sort_by_key(|c| c.id);
        }
        Self { by_pair }
    }

    fn between(&self, a: SkillId, b: SkillId) -> &[&'a SkillConnection] {
        self.by_pair
            .get(&pair_key(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Compute deduplicated connector recommendations for the snapshot's learner
pub fn recommend(snapshot: &CatalogSnapshot) -> Vec<Recommendation> {
    let acquired: Vec<SkillId> = snapshot.acquired.iter().map(|a| a.skill.id).collect();
    if acquired.len() < 2 {
        return Vec::new();
    }

    let held: HashSet<SkillId> = acquired.iter().copied().collect();
    let catalog: HashMap<SkillId, &Skill> = snapshot.catalog.iter().map(|s| (s.id, s)).collect();
    let index = ConnectionIndex::new(&snapshot.connections);

    let mut seen: HashSet<SkillId> = HashSet::new();
    let mut recommendations = Vec::new();

    for (i, &a) in acquired.iter().enumerate() {
        for &b in &acquired[i + 1..] {
            for connection in index.between(a, b) {
                let connector_id = connection.connector_skill_id;
                if held.contains(&connector_id) || seen.contains(&connector_id) {
                    continue;
                }

                let (Some(connector), Some(first), Some(second)) = (
                    catalog.get(&connector_id),
                    catalog.get(&connection.skill1_id),
                    catalog.get(&connection.skill2_id),
                ) else {
                    debug!(connection_id = connection.id, "Connection references a missing skill");
                    continue;
                };

                seen.insert(connector_id);
                recommendations.push(Recommendation::new(connector, first, second));
            }
        }
    }

    recommendations
}

/// Load `user`'s snapshot and compute their recommendations
pub async fn recommendations_for(store: &SkillStore, user: UserId) -> Result<Vec<Recommendation>> {
    let snapshot = store.snapshot(user).await?;
    let recommendations = recommend(&snapshot);
    debug!(
        user_id = %user,
        acquired = snapshot.acquired.len(),
        recommendations = recommendations.len(),
        "Computed recommendations"
    );
    Ok(recommendations)
}
