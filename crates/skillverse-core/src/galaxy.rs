//! Galaxy view of a learner's skills
//!
//! Nodes are the acquired skills. A link is drawn for every connection whose
//! two base skills and connector are all acquired; the connector only gates
//! the link and labels it, it is not a node of its own. Links are not merged,
//! so two connectors bridging the same pair give two links.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::skills::{CatalogSnapshot, SkillCategory, SkillId, SkillStore, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxyNode {
    pub id: SkillId,
    pub name: String,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxyLink {
    pub source: SkillId,
    pub target: SkillId,
    /// Name of the connector skill that unlocked this link
    pub connector: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalaxyData {
    pub nodes: Vec<GalaxyNode>,
    pub links: Vec<GalaxyLink>,
}

/// Project the snapshot's acquired skills into nodes and connector-gated links
pub fn build_galaxy(snapshot: &CatalogSnapshot) -> GalaxyData {
    let nodes: Vec<GalaxyNode> = snapshot
        .acquired
        .iter()
        .map(|a| GalaxyNode {
            id: a.skill.id,
            name: a.skill.name.clone(),
            category: a.skill.category.clone(),
        })
        .collect();

    let held: HashSet<SkillId> = nodes.iter().map(|n| n.id).collect();
    let names: HashMap<SkillId, &str> = snapshot
        .catalog
        .iter()
        .map(|s| (s.id, s.name.as_str()))
        .collect();

    let links = snapshot
        .connections
        .iter()
        .filter(|c| {
            held.contains(&c.skill1_id)
                && held.contains(&c.skill2_id)
                && held.contains(&c.connector_skill_id)
        })
        .filter_map(|c| {
            names.get(&c.connector_skill_id).map(|connector| GalaxyLink {
                source: c.skill1_id,
                target: c.skill2_id,
                connector: connector.to_string(),
            })
        })
        .collect();

    GalaxyData { nodes, links }
}

/// Load `user`'s snapshot and build their galaxy
pub async fn galaxy_for(store: &SkillStore, user: UserId) -> Result<GalaxyData> {
    let snapshot = store.snapshot(user).await?;
    Ok(build_galaxy(&snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    async fn seeded_with(names: &[&str]) -> (SkillStore, UserId) {
        let db = Database::in_memory().await.expect("Failed to create database");
        let store = SkillStore::new(db.pool().clone());
        let user = store.ensure_user("demo").await.unwrap().id;
        for name in names {
            let skill = store.require_by_name(name).await.unwrap();
            store.add_skill(user, skill.id).await.unwrap();
        }
        (store, user)
    }

    #[tokio::test]
    async fn test_empty_galaxy() {
        let (store, user) = seeded_with(&[]).await;
        assert_eq!(galaxy_for(&store, user).await.unwrap(), GalaxyData::default());
    }

    #[tokio::test]
    async fn test_connector_not_acquired_gates_link() {
        let (store, user) = seeded_with(&["Python", "Digital Painting"]).await;

        let galaxy = galaxy_for(&store, user).await.unwrap();

        let names: Vec<&str> = galaxy.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Digital Painting"]);
        assert!(galaxy.links.is_empty());
    }

    #[tokio::test]
    async fn test_acquired_connector_draws_link() {
        let (store, user) =
            seeded_with(&["Python", "Digital Painting", "AI Art Generation"]).await;
        let python = store.require_by_name("Python").await.unwrap().id;
        let painting = store.require_by_name("Digital Painting").await.unwrap().id;

        let galaxy = galaxy_for(&store, user).await.unwrap();

        assert_eq!(galaxy.nodes.len(), 3);
        assert_eq!(
            galaxy.links,
            vec![GalaxyLink {
                source: python,
                target: painting,
                connector: "AI Art Generation".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_each_connection_row_is_a_link() {
        let (store, user) = seeded_with(&[
            "Python",
            "Digital Painting",
            "AI Art Generation",
            "Creative Coding",
        ])
        .await;

        let galaxy = galaxy_for(&store, user).await.unwrap();

        let connectors: Vec<&str> = galaxy.links.iter().map(|l| l.connector.as_str()).collect();
        assert_eq!(connectors, vec!["AI Art Generation", "Creative Coding"]);
        assert_eq!(galaxy.links[0].source, galaxy.links[1].source);
        assert_eq!(galaxy.links[0].target, galaxy.links[1].target);
    }

    #[tokio::test]
    async fn test_node_carries_category() {
        let (store, user) = seeded_with(&["Marketing"]).await;

        let galaxy = galaxy_for(&store, user).await.unwrap();
        assert_eq!(galaxy.nodes[0].category, SkillCategory::Business);
        assert!(galaxy.links.is_empty());
    }
}
