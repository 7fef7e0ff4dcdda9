//! Learner progress: experience points and levels earned from acquired skills

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::skills::{CatalogSnapshot, SkillStore, UserId};

/// Experience awarded per acquired skill
pub const XP_PER_SKILL: u32 = 100;

/// Experience needed to advance one level
pub const XP_PER_LEVEL: u32 = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub acquired_count: u32,
    /// Acquired skills in the Connector category
    pub connector_count: u32,
    pub catalog_size: u32,
    pub xp: u32,
    /// Starts at 1
    pub level: u32,
    pub xp_into_level: u32,
    pub xp_to_next_level: u32,
    /// Acquired skill count per category label
    pub by_category: BTreeMap<String, u32>,
}

/// Level reached with `xp` experience points
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Summarize the snapshot's acquisitions
pub fn summarize(snapshot: &CatalogSnapshot) -> ProgressSummary {
    let acquired_count = snapshot.acquired.len() as u32;
    let xp = acquired_count * XP_PER_SKILL;
    let xp_into_level = xp % XP_PER_LEVEL;

    let mut by_category: BTreeMap<String, u32> = BTreeMap::new();
    let mut connector_count = 0;
    for acquired in &snapshot.acquired {
        *by_category
            .entry(acquired.skill.category.as_str().to_string())
            .or_insert(0) += 1;
        if acquired.skill.category.is_connector() {
            connector_count += 1;
        }
    }

    ProgressSummary {
        acquired_count,
        connector_count,
        catalog_size: snapshot.catalog.len() as u32,
        xp,
        level: level_for_xp(xp),
        xp_into_level,
        xp_to_next_level: XP_PER_LEVEL - xp_into_level,
        by_category,
    }
}

/// Load `user`'s snapshot and summarize it
pub async fn progress_for(store: &SkillStore, user: UserId) -> Result<ProgressSummary> {
    let snapshot = store.snapshot(user).await?;
    Ok(summarize(&snapshot))
}
