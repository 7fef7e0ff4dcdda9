//! Skill catalog and acquired-skill tracking
//!
//! - `types`: catalog, connection and learner types
//! - `store`: SQLite-backed catalog queries and per-user acquisitions

pub mod store;
pub mod types;

pub use store::SkillStore;
pub use types::{
    AcquiredSkill, CatalogSnapshot, Skill, SkillCategory, SkillConnection, SkillId, User, UserId,
    pair_key,
};
