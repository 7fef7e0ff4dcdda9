//! Skillverse Core Library
//!
//! This crate provides the core functionality for Skillverse, including:
//! - Storage (SQLite schema, migrations and the seeded skill catalog)
//! - Skill catalog and per-user skill tracking
//! - Connector recommendations for pairs of acquired skills
//! - Galaxy (node/link) view of acquired skills
//! - Progress summary
//! - HTTP API (axum)

pub mod api;
pub mod config;
pub mod error;
pub mod galaxy;
pub mod progress;
pub mod recommend;
pub mod skills;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::skills::{Skill, SkillId, SkillStore, UserId};
    pub use crate::storage::Database;
}
