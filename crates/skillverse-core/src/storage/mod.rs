//! Storage layer - SQLite
//!
//! Provides database management, migrations and catalog seeding for skillverse.
//!
//! # Architecture
//!
//! - `database`: Connection pool management and initialization
//! - `migrations`: Schema versioning and automatic migration
//! - `seed`: One-time insertion of the skill catalog and connector relationships
//!
//! # Usage
//!
//! ```ignore
//! use skillverse_core::storage::Database;
//!
//! // Create an in-memory database for testing
//! let db = Database::in_memory().await?;
//!
//! // Or open the database file used by the server
//! let db = Database::open("skillverse.db").await?;
//! ```

pub mod database;
pub mod migrations;
pub mod seed;

// Re-export commonly used types
pub use database::{Database, DatabaseConfig, default_database_path};
pub use migrations::{CURRENT_VERSION, MigrationStatus, migration_status, run_migrations};
pub use seed::{SEED_CONNECTIONS, SEED_SKILLS, SeedReport, seed_catalog};
