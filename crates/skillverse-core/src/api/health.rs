//! Health API
//!
//! System health checks shared by `GET /api/health` and `skillverse doctor`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::storage::Database;

/// Health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

/// Health status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Warning,
    Error,
}

/// Overall system health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub timestamp: String,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: Some(message.into()),
        }
    }
}

/// Run all health checks
pub async fn doctor(db: &Database, config_path: Option<&Path>) -> HealthReport {
    let checks = vec![
        check_database(db).await,
        check_schema(db).await,
        check_catalog(db).await,
        check_config(config_path),
    ];

    let overall_status = checks
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Ok);

    HealthReport {
        overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// Check database connection
async fn check_database(db: &Database) -> HealthCheck {
    match db.health_check().await {
        Ok(()) => HealthCheck::new(
            "Database",
            HealthStatus::Ok,
            format!("Connected to {}", db.path().display()),
        ),
        Err(e) => HealthCheck::new("Database", HealthStatus::Error, format!("Query failed: {:#}", e)),
    }
}

/// Check schema version
async fn check_schema(db: &Database) -> HealthCheck {
    match db.migration_status().await {
        Ok(status) if !status.needs_migration => HealthCheck::new(
            "Schema",
            HealthStatus::Ok,
            format!("Version {}", status.current_version),
        ),
        Ok(status) => HealthCheck::new(
            "Schema",
            HealthStatus::Warning,
            format!(
                "Version {} (latest is {})",
                status.current_version, status.target_version
            ),
        ),
        Err(e) => HealthCheck::new("Schema", HealthStatus::Error, format!("{:#}", e)),
    }
}

/// Check that the skill catalog has been seeded
async fn check_catalog(db: &Database) -> HealthCheck {
    let counts: Result<(i64, i64), sqlx::Error> = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM skills), (SELECT COUNT(*) FROM skill_connections)",
    )
    .fetch_one(db.pool())
    .await;

    match counts {
        Ok((0, _)) => HealthCheck::new("Catalog", HealthStatus::Warning, "No skills seeded"),
        Ok((skills, connections)) => HealthCheck::new(
            "Catalog",
            HealthStatus::Ok,
            format!("{} skills, {} connections", skills, connections),
        ),
        Err(e) => HealthCheck::new("Catalog", HealthStatus::Error, format!("Query failed: {}", e)),
    }
}

/// Check config file
fn check_config(config_path: Option<&Path>) -> HealthCheck {
    match config_path {
        Some(path) if path.exists() => HealthCheck::new(
            "Configuration",
            HealthStatus::Ok,
            format!("Found at {}", path.display()),
        ),
        Some(path) => HealthCheck::new(
            "Configuration",
            HealthStatus::Warning,
            format!("Not found at {} (using defaults)", path.display()),
        ),
        None => HealthCheck::new(
            "Configuration",
            HealthStatus::Warning,
            "Could not determine config directory",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DatabaseConfig;

    #[tokio::test]
    async fn test_doctor_on_seeded_database() {
        let db = Database::in_memory().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let report = doctor(&db, Some(&config_path)).await;

        assert_eq!(report.overall_status, HealthStatus::Ok);
        assert_eq!(report.checks.len(), 4);
        let catalog = report.checks.iter().find(|c| c.name == "Catalog").unwrap();
        assert_eq!(catalog.message.as_deref(), Some("35 skills, 28 connections"));
    }

    #[tokio::test]
    async fn test_missing_config_is_warning() {
        let db = Database::in_memory().await.unwrap();

        let report = doctor(&db, Some(Path::new("/nonexistent/skillverse/config.toml"))).await;

        assert_eq!(report.overall_status, HealthStatus::Warning);
    }

    #[tokio::test]
    async fn test_unseeded_catalog_is_warning() {
        let db = Database::new(DatabaseConfig::in_memory().no_seed()).await.unwrap();

        let report = doctor(&db, None).await;
        let catalog = report.checks.iter().find(|c| c.name == "Catalog").unwrap();

        assert_eq!(catalog.status, HealthStatus::Warning);
    }
}
