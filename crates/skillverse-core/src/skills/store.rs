//! Skill storage and retrieval
//!
//! Read-only access to the seeded catalog, plus per-user acquisition tracking.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::types::{
    AcquiredSkill, CatalogSnapshot, Skill, SkillCategory, SkillConnection, SkillId, User, UserId,
};

/// Store for the skill catalog and learners' acquired skills
#[derive(Clone)]
pub struct SkillStore {
    pool: SqlitePool,
}

impl SkillStore {
    /// Create a new skill store with the given database pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// All skills ordered by (category, name)
    pub async fn list(&self) -> Result<Vec<Skill>> {
        fetch_catalog(&self.pool).await
    }

    /// Skills in one category, ordered by name
    pub async fn list_by_category(&self, category: &SkillCategory) -> Result<Vec<Skill>> {
        let rows: Vec<SkillRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, description, learning_resources
            FROM skills
            WHERE category = ?
            ORDER BY category, name
            "#,
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SkillRow::into_skill).collect())
    }

    /// All skills grouped by category label
    pub async fn grouped_by_category(&self) -> Result<BTreeMap<String, Vec<Skill>>> {
        let mut groups: BTreeMap<String, Vec<Skill>> = BTreeMap::new();
        for skill in self.list().await? {
            groups
                .entry(skill.category.as_str().to_string())
                .or_default()
                .push(skill);
        }
        Ok(groups)
    }

    /// Get a skill by ID
    pub async fn get(&self, id: SkillId) -> Result<Option<Skill>> {
        let row: Option<SkillRow> = sqlx::query_as(
            "SELECT id, name, category, description, learning_resources FROM skills WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SkillRow::into_skill))
    }

    /// Get a skill by name (case-insensitive)
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Skill>> {
        let row: Option<SkillRow> = sqlx::query_as(
            r#"
            SELECT id, name, category, description, learning_resources
            FROM skills
            WHERE name = ? COLLATE NOCASE
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SkillRow::into_skill))
    }

    /// Get a skill by name, failing with [`Error::SkillNotFound`]
    pub async fn require_by_name(&self, name: &str) -> Result<Skill> {
        self.get_by_name(name)
            .await?
            .ok_or_else(|| Error::SkillNotFound(name.to_string()))
    }

    /// All connector relationships ordered by id
    pub async fn list_connections(&self) -> Result<Vec<SkillConnection>> {
        fetch_connections(&self.pool).await
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Get the user with `username`, creating it if needed
    pub async fn ensure_user(&self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("username must not be empty".to_string()));
        }

        let result = sqlx::query(
            "INSERT INTO users (username, created_at) VALUES (?, ?) ON CONFLICT(username) DO NOTHING",
        )
        .bind(username)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!(username = %username, "User created");
        }

        self.get_user_by_name(username)
            .await?
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    /// Get a user by username
    pub async fn get_user_by_name(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, created_at FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    // ------------------------------------------------------------------
    // Acquired skills
    // ------------------------------------------------------------------

    /// Record that `user` acquired `skill_id`
    ///
    /// Re-adding is a no-op. An unknown skill id fails with the storage
    /// foreign-key error. Returns whether a new row was written.
    pub async fn add_skill(&self, user: UserId, skill_id: SkillId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_skills (user_id, skill_id, acquired_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, skill_id) DO NOTHING
            "#,
        )
        .bind(user.0)
        .bind(skill_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            info!(user_id = %user, skill_id = skill_id, "Skill acquired");
        } else {
            debug!(user_id = %user, skill_id = skill_id, "Skill already acquired");
        }
        Ok(inserted)
    }

    /// Remove `skill_id` from `user`'s acquired skills; absent rows are fine
    pub async fn remove_skill(&self, user: UserId, skill_id: SkillId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_skills WHERE user_id = ? AND skill_id = ?")
            .bind(user.0)
            .bind(skill_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(user_id = %user, skill_id = skill_id, "Skill removed");
        }
        Ok(removed)
    }

    /// Skills acquired by `user`, in acquisition order
    pub async fn list_acquired(&self, user: UserId) -> Result<Vec<AcquiredSkill>> {
        fetch_acquired(&self.pool, user).await
    }

    /// Catalog, connections and `user`'s acquisitions from one read transaction
    pub async fn snapshot(&self, user: UserId) -> Result<CatalogSnapshot> {
        let mut tx = self.pool.begin().await?;

        let catalog = fetch_catalog(&mut *tx).await?;
        let connections = fetch_connections(&mut *tx).await?;
        let acquired = fetch_acquired(&mut *tx, user).await?;

        tx.commit().await?;

        Ok(CatalogSnapshot {
            catalog,
            connections,
            acquired,
        })
    }
}

async fn fetch_catalog<'e, E>(executor: E) -> Result<Vec<Skill>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows: Vec<SkillRow> = sqlx::query_as(
        r#"
        SELECT id, name, category, description, learning_resources
        FROM skills
        ORDER BY category, name
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(SkillRow::into_skill).collect())
}

async fn fetch_connections<'e, E>(executor: E) -> Result<Vec<SkillConnection>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows: Vec<ConnectionRow> = sqlx::query_as(
        r#"
        SELECT id, skill1_id, skill2_id, connector_skill_id, strength
        FROM skill_connections
        ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(ConnectionRow::into_connection).collect())
}

async fn fetch_acquired<'e, E>(executor: E, user: UserId) -> Result<Vec<AcquiredSkill>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows: Vec<AcquiredRow> = sqlx::query_as(
        r#"
        SELECT s.id, s.name, s.category, s.description, s.learning_resources, us.acquired_at
        FROM user_skills us
        JOIN skills s ON s.id = us.skill_id
        WHERE us.user_id = ?
        ORDER BY us.id
        "#,
    )
    .bind(user.0)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(AcquiredRow::into_acquired).collect()
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Other(format!("Invalid timestamp '{}': {}", value, e)))
}

/// Database row for the skills table
#[derive(Debug, FromRow)]
struct SkillRow {
    id: i64,
    name: String,
    category: String,
    description: String,
    learning_resources: String,
}

impl SkillRow {
    fn into_skill(self) -> Skill {
        Skill {
            id: self.id,
            name: self.name,
            category: SkillCategory::parse(&self.category),
            description: self.description,
            learning_resources: self.learning_resources,
        }
    }
}

#[derive(Debug, FromRow)]
struct AcquiredRow {
    #[sqlx(flatten)]
    skill: SkillRow,
    acquired_at: String,
}

impl AcquiredRow {
    fn into_acquired(self) -> Result<AcquiredSkill> {
        Ok(AcquiredSkill {
            acquired_at: parse_timestamp(&self.acquired_at)?,
            skill: self.skill.into_skill(),
        })
    }
}

#[derive(Debug, FromRow)]
struct ConnectionRow {
    id: i64,
    skill1_id: i64,
    skill2_id: i64,
    connector_skill_id: i64,
    strength: f64,
}

impl ConnectionRow {
    fn into_connection(self) -> SkillConnection {
        SkillConnection {
            id: self.id,
            skill1_id: self.skill1_id,
            skill2_id: self.skill2_id,
            connector_skill_id: self.connector_skill_id,
            strength: self.strength,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    created_at: String,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        Ok(User {
            id: UserId(self.id),
            username: self.username,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    async fn setup_test_store() -> (SkillStore, UserId) {
        let db = Database::in_memory().await.expect("Failed to create database");
        let store = SkillStore::new(db.pool().clone());
        let user = store.ensure_user("demo").await.expect("Failed to create user");
        (store, user.id)
    }

    async fn id_of(store: &SkillStore, name: &str) -> SkillId {
        store.require_by_name(name).await.unwrap().id
    }

    #[tokio::test]
    async fn test_list_ordered_by_category_then_name() {
        let (store, _) = setup_test_store().await;

        let skills = store.list().await.unwrap();
        assert_eq!(skills.len(), 35);

        let keys: Vec<(String, String)> = skills
            .iter()
            .map(|s| (s.category.as_str().to_string(), s.name.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(skills[0].category, SkillCategory::Art);
        assert_eq!(skills[0].name, "3D Modeling");
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let (store, _) = setup_test_store().await;

        let music = store.list_by_category(&SkillCategory::Music).await.unwrap();
        let names: Vec<&str> = music.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Audio Engineering", "Music Production", "Music Theory"]);

        let connectors = store.list_by_category(&SkillCategory::Connector).await.unwrap();
        assert_eq!(connectors.len(), 13);
    }

    #[tokio::test]
    async fn test_grouped_by_category() {
        let (store, _) = setup_test_store().await;

        let groups = store.grouped_by_category().await.unwrap();
        assert_eq!(groups.len(), 6);
        assert_eq!(groups["Computer Science"].len(), 5);
        assert_eq!(groups["Business"].len(), 4);
    }

    #[tokio::test]
    async fn test_get_by_name_is_case_insensitive() {
        let (store, _) = setup_test_store().await;

        let skill = store.get_by_name("digital painting").await.unwrap().unwrap();
        assert_eq!(skill.name, "Digital Painting");
        assert_eq!(skill.category, SkillCategory::Art);
        assert!(skill.learning_resources.starts_with("https://"));

        let same = store.get(skill.id).await.unwrap().unwrap();
        assert_eq!(same, skill);
    }

    #[tokio::test]
    async fn test_require_unknown_name_fails() {
        let (store, _) = setup_test_store().await;

        let err = store.require_by_name("Juggling").await.unwrap_err();
        assert!(matches!(err, Error::SkillNotFound(name) if name == "Juggling"));
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let (store, user) = setup_test_store().await;

        let again = store.ensure_user("demo").await.unwrap();
        assert_eq!(again.id, user);

        let other = store.ensure_user("second").await.unwrap();
        assert_ne!(other.id, user);
    }

    #[tokio::test]
    async fn test_ensure_user_rejects_blank_name() {
        let (store, _) = setup_test_store().await;
        assert!(matches!(
            store.ensure_user("  ").await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_add_skill_twice_lists_once() {
        let (store, user) = setup_test_store().await;
        let python = id_of(&store, "Python").await;

        assert!(store.add_skill(user, python).await.unwrap());
        assert!(!store.add_skill(user, python).await.unwrap());

        let acquired = store.list_acquired(user).await.unwrap();
        assert_eq!(acquired.len(), 1);
        assert_eq!(acquired[0].skill.name, "Python");
    }

    #[tokio::test]
    async fn test_add_unknown_skill_fails() {
        let (store, user) = setup_test_store().await;

        let result = store.add_skill(user, 9_999).await;
        assert!(matches!(result, Err(Error::DatabaseError(_))));
        assert!(store.list_acquired(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_never_added_is_noop() {
        let (store, user) = setup_test_store().await;
        let python = id_of(&store, "Python").await;

        assert!(!store.remove_skill(user, python).await.unwrap());
        assert!(!store.remove_skill(user, 9_999).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_skill() {
        let (store, user) = setup_test_store().await;
        let python = id_of(&store, "Python").await;
        let biology = id_of(&store, "Biology").await;

        store.add_skill(user, python).await.unwrap();
        store.add_skill(user, biology).await.unwrap();
        assert!(store.remove_skill(user, python).await.unwrap());

        let acquired = store.list_acquired(user).await.unwrap();
        let names: Vec<&str> = acquired.iter().map(|a| a.skill.name.as_str()).collect();
        assert_eq!(names, vec!["Biology"]);
    }

    #[tokio::test]
    async fn test_acquired_in_acquisition_order() {
        let (store, user) = setup_test_store().await;

        for name in ["Physics", "Biology", "Animation"] {
            store.add_skill(user, id_of(&store, name).await).await.unwrap();
        }

        let names: Vec<String> = store
            .list_acquired(user)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.skill.name)
            .collect();
        assert_eq!(names, vec!["Physics", "Biology", "Animation"]);
    }

    #[tokio::test]
    async fn test_acquisitions_are_per_user() {
        let (store, demo) = setup_test_store().await;
        let other = store.ensure_user("other").await.unwrap().id;
        let python = id_of(&store, "Python").await;

        store.add_skill(demo, python).await.unwrap();

        assert_eq!(store.list_acquired(demo).await.unwrap().len(), 1);
        assert!(store.list_acquired(other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_reads_everything() {
        let (store, user) = setup_test_store().await;
        store.add_skill(user, id_of(&store, "Python").await).await.unwrap();

        let snapshot = store.snapshot(user).await.unwrap();
        assert_eq!(snapshot.catalog.len(), 35);
        assert_eq!(snapshot.connections.len(), 28);
        assert_eq!(snapshot.acquired.len(), 1);

        let ids: Vec<i64> = snapshot.connections.iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
