//! Route handlers
//!
//! Every handler acts on behalf of the learner resolved when the state was
//! built.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::health::{self, HealthReport};
use super::AppState;
use crate::error::Error;
use crate::galaxy::{self, GalaxyData};
use crate::progress::{self, ProgressSummary};
use crate::recommend::{self, Recommendation};
use crate::skills::{Skill, SkillCategory, SkillId};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Skill as listed by the catalog and acquired-skill endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub id: SkillId,
    pub name: String,
    pub category: String,
    pub description: String,
}

impl From<Skill> for SkillSummary {
    fn from(skill: Skill) -> Self {
        Self {
            id: skill.id,
            name: skill.name,
            category: skill.category.to_string(),
            description: skill.description,
        }
    }
}

/// Single skill including where to learn it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDetail {
    pub id: SkillId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub learning_resources: String,
}

impl From<Skill> for SkillDetail {
    fn from(skill: Skill) -> Self {
        Self {
            id: skill.id,
            name: skill.name,
            category: skill.category.to_string(),
            description: skill.description,
            learning_resources: skill.learning_resources,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillIdRequest {
    pub skill_id: Option<SkillId>,
}

impl SkillIdRequest {
    fn skill_id(&self) -> Result<SkillId, Error> {
        self.skill_id
            .ok_or_else(|| Error::InvalidInput("skill_id is required".to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn list_skills(
    State(state): State<AppState>,
    Query(query): Query<SkillsQuery>,
) -> ApiResult<Json<Vec<SkillSummary>>> {
    let skills = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => {
            state
                .store
                .list_by_category(&SkillCategory::parse(category))
                .await?
        }
        _ => state.store.list().await?,
    };

    Ok(Json(skills.into_iter().map(SkillSummary::from).collect()))
}

pub async fn get_skill(
    State(state): State<AppState>,
    Path(id): Path<SkillId>,
) -> ApiResult<Json<SkillDetail>> {
    let skill = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("skill {}", id)))?;

    Ok(Json(SkillDetail::from(skill)))
}

pub async fn list_user_skills(State(state): State<AppState>) -> ApiResult<Json<Vec<SkillSummary>>> {
    let acquired = state.store.list_acquired(state.user.id).await?;
    Ok(Json(
        acquired
            .into_iter()
            .map(|a| SkillSummary::from(a.skill))
            .collect(),
    ))
}

pub async fn add_user_skill(
    State(state): State<AppState>,
    Json(request): Json<SkillIdRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state.store.add_skill(state.user.id, request.skill_id()?).await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn remove_skill(
    State(state): State<AppState>,
    Json(request): Json<SkillIdRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .store
        .remove_skill(state.user.id, request.skill_id()?)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn recommendations(State(state): State<AppState>) -> ApiResult<Json<Vec<Recommendation>>> {
    let recommendations = recommend::recommendations_for(&state.store, state.user.id).await?;
    Ok(Json(recommendations))
}

pub async fn galaxy_data(State(state): State<AppState>) -> ApiResult<Json<GalaxyData>> {
    let galaxy = galaxy::galaxy_for(&state.store, state.user.id).await?;
    Ok(Json(galaxy))
}

pub async fn progress(State(state): State<AppState>) -> ApiResult<Json<ProgressSummary>> {
    let summary = progress::progress_for(&state.store, state.user.id).await?;
    Ok(Json(summary))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(health::doctor(&state.db, state.config_path.as_deref()).await)
}
