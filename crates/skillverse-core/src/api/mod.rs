//! HTTP API
//!
//! JSON endpoints plus the visualization page, served with axum. The learner
//! is resolved once, when the state is built, and every route acts for them.

pub mod error;
pub mod handlers;
pub mod health;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::Result;
use crate::skills::{SkillStore, User};
use crate::storage::Database;

pub use error::{ApiError, ApiResult};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub store: SkillStore,
    /// The learner requests act for
    pub user: User,
    /// Reported by the health endpoint
    pub config_path: Option<PathBuf>,
}

impl AppState {
    /// Build state for `username`, creating that learner if needed
    pub async fn new(db: Database, username: &str) -> Result<Self> {
        let store = SkillStore::new(db.pool().clone());
        let user = store.ensure_user(username).await?;
        Ok(Self {
            db,
            store,
            user,
            config_path: None,
        })
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/skills", get(handlers::list_skills))
        .route("/api/skills/{id}", get(handlers::get_skill))
        .route(
            "/api/user_skills",
            get(handlers::list_user_skills).post(handlers::add_user_skill),
        )
        .route("/api/remove_skill", post(handlers::remove_skill))
        .route("/api/recommendations", get(handlers::recommendations))
        .route("/api/galaxy_data", get(handlers::galaxy_data))
        .route("/api/progress", get(handlers::progress))
        .route("/api/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API on `addr` until Ctrl+C
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let username = state.user.username.clone();
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, user = %username, "Skillverse listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
