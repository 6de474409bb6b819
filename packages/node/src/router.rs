//! Assembles the Axum [`Router`] from all handler modules.

use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::{
    engine::RelationEngine,
    handlers::{relations, users, AppState},
};

/// Build the complete application router with shared state.
pub fn build_router(engine: Arc<dyn RelationEngine>) -> Router {
    let state = AppState { engine };

    Router::new()
        // Users
        .route("/api/users", post(users::register))
        // Friends
        .route("/api/friends", post(relations::friends))
        .route("/api/add", post(relations::add))
        .route("/api/common", post(relations::common))
        // Subscriptions and blocks
        .route("/api/subscribe", post(relations::subscribe))
        .route("/api/block", post(relations::block))
        // Notification fan-out
        .route("/api/retrieve", post(relations::retrieve))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
