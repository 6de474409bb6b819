//! HTTP request handlers for all Amity endpoints.
//!
//! Handlers decode the JSON body, apply field validation, and delegate to the
//! [`RelationEngine`]. They never touch storage directly: all relation rules
//! live in the engine.

pub mod relations;
pub mod users;

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, Json};

use crate::{engine::RelationEngine, error::AppError};

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn RelationEngine>,
}

/// Unwrap a JSON body, turning decoder failures into a 500 envelope.
pub(crate) fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!("rejected request body: {}", e.body_text());
        AppError::from(e)
    })?;
    Ok(body)
}
