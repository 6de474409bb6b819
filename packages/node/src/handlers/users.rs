//! User registration — `POST /api/users`.
//!
//! Relation endpoints only accept emails that resolve to a registered user.
//! Registration is idempotent: re-registering an email succeeds and keeps the
//! original identity.

use amity::validate_email;
use amity_api::{EmailRequest, SuccessResponse};
use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::AppError;

use super::{decode, AppState};

/// `POST /api/users` — `{ "email" }` → `{ success }`.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let req = decode(payload)?;
    validate_email(&req.email)?;

    state.engine.register_user(&req.email).await?;
    Ok(Json(SuccessResponse::ok()))
}
