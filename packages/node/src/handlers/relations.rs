//! Relation handlers.
//!
//! - `POST /api/friends`   — list a user's friends.
//! - `POST /api/add`       — make two users friends.
//! - `POST /api/common`    — list friends two users share.
//! - `POST /api/subscribe` — subscribe requestor to target's updates.
//! - `POST /api/block`     — block target's updates to requestor.
//! - `POST /api/retrieve`  — list who may receive an update from sender.
//!
//! Each handler returns 500 for an undecodable body, 400 for a field
//! validation failure, an unknown email or a rejected relation rule, and 200
//! with a `success: true` body otherwise.

use amity::{validate_email, validate_pair, validate_requestor_target, validate_sender};
use amity_api::{
    EmailRequest, FriendListResponse, FriendPairRequest, RecipientsResponse,
    RequestorTargetRequest, RetrieveRequest, SuccessResponse,
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::AppError;

use super::{decode, AppState};

/// `POST /api/friends` — `{ "email" }` → `{ success, friends, count }`.
pub async fn friends(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<FriendListResponse>, AppError> {
    let req = decode(payload)?;
    validate_email(&req.email)?;

    let friends = state.engine.get_friends(&req.email).await?;
    Ok(Json(FriendListResponse::new(friends)))
}

/// `POST /api/add` — `{ "friends": [a, b] }` → `{ success }`.
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<FriendPairRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let req = decode(payload)?;
    validate_pair(&req.friends)?;

    state.engine.add_friend(&req.friends[0], &req.friends[1]).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// `POST /api/common` — `{ "friends": [a, b] }` → `{ success, friends, count }`.
pub async fn common(
    State(state): State<AppState>,
    payload: Result<Json<FriendPairRequest>, JsonRejection>,
) -> Result<Json<FriendListResponse>, AppError> {
    let req = decode(payload)?;
    validate_pair(&req.friends)?;

    let friends = state
        .engine
        .common_friends(&req.friends[0], &req.friends[1])
        .await?;
    Ok(Json(FriendListResponse::new(friends)))
}

/// `POST /api/subscribe` — `{ "requestor", "target" }` → `{ success }`.
pub async fn subscribe(
    State(state): State<AppState>,
    payload: Result<Json<RequestorTargetRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let req = decode(payload)?;
    validate_requestor_target(&req.requestor, &req.target)?;

    state.engine.subscribe(&req.requestor, &req.target).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// `POST /api/block` — `{ "requestor", "target" }` → `{ success }`.
pub async fn block(
    State(state): State<AppState>,
    payload: Result<Json<RequestorTargetRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let req = decode(payload)?;
    validate_requestor_target(&req.requestor, &req.target)?;

    state.engine.block(&req.requestor, &req.target).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// `POST /api/retrieve` — `{ "sender", "text" }` → `{ success, recipients }`.
pub async fn retrieve(
    State(state): State<AppState>,
    payload: Result<Json<RetrieveRequest>, JsonRejection>,
) -> Result<Json<RecipientsResponse>, AppError> {
    let req = decode(payload)?;
    validate_sender(&req.sender)?;

    let recipients = state
        .engine
        .retrieve_recipients(&req.sender, &req.text)
        .await?;
    Ok(Json(RecipientsResponse::new(recipients)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
