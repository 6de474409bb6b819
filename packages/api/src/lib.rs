//! Request and response types for the Amity HTTP API.
//!
//! This crate encodes the JSON contract of the relationship service as Rust
//! types, shared by the `amity-node` server and the conformance suite.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | POST | `/api/friends` | [`EmailRequest`] → [`FriendListResponse`] |
//! | POST | `/api/add` | [`FriendPairRequest`] → [`SuccessResponse`] |
//! | POST | `/api/common` | [`FriendPairRequest`] → [`FriendListResponse`] |
//! | POST | `/api/subscribe` | [`RequestorTargetRequest`] → [`SuccessResponse`] |
//! | POST | `/api/block` | [`RequestorTargetRequest`] → [`SuccessResponse`] |
//! | POST | `/api/retrieve` | [`RetrieveRequest`] → [`RecipientsResponse`] |
//! | POST | `/api/users` | [`EmailRequest`] → [`SuccessResponse`] |
//!
//! Every failure returns an [`ErrorResponse`].

pub mod error;
pub mod relation;

pub use error::{ErrorResponse, TIMESTAMP_FORMAT};
pub use relation::{
    EmailRequest, FriendListResponse, FriendPairRequest, RecipientsResponse,
    RequestorTargetRequest, RetrieveRequest, SuccessResponse,
};
