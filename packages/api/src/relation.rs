//! Relation request and response types — `POST /api/{friends,add,common,subscribe,block,retrieve}`.
//!
//! String fields default to empty and the `friends` list defaults to empty
//! when absent, so that a missing field is reported by field validation
//! (HTTP 400) rather than as an undecodable body (HTTP 500).

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/friends` and `POST /api/users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

/// Request body for `POST /api/add` and `POST /api/common`.
///
/// `friends` must contain exactly two addresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FriendPairRequest {
    #[serde(default)]
    pub friends: Vec<String>,
}

/// Request body for `POST /api/subscribe` and `POST /api/block`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestorTargetRequest {
    /// The user creating the relation.
    #[serde(default)]
    pub requestor: String,

    /// The user the relation points at.
    #[serde(default)]
    pub target: String,
}

/// Request body for `POST /api/retrieve`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetrieveRequest {
    #[serde(default)]
    pub sender: String,

    /// Message body; email addresses mentioned in it become recipients.
    #[serde(default)]
    pub text: String,
}

/// Bare success acknowledgement for write endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Response for `POST /api/friends` and `POST /api/common`.
///
/// ```json
/// { "success": true, "friends": ["john@example.com"], "count": 1 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FriendListResponse {
    pub success: bool,
    pub friends: Vec<String>,
    /// Always `friends.len()`.
    pub count: usize,
}

impl FriendListResponse {
    pub fn new(friends: Vec<String>) -> Self {
        Self {
            success: true,
            count: friends.len(),
            friends,
        }
    }
}

/// Response for `POST /api/retrieve`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipientsResponse {
    pub success: bool,
    pub recipients: Vec<String>,
}

impl RecipientsResponse {
    pub fn new(recipients: Vec<String>) -> Self {
        Self {
            success: true,
            recipients,
        }
    }
}
