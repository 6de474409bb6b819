use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Errors returned when a request field fails validation.
///
/// The `Display` text of each variant is returned to clients verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A single-email request carried a malformed address.
    #[error("Invalid email format")]
    InvalidEmail,

    /// One of the addresses in a pairwise or requestor/target request is malformed.
    #[error("invalid email format")]
    InvalidEmailInPair,

    #[error("must contain 2 emails")]
    NotAPair,

    #[error("requestor and target must not be empty")]
    EmptyRequestorOrTarget,

    #[error("sender must not empty")]
    EmptySender,
}

/// `true` if `email` has a plausible address shape.
///
/// The check is deliberately permissive: 3 to 254 characters, a local part of
/// RFC 5322 atom characters, and a dotted domain of hostname labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 254 {
        return false;
    }
    EMAIL_RE.is_match(email)
}

/// Validate the single address of a get-friends or register request.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate a `friends` list that must name exactly two users.
pub fn validate_pair(friends: &[String]) -> Result<(), ValidationError> {
    if friends.len() != 2 {
        return Err(ValidationError::NotAPair);
    }
    if !is_valid_email(&friends[0]) || !is_valid_email(&friends[1]) {
        return Err(ValidationError::InvalidEmailInPair);
    }
    Ok(())
}

/// Validate the `requestor` / `target` fields of a subscribe or block request.
pub fn validate_requestor_target(requestor: &str, target: &str) -> Result<(), ValidationError> {
    if requestor.is_empty() || target.is_empty() {
        return Err(ValidationError::EmptyRequestorOrTarget);
    }
    if !is_valid_email(requestor) || !is_valid_email(target) {
        return Err(ValidationError::InvalidEmailInPair);
    }
    Ok(())
}

/// Validate the `sender` field of a retrieve-recipients request.
pub fn validate_sender(sender: &str) -> Result<(), ValidationError> {
    if sender.is_empty() {
        return Err(ValidationError::EmptySender);
    }
    if !is_valid_email(sender) {
        return Err(ValidationError::InvalidEmailInPair);
    }
    Ok(())
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("invalid email regex")
});

// --- tests -------------------------------------------------------------------
