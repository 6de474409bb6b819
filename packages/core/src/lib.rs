//! Domain core of the Amity social-graph service.
//!
//! This crate holds everything about friendships, subscriptions and blocks
//! that does not touch I/O: the relation types, the field validation applied
//! to incoming requests, mention extraction from message bodies, and the
//! list operations used to assemble query results. The `amity-node` service
//! builds its storage and relation engine on top of it.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | [`UserId`], [`RelationStatus`], [`Relation`] |
//! | [`validation`] | Request-field checks returning [`ValidationError`] |
//! | [`mentions`] | [`extract_emails`] from free text |
//! | [`merge`] | [`common_entries`] and [`dedup_in_order`] |

pub mod mentions;
pub mod merge;
pub mod types;
pub mod validation;

pub use mentions::extract_emails;
pub use merge::{common_entries, dedup_in_order};
pub use types::{Relation, RelationStatus, UserId};
pub use validation::{
    is_valid_email, validate_email, validate_pair, validate_requestor_target, validate_sender,
    ValidationError,
};
