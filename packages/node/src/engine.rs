//! The relation engine: the six relation operations plus user registration.
//!
//! Every operation resolves all participant emails first, in argument order,
//! and stops at the first unknown address with [`EngineError::UserNotFound`]
//! before any relation is read or written. Transition rules are then checked
//! in a fixed order, and at most one write is issued. Nothing is retried.
//!
//! Check-then-write is not serialised: two concurrent `add_friend` calls for
//! the same pair can both pass the existence check and both insert. The
//! duplicate rows this leaves are tolerated by every read path.

use std::sync::Arc;

use amity::{common_entries, dedup_in_order, extract_emails, RelationStatus, UserId};
use async_trait::async_trait;

use crate::storage::{IdentityResolver, RelationStore, Storage, StorageError};

/// Failures of a relation operation.
///
/// The `Display` text of every variant except [`EngineError::Storage`] is part
/// of the public API and is returned to clients verbatim.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No user owns this exact email.
    #[error("email: {0} is not exist in database")]
    UserNotFound(String),

    #[error("2 emails are already being friend")]
    AlreadyFriends,

    /// A BLOCK row exists between requestor and target, in either direction.
    #[error("target email has been blocked")]
    TargetBlocked,

    /// Friends already receive each other's updates.
    #[error("already being friend to the target email, no need to subcribe")]
    SubscribeToFriend,

    #[error("already subcribe to the target email")]
    AlreadySubscribed,

    #[error("target email has already being blocked")]
    AlreadyBlocked,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The relation operations exposed over HTTP.
///
/// Input emails are assumed to have passed field validation already.
#[async_trait]
pub trait RelationEngine: Send + Sync + 'static {
    /// Register `email` as a user. Idempotent.
    async fn register_user(&self, email: &str) -> Result<(), EngineError>;

    /// Emails of everyone `email` is friends with.
    async fn get_friends(&self, email: &str) -> Result<Vec<String>, EngineError>;

    /// Make `first` and `second` friends (both directions).
    async fn add_friend(&self, first: &str, second: &str) -> Result<(), EngineError>;

    /// Emails that are friends of both `first` and `second`, in `first`'s order.
    async fn common_friends(&self, first: &str, second: &str)
        -> Result<Vec<String>, EngineError>;

    /// Subscribe `requestor` to updates from `target`.
    async fn subscribe(&self, requestor: &str, target: &str) -> Result<(), EngineError>;

    /// Block updates from `target` to `requestor`.
    async fn block(&self, requestor: &str, target: &str) -> Result<(), EngineError>;

    /// Everyone who may receive an update from `sender`: the addresses
    /// mentioned in `text`, followed by the sender's unblocked friends and
    /// subscribers, deduplicated in first-seen order.
    async fn retrieve_recipients(&self, sender: &str, text: &str)
        -> Result<Vec<String>, EngineError>;
}

/// [`RelationEngine`] over an injected [`Storage`] backend.
#[derive(Clone)]
pub struct RelationService {
    storage: Arc<dyn Storage>,
}

impl RelationService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn resolve(&self, email: &str) -> Result<UserId, EngineError> {
        self.storage
            .resolve(email)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(email.to_string()))
    }

    async fn resolve_pair(
        &self,
        first: &str,
        second: &str,
    ) -> Result<(UserId, UserId), EngineError> {
        let a = self.resolve(first).await?;
        let b = self.resolve(second).await?;
        Ok((a, b))
    }

    async fn write(
        &self,
        owner: UserId,
        counterpart: UserId,
        status: RelationStatus,
    ) -> Result<(), EngineError> {
        self.storage
            .insert_relation(owner, counterpart, status)
            .await
            .map_err(|e| {
                tracing::error!("insert {status} {owner}->{counterpart} failed: {e}");
                EngineError::from(e)
            })
    }
}

fn rejected(op: &str, err: EngineError) -> EngineError {
    tracing::warn!("{op} rejected: {err}");
    err
}

#[async_trait]
impl RelationEngine for RelationService {
    async fn register_user(&self, email: &str) -> Result<(), EngineError> {
        let id = self.storage.register(email).await?;
        tracing::info!("registered {email} as user {id}");
        Ok(())
    }

    async fn get_friends(&self, email: &str) -> Result<Vec<String>, EngineError> {
        let id = self.resolve(email).await?;
        let friends = self
            .storage
            .friends_with_status(id, RelationStatus::Friend)
            .await?;
        tracing::debug!("{email} has {} friends", friends.len());
        Ok(friends)
    }

    async fn add_friend(&self, first: &str, second: &str) -> Result<(), EngineError> {
        let (a, b) = self.resolve_pair(first, second).await?;

        if self.storage.exists(a, b, RelationStatus::Friend).await? {
            return Err(rejected("add_friend", EngineError::AlreadyFriends));
        }

        self.write(a, b, RelationStatus::Friend).await?;
        tracing::info!("{first} and {second} are now friends");
        Ok(())
    }

    async fn common_friends(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Vec<String>, EngineError> {
        let (a, b) = self.resolve_pair(first, second).await?;
        let left = self
            .storage
            .friends_with_status(a, RelationStatus::Friend)
            .await?;
        let right = self
            .storage
            .friends_with_status(b, RelationStatus::Friend)
            .await?;
        Ok(common_entries(&left, &right))
    }

    async fn subscribe(&self, requestor: &str, target: &str) -> Result<(), EngineError> {
        let (r, t) = self.resolve_pair(requestor, target).await?;

        if self.storage.exists(r, t, RelationStatus::Block).await? {
            return Err(rejected("subscribe", EngineError::TargetBlocked));
        }
        if self.storage.exists(r, t, RelationStatus::Friend).await? {
            return Err(rejected("subscribe", EngineError::SubscribeToFriend));
        }
        if self
            .storage
            .exists_directed(r, t, RelationStatus::Subscribe)
            .await?
        {
            return Err(rejected("subscribe", EngineError::AlreadySubscribed));
        }

        self.write(r, t, RelationStatus::Subscribe).await?;
        tracing::info!("{requestor} subscribed to {target}");
        Ok(())
    }

    async fn block(&self, requestor: &str, target: &str) -> Result<(), EngineError> {
        let (r, t) = self.resolve_pair(requestor, target).await?;

        if self
            .storage
            .exists_directed(r, t, RelationStatus::Block)
            .await?
        {
            return Err(rejected("block", EngineError::AlreadyBlocked));
        }

        self.write(r, t, RelationStatus::Block).await?;
        tracing::info!("{requestor} blocked {target}");
        Ok(())
    }

    async fn retrieve_recipients(
        &self,
        sender: &str,
        text: &str,
    ) -> Result<Vec<String>, EngineError> {
        let id = self.resolve(sender).await?;
        let mentioned = extract_emails(text);
        let notifiable = self.storage.notifiable_senders(id).await?;
        let recipients = dedup_in_order(mentioned.into_iter().chain(notifiable));
        tracing::debug!("{sender} has {} recipients", recipients.len());
        Ok(recipients)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
