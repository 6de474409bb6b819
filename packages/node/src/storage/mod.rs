//! Storage abstraction layer for the Amity node.
//!
//! Two traits define the contract between the relation engine and
//! persistence:
//!
//! - [`IdentityResolver`] maps an email to the [`UserId`] that owns it.
//! - [`RelationStore`] persists relation rows and answers existence and
//!   membership queries over them.
//!
//! Neither carries business rules: which transitions are legal is decided
//! by [`crate::engine`], and the stores simply read and write rows. [`Storage`]
//! is the union of both, so a backend is injected into the engine as a single
//! `Arc<dyn Storage>`.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryStorage`] | Tests, conformance suite, ephemeral nodes |
//! | [`SqliteStorage`] | Production; durable single-file database |
//!
//! [`MemoryStorage`]: memory::MemoryStorage
//! [`SqliteStorage`]: sqlite::SqliteStorage

pub mod memory;
pub mod sqlite;

use amity::{RelationStatus, UserId};
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors that storage operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An unexpected error in the underlying storage backend.
    #[error("internal storage error: {0}")]
    Internal(String),

    /// The blocking task running a backend call panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Email → identity lookup.
#[async_trait]
pub trait IdentityResolver: Send + Sync + 'static {
    /// Return the id of the user that owns exactly `email`, or `None`.
    ///
    /// No normalisation is applied: case and surrounding whitespace are
    /// significant.
    async fn resolve(&self, email: &str) -> Result<Option<UserId>, StorageError>;

    /// Register `email` as a user. Idempotent: an existing registration
    /// returns its original id.
    async fn register(&self, email: &str) -> Result<UserId, StorageError>;
}

/// Persistence of directed relation rows `(owner, counterpart, status)`.
///
/// Rows are append-only. There is no uniqueness constraint: writing the same
/// row twice stores it twice, and every query below reads through duplicates.
#[async_trait]
pub trait RelationStore: Send + Sync + 'static {
    /// `true` if `(a, b, status)` or `(b, a, status)` is present.
    async fn exists(&self, a: UserId, b: UserId, status: RelationStatus)
        -> Result<bool, StorageError>;

    /// `true` if exactly `(owner, counterpart, status)` is present.
    async fn exists_directed(
        &self,
        owner: UserId,
        counterpart: UserId,
        status: RelationStatus,
    ) -> Result<bool, StorageError>;

    /// Distinct emails of every other user linked to `user` by a `status`
    /// row in either direction, sorted ascending.
    async fn friends_with_status(
        &self,
        user: UserId,
        status: RelationStatus,
    ) -> Result<Vec<String>, StorageError>;

    /// Distinct emails (sorted ascending) of users holding a FRIEND or
    /// SUBSCRIBE row towards `target`, excluding any user with a BLOCK row
    /// between them and `target` in either direction. `target` itself is
    /// never included, even through a self row.
    async fn notifiable_senders(&self, target: UserId) -> Result<Vec<String>, StorageError>;

    /// Write a relation from `owner` to `counterpart`.
    ///
    /// Symmetric statuses (FRIEND) write both directions in one atomic
    /// operation; directed statuses write the single row.
    async fn insert_relation(
        &self,
        owner: UserId,
        counterpart: UserId,
        status: RelationStatus,
    ) -> Result<(), StorageError>;
}

/// A complete backend: identity lookup plus relation persistence.
pub trait Storage: IdentityResolver + RelationStore {}

impl<T: IdentityResolver + RelationStore> Storage for T {}

// ---------------------------------------------------------------------------
// Backend-independent tests
// ---------------------------------------------------------------------------

/// Contract checks shared by every backend's test module.
#[cfg(test)]
pub(crate) mod contract {
    use super::*;

    pub async fn seed(s: &dyn Storage, emails: &[&str]) -> Vec<UserId> {
        let mut ids = Vec::new();
        for e in emails {
            ids.push(s.register(e).await.unwrap());
        }
        ids
    }

    pub async fn register_is_idempotent(s: &dyn Storage) {
        let a = s.register("andy@example.com").await.unwrap();
        let again = s.register("andy@example.com").await.unwrap();
        assert_eq!(a, again);
        assert_eq!(s.resolve("andy@example.com").await.unwrap(), Some(a));
    }

    pub async fn resolve_is_exact_match(s: &dyn Storage) {
        seed(s, &["andy@example.com"]).await;
        assert!(s.resolve("ANDY@example.com").await.unwrap().is_none());
        assert!(s.resolve(" andy@example.com").await.unwrap().is_none());
        assert!(s.resolve("nobody@example.com").await.unwrap().is_none());
    }

    pub async fn friend_insert_is_symmetric(s: &dyn Storage) {
        let ids = seed(s, &["andy@example.com", "john@example.com"]).await;
        s.insert_relation(ids[0], ids[1], RelationStatus::Friend)
            .await
            .unwrap();

        assert!(s.exists_directed(ids[0], ids[1], RelationStatus::Friend).await.unwrap());
        assert!(s.exists_directed(ids[1], ids[0], RelationStatus::Friend).await.unwrap());
        assert_eq!(
            s.friends_with_status(ids[0], RelationStatus::Friend).await.unwrap(),
            vec!["john@example.com".to_string()]
        );
        assert_eq!(
            s.friends_with_status(ids[1], RelationStatus::Friend).await.unwrap(),
            vec!["andy@example.com".to_string()]
        );
    }

    pub async fn directed_insert_is_one_way(s: &dyn Storage) {
        let ids = seed(s, &["lisa@example.com", "john@example.com"]).await;
        s.insert_relation(ids[0], ids[1], RelationStatus::Block)
            .await
            .unwrap();

        assert!(s.exists_directed(ids[0], ids[1], RelationStatus::Block).await.unwrap());
        assert!(!s.exists_directed(ids[1], ids[0], RelationStatus::Block).await.unwrap());
        // Order-insensitive check still sees it from the other side.
        assert!(s.exists(ids[1], ids[0], RelationStatus::Block).await.unwrap());
        assert!(!s.exists(ids[0], ids[1], RelationStatus::Friend).await.unwrap());
    }

    pub async fn friend_list_is_distinct_and_sorted(s: &dyn Storage) {
        let ids = seed(
            s,
            &["andy@example.com", "zed@example.com", "bea@example.com"],
        )
        .await;
        // Duplicate write, as a concurrent add-friend race would leave behind.
        s.insert_relation(ids[0], ids[1], RelationStatus::Friend).await.unwrap();
        s.insert_relation(ids[0], ids[1], RelationStatus::Friend).await.unwrap();
        s.insert_relation(ids[2], ids[0], RelationStatus::Friend).await.unwrap();

        assert_eq!(
            s.friends_with_status(ids[0], RelationStatus::Friend).await.unwrap(),
            vec!["bea@example.com".to_string(), "zed@example.com".to_string()]
        );
    }

    pub async fn notifiable_senders_rules(s: &dyn Storage) {
        let ids = seed(
            s,
            &[
                "sender@example.com",
                "friend@example.com",
                "fan@example.com",
                "blocked@example.com",
                "blocker@example.com",
                "target@example.com",
            ],
        )
        .await;
        let (sender, friend, fan, blocked, blocker, target) =
            (ids[0], ids[1], ids[2], ids[3], ids[4], ids[5]);

        s.insert_relation(friend, sender, RelationStatus::Friend).await.unwrap();
        s.insert_relation(fan, sender, RelationStatus::Subscribe).await.unwrap();

        // Subscribed, but the sender blocked them afterwards.
        s.insert_relation(blocked, sender, RelationStatus::Subscribe).await.unwrap();
        s.insert_relation(sender, blocked, RelationStatus::Block).await.unwrap();

        // Friends, but they blocked the sender.
        s.insert_relation(blocker, sender, RelationStatus::Friend).await.unwrap();
        s.insert_relation(blocker, sender, RelationStatus::Block).await.unwrap();

        // The sender subscribing to someone does not make them a recipient.
        s.insert_relation(sender, target, RelationStatus::Subscribe).await.unwrap();

        assert_eq!(
            s.notifiable_senders(sender).await.unwrap(),
            vec!["fan@example.com".to_string(), "friend@example.com".to_string()]
        );
    }

    pub async fn self_rows_are_not_notifiable(s: &dyn Storage) {
        let ids = seed(s, &["solo@example.com", "fan@example.com"]).await;
        let (solo, fan) = (ids[0], ids[1]);

        s.insert_relation(solo, solo, RelationStatus::Friend).await.unwrap();
        s.insert_relation(solo, solo, RelationStatus::Subscribe).await.unwrap();
        s.insert_relation(fan, solo, RelationStatus::Subscribe).await.unwrap();

        assert_eq!(
            s.notifiable_senders(solo).await.unwrap(),
            vec!["fan@example.com".to_string()]
        );
        assert!(s
            .friends_with_status(solo, RelationStatus::Friend)
            .await
            .unwrap()
            .is_empty());
    }
}
