//! In-memory storage implementation.
//!
//! All data is held in RAM behind a [`RwLock`] and is lost when the process
//! exits. Use this for tests, the conformance suite, and ephemeral nodes.
//!
//! Relation rows are kept as an append-only `Vec` so that duplicate writes
//! behave exactly as they do in the SQLite backend.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use amity::{Relation, RelationStatus, UserId};
use async_trait::async_trait;

use super::{IdentityResolver, RelationStore, StorageError};

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

struct Inner {
    /// email → id
    ids: HashMap<String, UserId>,
    /// id → email
    emails: HashMap<UserId, String>,
    relations: Vec<Relation>,
    next_id: i64,
}

impl Inner {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            emails: HashMap::new(),
            relations: Vec::new(),
            next_id: 1,
        }
    }

    fn has_row(&self, owner: UserId, counterpart: UserId, status: RelationStatus) -> bool {
        self.relations
            .iter()
            .any(|r| r.owner == owner && r.counterpart == counterpart && r.status == status)
    }

    fn is_blocked_between(&self, a: UserId, b: UserId) -> bool {
        self.relations
            .iter()
            .any(|r| r.status == RelationStatus::Block && r.links(a, b))
    }

    /// Map ids to emails, dropping duplicates and sorting by email.
    fn emails_of(&self, ids: impl Iterator<Item = UserId>) -> Vec<String> {
        ids.filter_map(|id| self.emails.get(&id).cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Thread-safe, in-memory implementation of [`super::Storage`].
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StorageError> {
        self.inner
            .read()
            .map_err(|_| StorageError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StorageError> {
        self.inner
            .write()
            .map_err(|_| StorageError::Internal("memory store lock poisoned".into()))
    }

    /// Number of stored relation rows, duplicates included.
    pub fn relation_count(&self) -> usize {
        self.read().map(|inner| inner.relations.len()).unwrap_or(0)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Storage impl
// ---------------------------------------------------------------------------

#[async_trait]
impl IdentityResolver for MemoryStorage {
    async fn resolve(&self, email: &str) -> Result<Option<UserId>, StorageError> {
        Ok(self.read()?.ids.get(email).copied())
    }

    async fn register(&self, email: &str) -> Result<UserId, StorageError> {
        let mut inner = self.write()?;
        if let Some(id) = inner.ids.get(email) {
            return Ok(*id);
        }
        let id = UserId(inner.next_id);
        inner.next_id += 1;
        inner.ids.insert(email.to_string(), id);
        inner.emails.insert(id, email.to_string());
        Ok(id)
    }
}

#[async_trait]
impl RelationStore for MemoryStorage {
    async fn exists(
        &self,
        a: UserId,
        b: UserId,
        status: RelationStatus,
    ) -> Result<bool, StorageError> {
        let inner = self.read()?;
        Ok(inner.has_row(a, b, status) || inner.has_row(b, a, status))
    }

    async fn exists_directed(
        &self,
        owner: UserId,
        counterpart: UserId,
        status: RelationStatus,
    ) -> Result<bool, StorageError> {
        Ok(self.read()?.has_row(owner, counterpart, status))
    }

    async fn friends_with_status(
        &self,
        user: UserId,
        status: RelationStatus,
    ) -> Result<Vec<String>, StorageError> {
        let inner = self.read()?;
        let others = inner
            .relations
            .iter()
            .filter(|r| r.status == status)
            .filter_map(|r| {
                if r.owner == user {
                    Some(r.counterpart)
                } else if r.counterpart == user {
                    Some(r.owner)
                } else {
                    None
                }
            })
            .filter(|other| *other != user);
        Ok(inner.emails_of(others))
    }

    async fn notifiable_senders(&self, target: UserId) -> Result<Vec<String>, StorageError> {
        let inner = self.read()?;
        let senders = inner
            .relations
            .iter()
            .filter(|r| r.counterpart == target && r.owner != target)
            .filter(|r| matches!(r.status, RelationStatus::Friend | RelationStatus::Subscribe))
            .map(|r| r.owner)
            .filter(|owner| !inner.is_blocked_between(*owner, target));
        Ok(inner.emails_of(senders))
    }

    async fn insert_relation(
        &self,
        owner: UserId,
        counterpart: UserId,
        status: RelationStatus,
    ) -> Result<(), StorageError> {
        // Both FRIEND rows land under the same write guard.
        let mut inner = self.write()?;
        inner
            .relations
            .extend(Relation::rows_for(owner, counterpart, status));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::contract;

    #[tokio::test]
    async fn register_is_idempotent() {
        contract::register_is_idempotent(&MemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn resolve_is_exact_match() {
        contract::resolve_is_exact_match(&MemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn friend_insert_is_symmetric() {
        contract::friend_insert_is_symmetric(&MemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn directed_insert_is_one_way() {
        contract::directed_insert_is_one_way(&MemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn friend_list_is_distinct_and_sorted() {
        contract::friend_list_is_distinct_and_sorted(&MemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn notifiable_senders_rules() {
        contract::notifiable_senders_rules(&MemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn self_rows_are_not_notifiable() {
        contract::self_rows_are_not_notifiable(&MemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn duplicate_writes_are_kept() {
        let s = MemoryStorage::new();
        let a = s.register("a@example.com").await.unwrap();
        let b = s.register("b@example.com").await.unwrap();
        s.insert_relation(a, b, RelationStatus::Friend).await.unwrap();
        s.insert_relation(a, b, RelationStatus::Friend).await.unwrap();
        assert_eq!(s.relation_count(), 4);
    }

    #[tokio::test]
    async fn ids_are_distinct_per_email() {
        let s = MemoryStorage::new();
        let a = s.register("a@example.com").await.unwrap();
        let b = s.register("b@example.com").await.unwrap();
        assert_ne!(a, b);
    }
}
