//! Core data types for the Amity relation graph.
//!
//! A relation is a directed row `(owner, counterpart, status)`. FRIEND is
//! symmetric and always persisted as two rows; SUBSCRIBE and BLOCK are
//! persisted as a single row from requestor to target.

use serde::{Deserialize, Serialize};

/// Stable internal identifier of a user. The join key for every relation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of relationship a row records.
///
/// Serialises as an upper-case string (e.g. `"FRIEND"`), which is also the
/// value stored in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelationStatus {
    /// Mutual friendship. Written in both directions at once.
    Friend,
    /// The owner receives updates from the counterpart.
    Subscribe,
    /// The owner refuses updates from the counterpart.
    Block,
}

impl RelationStatus {
    /// The upper-case storage form of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationStatus::Friend => "FRIEND",
            RelationStatus::Subscribe => "SUBSCRIBE",
            RelationStatus::Block => "BLOCK",
        }
    }

    /// `true` for statuses whose A→B row implies a B→A row.
    pub fn is_symmetric(self) -> bool {
        matches!(self, RelationStatus::Friend)
    }
}

impl std::fmt::Display for RelationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directed row of the relation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub owner: UserId,
    pub counterpart: UserId,
    pub status: RelationStatus,
}

impl Relation {
    pub fn new(owner: UserId, counterpart: UserId, status: RelationStatus) -> Self {
        Self {
            owner,
            counterpart,
            status,
        }
    }

    /// `true` if this row connects `a` and `b` in either direction.
    pub fn links(&self, a: UserId, b: UserId) -> bool {
        (self.owner == a && self.counterpart == b) || (self.owner == b && self.counterpart == a)
    }

    /// The rows a single write of `status` from `owner` to `counterpart` produces.
    ///
    /// Symmetric statuses yield both directions; directed statuses yield one row.
    pub fn rows_for(owner: UserId, counterpart: UserId, status: RelationStatus) -> Vec<Relation> {
        let mut rows = vec![Relation::new(owner, counterpart, status)];
        if status.is_symmetric() {
            rows.push(Relation::new(counterpart, owner, status));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_displays_storage_form() {
        assert_eq!(RelationStatus::Friend.to_string(), "FRIEND");
        assert_eq!(RelationStatus::Block.as_str(), "BLOCK");
    }

    #[test]
    fn status_serialises_upper_case() {
        let json = serde_json::to_string(&RelationStatus::Subscribe).unwrap();
        assert_eq!(json, "\"SUBSCRIBE\"");
    }

    #[test]
    fn friend_write_produces_both_directions() {
        let rows = Relation::rows_for(UserId(1), UserId(2), RelationStatus::Friend);
        assert_eq!(
            rows,
            vec![
                Relation::new(UserId(1), UserId(2), RelationStatus::Friend),
                Relation::new(UserId(2), UserId(1), RelationStatus::Friend),
            ]
        );
    }

    #[test]
    fn block_write_is_directed() {
        let rows = Relation::rows_for(UserId(1), UserId(2), RelationStatus::Block);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].owner, UserId(1));
    }

    #[test]
    fn links_ignores_direction() {
        let r = Relation::new(UserId(3), UserId(4), RelationStatus::Subscribe);
        assert!(r.links(UserId(4), UserId(3)));
        assert!(!r.links(UserId(3), UserId(5)));
    }
}
