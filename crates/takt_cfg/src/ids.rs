//! Opaque ID newtypes for CFG entities.
//!
//! [`BlockId`] and [`EdgeId`] are ordered `u32` arena indices into the
//! CFG collection, defined through
//! [`define_ordered_id!`](takt_common::define_ordered_id): insertion
//! order is program order, and the scheduler's deterministic job order
//! and first-failing-edge reporting both lean on it.

use takt_common::define_ordered_id;

define_ordered_id!(
    /// Opaque, copyable ID for a block of the CFG collection.
    BlockId ordered by "block program order"
);

define_ordered_id!(
    /// Opaque, copyable ID for a directed edge of the CFG collection.
    EdgeId ordered by "edge insertion order"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn block_id_roundtrip() {
        let id = BlockId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn edge_id_roundtrip() {
        let id = EdgeId::from_raw(7);
        assert_eq!(id.as_raw(), 7);
    }

    #[test]
    fn ids_are_ordered_by_index() {
        assert!(EdgeId::from_raw(1) < EdgeId::from_raw(2));
        assert!(BlockId::from_raw(0) < BlockId::from_raw(9));
    }

    #[test]
    fn edge_id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(EdgeId::from_raw(1));
        set.insert(EdgeId::from_raw(2));
        set.insert(EdgeId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ids_serde_roundtrip() {
        let id = BlockId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: BlockId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
