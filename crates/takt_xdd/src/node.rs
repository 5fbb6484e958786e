//! Decision-diagram nodes.
//!
//! A [`Node`] is either a leaf carrying a [`Time`] or an inner node
//! labeled by an [`EventVar`] with two children. Nodes are immutable,
//! `Copy`, and owned by the [`NodeManager`](crate::NodeManager) that
//! created them; [`NodeId`]s are arena indices, and id equality stands
//! in for the pointer equality of the canonical representation.

use serde::{Deserialize, Serialize};
use takt_common::{define_ordered_id, Time};

define_ordered_id!(
    /// A boolean pipeline event variable.
    ///
    /// Variables come from a totally ordered domain fixed by the
    /// resource model for the whole run; the order defines the
    /// canonical variable order of every diagram.
    EventVar ordered by "the global event-variable order of the run"
);

/// Opaque, copyable id of a node inside its manager's arena.
///
/// Two ids from the same manager are equal exactly when they name the
/// same canonical node. Unlike the ordered id newtypes, `NodeId`
/// deliberately carries no `Ord`: the index stands in for pointer
/// equality of the canonical representation, and an allocation-order
/// comparison would be meaningless. The total order over nodes is the
/// structural one of
/// [`NodeManager::compare`](crate::NodeManager::compare).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an id from a raw `u32` index.
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

/// One immutable diagram node.
///
/// `Inner` carries the cached extrema of all leaves reachable below it,
/// maintained by the manager at construction time, so `max_leaf` and
/// `min_leaf` queries are O(1) at any node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Node {
    /// A terminal carrying one time value.
    Leaf(Time),
    /// A decision on `var`: `low` is the diagram when the event does not
    /// occur, `high` when it does.
    Inner {
        /// The decision variable.
        var: EventVar,
        /// Child for `var = false`.
        low: NodeId,
        /// Child for `var = true`.
        high: NodeId,
        /// Smallest leaf reachable from this node.
        min: Time,
        /// Largest leaf reachable from this node.
        max: Time,
    },
}

impl Node {
    /// Returns `true` for terminals.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Returns the leaf value.
    ///
    /// # Panics
    ///
    /// Panics when called on an inner node.
    pub fn val(&self) -> Time {
        match self {
            Node::Leaf(v) => *v,
            Node::Inner { .. } => panic!("val() called on an inner node"),
        }
    }

    /// Returns the decision variable.
    ///
    /// # Panics
    ///
    /// Panics when called on a leaf.
    pub fn var(&self) -> EventVar {
        match self {
            Node::Inner { var, .. } => *var,
            Node::Leaf(_) => panic!("var() called on a leaf"),
        }
    }

    /// Returns the `var = false` child.
    ///
    /// # Panics
    ///
    /// Panics when called on a leaf.
    pub fn low(&self) -> NodeId {
        match self {
            Node::Inner { low, .. } => *low,
            Node::Leaf(_) => panic!("low() called on a leaf"),
        }
    }

    /// Returns the `var = true` child.
    ///
    /// # Panics
    ///
    /// Panics when called on a leaf.
    pub fn high(&self) -> NodeId {
        match self {
            Node::Inner { high, .. } => *high,
            Node::Leaf(_) => panic!("high() called on a leaf"),
        }
    }

    /// Largest leaf reachable from this node, from the cached field.
    pub fn max_leaf(&self) -> Time {
        match self {
            Node::Leaf(v) => *v,
            Node::Inner { max, .. } => *max,
        }
    }

    /// Smallest leaf reachable from this node, from the cached field.
    pub fn min_leaf(&self) -> Time {
        match self {
            Node::Leaf(v) => *v,
            Node::Inner { min, .. } => *min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_var_roundtrip_and_order() {
        let a = EventVar::from_raw(3);
        let b = EventVar::from_raw(9);
        assert_eq!(a.as_raw(), 3);
        assert!(a < b);
    }

    #[test]
    fn node_id_roundtrip() {
        let id = NodeId::from_raw(17);
        assert_eq!(id.as_raw(), 17);
        assert_eq!(id, NodeId::from_raw(17));
        assert_ne!(id, NodeId::from_raw(18));
    }

    #[test]
    fn leaf_accessors() {
        let n = Node::Leaf(Time::new(5));
        assert!(n.is_leaf());
        assert_eq!(n.val(), Time::new(5));
        assert_eq!(n.max_leaf(), Time::new(5));
        assert_eq!(n.min_leaf(), Time::new(5));
    }

    #[test]
    fn inner_accessors() {
        let n = Node::Inner {
            var: EventVar::from_raw(1),
            low: NodeId::from_raw(0),
            high: NodeId::from_raw(1),
            min: Time::ZERO,
            max: Time::new(4),
        };
        assert!(!n.is_leaf());
        assert_eq!(n.var(), EventVar::from_raw(1));
        assert_eq!(n.low(), NodeId::from_raw(0));
        assert_eq!(n.high(), NodeId::from_raw(1));
        assert_eq!(n.max_leaf(), Time::new(4));
        assert_eq!(n.min_leaf(), Time::ZERO);
    }

    #[test]
    #[should_panic(expected = "val() called on an inner node")]
    fn val_on_inner_panics() {
        let n = Node::Inner {
            var: EventVar::from_raw(1),
            low: NodeId::from_raw(0),
            high: NodeId::from_raw(1),
            min: Time::ZERO,
            max: Time::ZERO,
        };
        let _ = n.val();
    }

    #[test]
    #[should_panic(expected = "var() called on a leaf")]
    fn var_on_leaf_panics() {
        let _ = Node::Leaf(Time::ZERO).var();
    }

    #[test]
    fn ids_serde_roundtrip() {
        let var = EventVar::from_raw(7);
        let json = serde_json::to_string(&var).unwrap();
        let back: EventVar = serde_json::from_str(&json).unwrap();
        assert_eq!(var, back);

        let id = NodeId::from_raw(12);
        let json = serde_json::to_string(&id).unwrap();
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
