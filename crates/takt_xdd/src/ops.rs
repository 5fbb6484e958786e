//! The memoized XDD algebra.
//!
//! [`XddManager`] bundles a [`NodeManager`] with the operation memo
//! cache shared by every worker of a run. [`Xdd`] is the user-facing
//! handle: a canonical root plus the `Arc` of the manager that produced
//! it. All operators return canonical diagrams and never mutate their
//! inputs.

use crate::manager::NodeManager;
use crate::node::{EventVar, Node, NodeId};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use takt_common::Time;

/// Tag of a memoized pointwise operator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OpTag {
    /// Saturated addition (the semiring's `⊗`).
    SatAdd,
    /// Saturated subtraction, clamped below at zero.
    SatSub,
    /// Pointwise maximum (the semiring's `⊕`).
    Max,
    /// Pointwise minimum.
    Min,
}

impl OpTag {
    fn eval(self, a: Time, b: Time) -> Time {
        match self {
            OpTag::SatAdd => a.sat_add(b),
            OpTag::SatSub => a.sat_sub(b),
            OpTag::Max => a.max(b),
            OpTag::Min => a.min(b),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    Binary(OpTag, NodeId, NodeId),
    Restrict(NodeId, EventVar, bool),
}

/// Shared node manager plus operation memo cache.
///
/// One `XddManager` serves a whole analysis run; workers share it
/// through an `Arc`. Racing insertions of the same memo key are benign:
/// both threads computed the same canonical id.
pub struct XddManager {
    nodes: NodeManager,
    cache: Mutex<FxHashMap<CacheKey, NodeId>>,
}

impl XddManager {
    /// Creates a manager with an empty memo cache.
    pub fn new() -> Self {
        Self {
            nodes: NodeManager::new(),
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// The underlying node manager.
    pub fn nodes(&self) -> &NodeManager {
        &self.nodes
    }

    /// Drops all memoized results. Observable only through performance.
    pub fn flush_cache(&self) {
        self.cache.lock().unwrap().clear();
    }

    /// Number of memoized results currently held.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    fn cached(&self, key: CacheKey) -> Option<NodeId> {
        self.cache.lock().unwrap().get(&key).copied()
    }

    fn memoize(&self, key: CacheKey, result: NodeId) -> NodeId {
        self.cache.lock().unwrap().insert(key, result);
        result
    }

    /// Shannon-expansion template shared by all binary operators.
    pub(crate) fn apply(&self, op: OpTag, a: NodeId, b: NodeId) -> NodeId {
        let na = self.nodes.node(a);
        let nb = self.nodes.node(b);
        if let (Node::Leaf(x), Node::Leaf(y)) = (na, nb) {
            return self.nodes.mk_leaf(op.eval(x, y));
        }
        let key = CacheKey::Binary(op, a, b);
        if let Some(hit) = self.cached(key) {
            return hit;
        }
        // Expand on the smallest variable present at either root.
        let var = match (na, nb) {
            (Node::Inner { var: va, .. }, Node::Inner { var: vb, .. }) => va.min(vb),
            (Node::Inner { var, .. }, Node::Leaf(_)) => var,
            (Node::Leaf(_), Node::Inner { var, .. }) => var,
            (Node::Leaf(_), Node::Leaf(_)) => unreachable!(),
        };
        let (al, ah) = cofactors(na, a, var);
        let (bl, bh) = cofactors(nb, b, var);
        let low = self.apply(op, al, bl);
        let high = self.apply(op, ah, bh);
        self.memoize(key, self.nodes.mk_node(var, low, high))
    }

    pub(crate) fn restrict(&self, id: NodeId, var: EventVar, value: bool) -> NodeId {
        let node = self.nodes.node(id);
        match node {
            Node::Leaf(_) => id,
            Node::Inner {
                var: v, low, high, ..
            } => {
                if v == var {
                    if value {
                        high
                    } else {
                        low
                    }
                } else if v > var {
                    // canonical order: var cannot occur below v
                    id
                } else {
                    let key = CacheKey::Restrict(id, var, value);
                    if let Some(hit) = self.cached(key) {
                        return hit;
                    }
                    let l = self.restrict(low, var, value);
                    let h = self.restrict(high, var, value);
                    self.memoize(key, self.nodes.mk_node(v, l, h))
                }
            }
        }
    }
}

impl Default for XddManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Cofactors of a node with respect to `var`: the node's children when
/// it decides on `var`, the node itself otherwise.
fn cofactors(node: Node, id: NodeId, var: EventVar) -> (NodeId, NodeId) {
    match node {
        Node::Inner {
            var: v, low, high, ..
        } if v == var => (low, high),
        _ => (id, id),
    }
}

/// A canonical execution-time decision diagram.
///
/// A cheap handle: root id plus the `Arc` of its manager. Two `Xdd`s are
/// equal exactly when they share a manager and a root, which by
/// canonicity means they denote the same function.
#[derive(Clone)]
pub struct Xdd {
    mgr: Arc<XddManager>,
    root: NodeId,
}

impl Xdd {
    /// The diagram consisting of a single leaf.
    pub fn leaf(mgr: &Arc<XddManager>, val: Time) -> Xdd {
        Xdd {
            mgr: Arc::clone(mgr),
            root: mgr.nodes().mk_leaf(val),
        }
    }

    /// A decision on `var` between two existing diagrams.
    ///
    /// # Panics
    ///
    /// Panics when `low` or `high` belongs to a different manager.
    pub fn branch(mgr: &Arc<XddManager>, var: EventVar, low: &Xdd, high: &Xdd) -> Xdd {
        assert!(
            low.same_manager(mgr) && high.same_manager(mgr),
            "cannot build a node from diagrams of a foreign manager"
        );
        Xdd {
            mgr: Arc::clone(mgr),
            root: mgr.nodes().mk_node(var, low.root, high.root),
        }
    }

    /// Wraps an existing canonical root.
    pub(crate) fn from_root(mgr: &Arc<XddManager>, root: NodeId) -> Xdd {
        Xdd {
            mgr: Arc::clone(mgr),
            root,
        }
    }

    /// The canonical root id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The manager that owns this diagram.
    pub fn manager(&self) -> &Arc<XddManager> {
        &self.mgr
    }

    fn same_manager(&self, mgr: &Arc<XddManager>) -> bool {
        Arc::ptr_eq(&self.mgr, mgr)
    }

    fn binary(&self, op: OpTag, rhs: &Xdd) -> Xdd {
        assert!(
            self.same_manager(&rhs.mgr),
            "cannot combine diagrams from different managers"
        );
        Xdd::from_root(&self.mgr, self.mgr.apply(op, self.root, rhs.root))
    }

    /// Pointwise saturated addition.
    pub fn sat_add(&self, rhs: &Xdd) -> Xdd {
        self.binary(OpTag::SatAdd, rhs)
    }

    /// Pointwise saturated subtraction, clamped below at zero.
    pub fn sat_sub(&self, rhs: &Xdd) -> Xdd {
        self.binary(OpTag::SatSub, rhs)
    }

    /// Pointwise maximum.
    pub fn max(&self, rhs: &Xdd) -> Xdd {
        self.binary(OpTag::Max, rhs)
    }

    /// Pointwise minimum.
    pub fn min(&self, rhs: &Xdd) -> Xdd {
        self.binary(OpTag::Min, rhs)
    }

    /// Substitutes a fixed truth value for `var`.
    pub fn restrict(&self, var: EventVar, value: bool) -> Xdd {
        Xdd::from_root(&self.mgr, self.mgr.restrict(self.root, var, value))
    }

    /// Returns `true` for a single-leaf diagram.
    pub fn is_leaf(&self) -> bool {
        self.mgr.nodes().is_leaf(self.root)
    }

    /// Largest leaf of the diagram, O(1).
    pub fn max_leaf(&self) -> Time {
        self.mgr.nodes().max_leaf(self.root)
    }

    /// Smallest leaf of the diagram, O(1).
    pub fn min_leaf(&self) -> Time {
        self.mgr.nodes().min_leaf(self.root)
    }

    /// Length of the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.mgr.nodes().height(self.root)
    }

    /// Number of distinct nodes in the diagram.
    pub fn node_count(&self) -> usize {
        self.mgr.nodes().topological_order(self.root).len()
    }

    /// Distinct leaf values in deterministic first-visit order.
    pub fn leaf_values(&self) -> Vec<Time> {
        self.mgr.nodes().leaf_values(self.root)
    }
}

impl PartialEq for Xdd {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.mgr, &other.mgr) && self.root == other.root
    }
}

impl Eq for Xdd {}

impl fmt::Display for Xdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn rec(mgr: &XddManager, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match mgr.nodes().node(id) {
                Node::Leaf(v) => write!(f, "{v}"),
                Node::Inner {
                    var, low, high, ..
                } => {
                    write!(f, "(e{}? ", var.as_raw())?;
                    rec(mgr, high, f)?;
                    write!(f, " : ")?;
                    rec(mgr, low, f)?;
                    write!(f, ")")
                }
            }
        }
        rec(&self.mgr, self.root, f)
    }
}

impl fmt::Debug for Xdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Xdd({self})")
    }
}
