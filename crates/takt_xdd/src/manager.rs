//! The hash-consing node manager.
//!
//! [`NodeManager`] owns the unique set of canonical nodes for one
//! analysis run. It is the only place nodes are created: [`mk_leaf`]
//! and [`mk_node`] look a structural prototype up in the unique table
//! and either return the existing id or allocate exactly one new node.
//! Both are linearizable, so workers on different threads racing to
//! build the same node always observe the same id.
//!
//! Three leaves (`BOT`, `TOP`, `ZERO`) are pre-created so the hot
//! constants never touch the table.
//!
//! [`mk_leaf`]: NodeManager::mk_leaf
//! [`mk_node`]: NodeManager::mk_node

use crate::node::{EventVar, Node, NodeId};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;
use takt_common::Time;
use xxhash_rust::xxh3::Xxh3Builder;

/// Arena plus unique table, updated together under one lock so
/// lookup-or-insert is atomic.
struct NodeStore {
    nodes: Vec<Node>,
    unique: HashMap<Node, NodeId, Xxh3Builder>,
}

impl NodeStore {
    fn node(&self, id: NodeId) -> Node {
        self.nodes[id.as_raw() as usize]
    }
}

/// Owner of all canonical diagram nodes of one analysis run.
///
/// The manager enforces the structural invariants of the diagrams:
/// reduction (`low == high` collapses to the child), uniqueness (one
/// arena slot per equivalence class), and cached leaf extrema. The
/// canonical variable order along paths is maintained by the algebra
/// layer and checked here in debug builds.
pub struct NodeManager {
    store: RwLock<NodeStore>,
    bot: NodeId,
    top: NodeId,
    zero: NodeId,
}

impl NodeManager {
    /// Creates a manager with the three special leaves pre-created.
    pub fn new() -> Self {
        let mut store = NodeStore {
            nodes: Vec::new(),
            unique: HashMap::with_hasher(Xxh3Builder::new()),
        };
        let mut prealloc = |val: Time| {
            let id = NodeId::from_raw(store.nodes.len() as u32);
            let node = Node::Leaf(val);
            store.nodes.push(node);
            store.unique.insert(node, id);
            id
        };
        let bot = prealloc(Time::BOT);
        let top = prealloc(Time::TOP);
        let zero = prealloc(Time::ZERO);
        Self {
            store: RwLock::new(store),
            bot,
            top,
            zero,
        }
    }

    /// The pre-created `BOT` leaf.
    pub fn bot(&self) -> NodeId {
        self.bot
    }

    /// The pre-created `TOP` leaf.
    pub fn top(&self) -> NodeId {
        self.top
    }

    /// The pre-created `ZERO` leaf.
    pub fn zero(&self) -> NodeId {
        self.zero
    }

    /// Returns the unique leaf for `val`.
    pub fn mk_leaf(&self, val: Time) -> NodeId {
        if val == Time::BOT {
            return self.bot;
        }
        if val == Time::TOP {
            return self.top;
        }
        if val == Time::ZERO {
            return self.zero;
        }
        self.intern(Node::Leaf(val))
    }

    /// Returns the unique inner node for `(var, low, high)`.
    ///
    /// When `low == high` the decision is vacuous and the child is
    /// returned instead, so reduced form is preserved by construction.
    ///
    /// # Panics
    ///
    /// Panics when `low` or `high` does not belong to this manager, or
    /// (in debug builds) when `var` would break the strictly increasing
    /// variable order along a path.
    pub fn mk_node(&self, var: EventVar, low: NodeId, high: NodeId) -> NodeId {
        if low == high {
            return low;
        }
        let (lo, hi) = {
            let store = self.store.read().unwrap();
            (store.node(low), store.node(high))
        };
        debug_assert!(
            (lo.is_leaf() || var < lo.var()) && (hi.is_leaf() || var < hi.var()),
            "variable order violated below {var:?}"
        );
        let node = Node::Inner {
            var,
            low,
            high,
            min: lo.min_leaf().min(hi.min_leaf()),
            max: lo.max_leaf().max(hi.max_leaf()),
        };
        self.intern(node)
    }

    /// Atomic lookup-or-insert against the unique table.
    fn intern(&self, node: Node) -> NodeId {
        if let Some(&id) = self.store.read().unwrap().unique.get(&node) {
            return id;
        }
        let mut store = self.store.write().unwrap();
        // Re-probe under the write lock: another thread may have won the
        // race between our read and write acquisitions.
        if let Some(&id) = store.unique.get(&node) {
            return id;
        }
        let id = NodeId::from_raw(store.nodes.len() as u32);
        store.nodes.push(node);
        store.unique.insert(node, id);
        id
    }

    /// Copies out the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was not produced by this manager.
    pub fn node(&self, id: NodeId) -> Node {
        self.store.read().unwrap().node(id)
    }

    /// Returns `true` when `id` names a leaf.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).is_leaf()
    }

    /// Leaf value accessor; panics on inner nodes.
    pub fn val(&self, id: NodeId) -> Time {
        self.node(id).val()
    }

    /// Decision-variable accessor; panics on leaves.
    pub fn var(&self, id: NodeId) -> EventVar {
        self.node(id).var()
    }

    /// `var = false` child accessor; panics on leaves.
    pub fn low(&self, id: NodeId) -> NodeId {
        self.node(id).low()
    }

    /// `var = true` child accessor; panics on leaves.
    pub fn high(&self, id: NodeId) -> NodeId {
        self.node(id).high()
    }

    /// Largest reachable leaf, O(1) from the cached field.
    pub fn max_leaf(&self, id: NodeId) -> Time {
        self.node(id).max_leaf()
    }

    /// Smallest reachable leaf, O(1) from the cached field.
    pub fn min_leaf(&self, id: NodeId) -> Time {
        self.node(id).min_leaf()
    }

    /// Total number of nodes in the unique table.
    pub fn node_count(&self) -> usize {
        self.store.read().unwrap().nodes.len()
    }

    /// Length of the longest root-to-leaf path below `id`.
    pub fn height(&self, id: NodeId) -> usize {
        let store = self.store.read().unwrap();
        fn rec(
            store: &NodeStore,
            id: NodeId,
            memo: &mut rustc_hash::FxHashMap<NodeId, usize>,
        ) -> usize {
            if let Some(&h) = memo.get(&id) {
                return h;
            }
            let h = match store.node(id) {
                Node::Leaf(_) => 0,
                Node::Inner { low, high, .. } => {
                    1 + rec(store, low, memo).max(rec(store, high, memo))
                }
            };
            memo.insert(id, h);
            h
        }
        rec(&store, id, &mut rustc_hash::FxHashMap::default())
    }

    /// All nodes below `id` in deterministic first-visit order: a DFS
    /// that explores `low` before `high`, each node reported once.
    pub fn topological_order(&self, id: NodeId) -> Vec<NodeId> {
        let store = self.store.read().unwrap();
        let mut order = Vec::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if !visited.insert(n) {
                continue;
            }
            order.push(n);
            if let Node::Inner { low, high, .. } = store.node(n) {
                // pushed high-first so low is explored first
                stack.push(high);
                stack.push(low);
            }
        }
        order
    }

    /// The distinct leaves below `id`, in first-visit order.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.topological_order(id)
            .into_iter()
            .filter(|&n| self.is_leaf(n))
            .collect()
    }

    /// The distinct leaf values below `id`, in first-visit order.
    pub fn leaf_values(&self, id: NodeId) -> Vec<Time> {
        self.leaves(id).into_iter().map(|n| self.val(n)).collect()
    }

    /// A total structural order over nodes, for canonical container
    /// layouts: leaves before inner nodes; leaves by value; inner nodes
    /// by variable, then recursively by `high`, then by `low`. Equal ids
    /// short-circuit to `Equal`.
    pub fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        let store = self.store.read().unwrap();
        fn rec(store: &NodeStore, a: NodeId, b: NodeId) -> Ordering {
            if a == b {
                return Ordering::Equal;
            }
            match (store.node(a), store.node(b)) {
                (Node::Leaf(x), Node::Leaf(y)) => x.cmp(&y),
                (Node::Leaf(_), Node::Inner { .. }) => Ordering::Less,
                (Node::Inner { .. }, Node::Leaf(_)) => Ordering::Greater,
                (
                    Node::Inner {
                        var: va,
                        low: la,
                        high: ha,
                        ..
                    },
                    Node::Inner {
                        var: vb,
                        low: lb,
                        high: hb,
                        ..
                    },
                ) => va
                    .cmp(&vb)
                    .then_with(|| rec(store, ha, hb))
                    .then_with(|| rec(store, la, lb)),
            }
        }
        rec(&store, a, b)
    }
}

impl Default for NodeManager {
    fn default() -> Self {
        Self::new()
    }
}
