//! Dense matrices and vectors of diagrams over the tropical semiring.
//!
//! An [`XddMatrix`] is the symbolic linear transform a compiled step
//! sequence applies to the resource-state vector: `⊕` is pointwise
//! maximum and `⊗` saturated addition, both lifted to diagrams.
//! Matrices are transient: their cells are shared canonical roots, so
//! dropping a matrix drops nothing but the index structure.

use crate::node::NodeId;
use crate::ops::{OpTag, Xdd, XddManager};
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;
use takt_common::Time;

/// A dense `n × n` matrix of diagrams, row-major.
#[derive(Clone)]
pub struct XddMatrix {
    mgr: Arc<XddManager>,
    n: usize,
    cells: Vec<NodeId>,
}

impl XddMatrix {
    /// The multiplicative identity: `ZERO` on the diagonal, `BOT`
    /// elsewhere.
    pub fn identity(mgr: &Arc<XddManager>, n: usize) -> Self {
        let zero = mgr.nodes().zero();
        let bot = mgr.nodes().bot();
        let mut cells = vec![bot; n * n];
        for i in 0..n {
            cells[i * n + i] = zero;
        }
        Self {
            mgr: Arc::clone(mgr),
            n,
            cells,
        }
    }

    /// The dimension `n`.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// The manager the cells belong to.
    pub fn manager(&self) -> &Arc<XddManager> {
        &self.mgr
    }

    /// The cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Xdd {
        Xdd::from_root(&self.mgr, self.cells[row * self.n + col])
    }

    /// Replaces the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics when `value` belongs to a different manager.
    pub fn set(&mut self, row: usize, col: usize, value: &Xdd) {
        assert!(
            Arc::ptr_eq(value.manager(), &self.mgr),
            "matrix cell from a different manager"
        );
        self.cells[row * self.n + col] = value.root();
    }

    /// Matrix product: `(self · rhs)[i][j] = ⊕ₖ self[i][k] ⊗ rhs[k][j]`.
    ///
    /// # Panics
    ///
    /// Panics on dimension mismatch or foreign manager.
    pub fn multiply(&self, rhs: &XddMatrix) -> XddMatrix {
        assert!(
            Arc::ptr_eq(&self.mgr, &rhs.mgr),
            "matrix product across managers"
        );
        assert_eq!(self.n, rhs.n, "matrix dimension mismatch");
        let n = self.n;
        let bot = self.mgr.nodes().bot();
        let mut cells = vec![bot; n * n];
        for i in 0..n {
            for j in 0..n {
                let mut acc = bot;
                for k in 0..n {
                    let term =
                        self.mgr
                            .apply(OpTag::SatAdd, self.cells[i * n + k], rhs.cells[k * n + j]);
                    acc = self.mgr.apply(OpTag::Max, acc, term);
                }
                cells[i * n + j] = acc;
            }
        }
        XddMatrix {
            mgr: Arc::clone(&self.mgr),
            n,
            cells,
        }
    }

    /// Number of distinct nodes across all cells.
    pub fn node_count(&self) -> usize {
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        for &cell in &self.cells {
            seen.extend(self.mgr.nodes().topological_order(cell));
        }
        seen.len()
    }

    /// Number of distinct leaves across all cells.
    pub fn leaf_count(&self) -> usize {
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        for &cell in &self.cells {
            seen.extend(self.mgr.nodes().leaves(cell));
        }
        seen.len()
    }
}

impl PartialEq for XddMatrix {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.mgr, &other.mgr) && self.n == other.n && self.cells == other.cells
    }
}

impl Eq for XddMatrix {}

impl fmt::Debug for XddMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "XddMatrix {}x{} [", self.n, self.n)?;
        for i in 0..self.n {
            write!(f, "  ")?;
            for j in 0..self.n {
                write!(f, "{} ", self.get(i, j))?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}

/// A fixed-length vector of diagrams, the symbolic resource state.
#[derive(Clone)]
pub struct XddVector {
    mgr: Arc<XddManager>,
    cells: Vec<NodeId>,
}

impl XddVector {
    /// A vector with every slot set to the leaf for `val`.
    pub fn filled(mgr: &Arc<XddManager>, len: usize, val: Time) -> Self {
        let leaf = mgr.nodes().mk_leaf(val);
        Self {
            mgr: Arc::clone(mgr),
            cells: vec![leaf; len],
        }
    }

    /// The vector length.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` for a zero-length vector.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The manager the slots belong to.
    pub fn manager(&self) -> &Arc<XddManager> {
        &self.mgr
    }

    /// The diagram in slot `idx`.
    pub fn get(&self, idx: usize) -> Xdd {
        Xdd::from_root(&self.mgr, self.cells[idx])
    }

    /// Replaces slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics when `value` belongs to a different manager.
    pub fn set(&mut self, idx: usize, value: &Xdd) {
        assert!(
            Arc::ptr_eq(value.manager(), &self.mgr),
            "vector slot from a different manager"
        );
        self.cells[idx] = value.root();
    }

    /// In-place row-vector × matrix product:
    /// `v'[j] = ⊕ᵢ v[i] ⊗ M[i][j]`.
    ///
    /// # Panics
    ///
    /// Panics on dimension mismatch or foreign manager.
    pub fn vec_times_mat(&mut self, m: &XddMatrix) {
        assert!(
            Arc::ptr_eq(&self.mgr, &m.mgr),
            "vector-matrix product across managers"
        );
        assert_eq!(self.cells.len(), m.n, "vector-matrix dimension mismatch");
        let n = m.n;
        let bot = self.mgr.nodes().bot();
        let mut out = vec![bot; n];
        for (j, slot) in out.iter_mut().enumerate() {
            let mut acc = bot;
            for i in 0..n {
                let term = self
                    .mgr
                    .apply(OpTag::SatAdd, self.cells[i], m.cells[i * n + j]);
                acc = self.mgr.apply(OpTag::Max, acc, term);
            }
            *slot = acc;
        }
        self.cells = out;
    }

    /// Saturated subtraction of `base` from every slot, the rebase step
    /// at a split boundary.
    pub fn sub_all(&mut self, base: &Xdd) {
        assert!(
            Arc::ptr_eq(base.manager(), &self.mgr),
            "rebase with a diagram from a different manager"
        );
        for cell in &mut self.cells {
            *cell = self.mgr.apply(OpTag::SatSub, *cell, base.root());
        }
    }
}

impl PartialEq for XddVector {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.mgr, &other.mgr) && self.cells == other.cells
    }
}

impl Eq for XddVector {}

impl fmt::Debug for XddVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XddVector [")?;
        for (i, &cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", Xdd::from_root(&self.mgr, cell))?;
        }
        write!(f, "]")
    }
}
