//! The per-edge timing state.
//!
//! A [`TimingState`] is the resource-state vector threaded along one
//! edge's step sequence, with the model's time pointer singled out. It
//! is created per edge, mutated in place by segment matrices, and
//! dropped at edge end; it is never shared between workers.

use crate::resource::ResourceModel;
use std::sync::Arc;
use takt_xdd::{Xdd, XddManager, XddMatrix, XddVector};

/// The symbolic resource state of one edge in flight.
pub struct TimingState {
    vec: XddVector,
    time_idx: usize,
}

impl TimingState {
    /// The initial state of the model.
    pub fn new(model: &dyn ResourceModel, mgr: &Arc<XddManager>) -> Self {
        Self {
            vec: model.initial_state(mgr),
            time_idx: model.time_idx(),
        }
    }

    /// The time diagram: the slot the time pointer designates.
    pub fn time(&self) -> Xdd {
        self.vec.get(self.time_idx)
    }

    /// Applies one compiled segment matrix in place.
    pub fn apply(&mut self, matrix: &XddMatrix) {
        self.vec.vec_times_mat(matrix);
    }

    /// Rebases the state at a split boundary: subtracts the current
    /// time diagram from every slot, so following segments measure
    /// deltas.
    pub fn rebase(&mut self) {
        let base = self.time();
        self.vec.sub_all(&base);
    }

    /// The underlying vector.
    pub fn vector(&self) -> &XddVector {
        &self.vec
    }
}
