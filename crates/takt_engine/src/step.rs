//! Execution steps: the per-edge pipeline behavior lowered by the
//! front-end.
//!
//! One [`XStep`] describes one unit of pipeline behavior on an edge's
//! instruction sequence. The timing processor only ever branches on
//! [`XStep::Split`]; every other kind is opaque to it and handed to the
//! step compiler through the resource model.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use takt_cfg::EdgeId;
use takt_common::Time;
use takt_xdd::EventVar;

/// One unit of pipeline behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum XStep {
    /// Occupy a resource slot for a duration of cycles.
    Use {
        /// Index of the occupied slot in the resource-state vector.
        resource: usize,
        /// Occupancy duration; must be finite.
        duration: Time,
    },
    /// Free a resource slot.
    Release {
        /// Index of the freed slot.
        resource: usize,
    },
    /// Event-conditioned cost: `taken` cycles when the event occurs,
    /// `not_taken` otherwise.
    Branch {
        /// The conditioning event variable.
        var: EventVar,
        /// Cost when the event occurs.
        taken: Time,
        /// Cost when it does not.
        not_taken: Time,
    },
    /// Segment boundary emitted by the front-end; carries no pipeline
    /// behavior of its own.
    Split,
}

impl XStep {
    /// Returns `true` for the segment-boundary marker.
    pub fn is_split(&self) -> bool {
        matches!(self, XStep::Split)
    }
}

/// Source of the per-edge step sequences, the seam to the front-end
/// that lowered machine instructions into steps.
pub trait StepSource {
    /// The ordered step sequence of an edge; empty for edges the
    /// front-end produced nothing for.
    fn steps(&self, edge: EdgeId) -> &[XStep];
}

impl StepSource for FxHashMap<EdgeId, Vec<XStep>> {
    fn steps(&self, edge: EdgeId) -> &[XStep] {
        self.get(&edge).map_or(&[], Vec::as_slice)
    }
}
