//! The pipeline resource model seam.
//!
//! A [`ResourceModel`] describes the pipeline being analyzed: the shape
//! of the resource-state vector, which slot is the time pointer, and
//! how each execution step translates into a primitive matrix over that
//! vector. Production models mirror a concrete microarchitecture and
//! live outside this crate; [`ScalarPipelineModel`] is the built-in
//! model used by drivers and tests.

use crate::error::EngineError;
use crate::step::XStep;
use std::sync::Arc;
use takt_common::Time;
use takt_xdd::{Xdd, XddManager, XddMatrix, XddVector};

/// Description of the analyzed pipeline.
///
/// The model fixes the event-variable order implicitly: variables are
/// compared by their raw index, and the front-end must number events
/// consistently with the order it emits steps in.
pub trait ResourceModel: Send + Sync {
    /// Length of the resource-state vector.
    fn state_len(&self) -> usize;

    /// Index of the time pointer inside the state vector.
    fn time_idx(&self) -> usize;

    /// The state at the start of an edge: time at `ZERO`, other slots
    /// as the model specifies.
    fn initial_state(&self, mgr: &Arc<XddManager>) -> XddVector;

    /// The primitive matrix of one non-split step.
    ///
    /// `Split` carries no pipeline behavior and is rejected with a
    /// model error; the timing processor never forwards it.
    fn primitive_matrix(
        &self,
        mgr: &Arc<XddManager>,
        step: &XStep,
    ) -> Result<XddMatrix, EngineError>;
}

/// The built-in scalar pipeline model.
///
/// Every slot other than the time pointer tracks the cycle at which one
/// resource becomes free. `Use` advances time and pushes the resource's
/// free-cycle to `now + duration`, `Release` pulls it back to `now`,
/// and `Branch` advances time by an event-conditioned diagram.
pub struct ScalarPipelineModel {
    slots: usize,
    time_idx: usize,
}

impl ScalarPipelineModel {
    /// A model with `slots` state slots, slot `time_idx` being the time
    /// pointer.
    ///
    /// # Panics
    ///
    /// Panics when `time_idx` is out of range.
    pub fn new(slots: usize, time_idx: usize) -> Self {
        assert!(time_idx < slots, "time pointer outside the state vector");
        Self { slots, time_idx }
    }

    fn check_slot(&self, resource: usize) -> Result<(), EngineError> {
        if resource >= self.slots || resource == self.time_idx {
            return Err(EngineError::ResourceModel {
                reason: format!("step references invalid resource slot {resource}"),
            });
        }
        Ok(())
    }
}

impl ResourceModel for ScalarPipelineModel {
    fn state_len(&self) -> usize {
        self.slots
    }

    fn time_idx(&self) -> usize {
        self.time_idx
    }

    fn initial_state(&self, mgr: &Arc<XddManager>) -> XddVector {
        XddVector::filled(mgr, self.slots, Time::ZERO)
    }

    fn primitive_matrix(
        &self,
        mgr: &Arc<XddManager>,
        step: &XStep,
    ) -> Result<XddMatrix, EngineError> {
        let t = self.time_idx;
        let mut mat = XddMatrix::identity(mgr, self.slots);
        match step {
            XStep::Use { resource, duration } => {
                self.check_slot(*resource)?;
                if !duration.is_finite() || *duration < Time::ZERO {
                    return Err(EngineError::ResourceModel {
                        reason: format!("use of slot {resource} with invalid duration {duration}"),
                    });
                }
                let d = Xdd::leaf(mgr, *duration);
                // time advances by d, and the resource is busy until then
                mat.set(t, t, &d);
                mat.set(t, *resource, &d);
            }
            XStep::Release { resource } => {
                self.check_slot(*resource)?;
                // the slot becomes the current time: free from now on
                let bot = Xdd::leaf(mgr, Time::BOT);
                mat.set(*resource, *resource, &bot);
                mat.set(t, *resource, &Xdd::leaf(mgr, Time::ZERO));
            }
            XStep::Branch {
                var,
                taken,
                not_taken,
            } => {
                if !taken.is_finite() || !not_taken.is_finite() {
                    return Err(EngineError::ResourceModel {
                        reason: format!("branch on e{} with non-finite cost", var.as_raw()),
                    });
                }
                let cost = Xdd::branch(
                    mgr,
                    *var,
                    &Xdd::leaf(mgr, *not_taken),
                    &Xdd::leaf(mgr, *taken),
                );
                mat.set(t, t, &cost);
            }
            XStep::Split => {
                return Err(EngineError::ResourceModel {
                    reason: "split markers have no primitive matrix".into(),
                });
            }
        }
        Ok(mat)
    }
}
