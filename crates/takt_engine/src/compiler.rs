//! The step-sequence matrix compiler.
//!
//! Compiles a contiguous, split-free slice of execution steps into one
//! matrix: the sequential composition of the steps' primitive matrices.
//! The split markers the processor strips upstream bound how many steps
//! reach one compilation, which keeps the intermediate diagrams small.

use crate::error::EngineError;
use crate::resource::ResourceModel;
use crate::step::XStep;
use std::sync::Arc;
use takt_xdd::{XddManager, XddMatrix};

/// Compiles step slices against one resource model.
pub struct StepCompiler {
    mgr: Arc<XddManager>,
    model: Arc<dyn ResourceModel>,
}

impl StepCompiler {
    /// Creates a compiler over the shared manager and model.
    pub fn new(mgr: Arc<XddManager>, model: Arc<dyn ResourceModel>) -> Self {
        Self { mgr, model }
    }

    /// The sequential composition of the steps' primitive matrices.
    ///
    /// An empty slice compiles to the identity. Steps are post-
    /// multiplied in execution order, so applying the result to a state
    /// vector equals applying each step's matrix in turn.
    pub fn compile(&self, steps: &[XStep]) -> Result<XddMatrix, EngineError> {
        let mut result = XddMatrix::identity(&self.mgr, self.model.state_len());
        for step in steps {
            let primitive = self.model.primitive_matrix(&self.mgr, step)?;
            result = result.multiply(&primitive);
        }
        Ok(result)
    }
}
