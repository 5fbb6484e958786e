//! Error types of the timing engine.

use crate::config::ConfigError;
use takt_cfg::EdgeId;

/// Errors surfaced by the timing engine.
///
/// All of them are fatal for the enclosing analysis: the engine is
/// deterministic, so retrying would reproduce the same failure.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A required feature is missing from the workspace; the producing
    /// analysis did not run.
    #[error("required feature '{0}' is not established on the workspace")]
    MissingFeature(String),

    /// The resource model could not produce a primitive matrix for a
    /// step.
    #[error("resource model error: {reason}")]
    ResourceModel {
        /// Why the model rejected the step.
        reason: String,
    },

    /// The time slot lost feasibility after a segment matrix was
    /// applied; the resource model is broken.
    #[error("time diagram of edge {edge:?} has no feasible value after a segment")]
    TimeInvariant {
        /// The first edge on which the invariant broke.
        edge: EdgeId,
    },

    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Invalid analysis configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_feature() {
        let err = EngineError::MissingFeature("takt::engine::XSTEPS".into());
        assert_eq!(
            format!("{err}"),
            "required feature 'takt::engine::XSTEPS' is not established on the workspace"
        );
    }

    #[test]
    fn display_time_invariant_names_edge() {
        let err = EngineError::TimeInvariant {
            edge: EdgeId::from_raw(3),
        };
        assert!(format!("{err}").contains("EdgeId(3)"));
    }

    #[test]
    fn config_error_converts() {
        let cfg_err = ConfigError::UnknownKey("splat-threshold".into());
        let err: EngineError = cfg_err.into();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
