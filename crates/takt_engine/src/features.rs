//! Well-known feature keys of the timing engine.
//!
//! Features record, on the workspace, which analyses have run and what
//! inputs they guarantee. The timing processor requires the steps and
//! pipeline-engine features (established by the front-end and the model
//! provider) and provides the two time-bag features on success.

use takt_cfg::{feature, FeatureId};

/// Established by the step front-end once every edge carries its step
/// sequence.
pub fn steps_feature() -> FeatureId {
    feature("takt::engine::XSTEPS")
}

/// Established once a pipeline resource model is attached to the run.
pub fn pipeline_engine_feature() -> FeatureId {
    feature("takt::engine::PIPELINE_ENGINE")
}

/// An isolated time diagram has been computed for every basic block
/// in-edge.
pub fn local_bbtimes_feature() -> FeatureId {
    feature("takt::engine::LOCAL_BBTIMES")
}

/// Per-edge time bags are available; summing a bag yields the edge's
/// time.
pub fn bbtimes_feature() -> FeatureId {
    feature("takt::engine::BBTIMES")
}

#[cfg(test)]
mod tests {
    use super::*;
    use takt_cfg::feature_name;

    #[test]
    fn keys_are_stable() {
        assert_eq!(feature_name(steps_feature()), "takt::engine::XSTEPS");
        assert_eq!(
            feature_name(local_bbtimes_feature()),
            "takt::engine::LOCAL_BBTIMES"
        );
        assert_eq!(feature_name(bbtimes_feature()), "takt::engine::BBTIMES");
        assert_eq!(
            feature_name(pipeline_engine_feature()),
            "takt::engine::PIPELINE_ENGINE"
        );
    }

    #[test]
    fn distinct_features() {
        assert_ne!(local_bbtimes_feature(), bbtimes_feature());
        assert_ne!(steps_feature(), pipeline_engine_feature());
    }
}
