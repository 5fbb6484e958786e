//! Control-flow graphs, the feature registry, and the analysis
//! workspace for the Takt WCET analyzer.
//!
//! The timing engine consumes a [`Cfg`] built by the front-end and
//! writes its results into a [`Workspace`]: one bag of time diagrams
//! per processed edge, plus feature marks recording which analyses have
//! run.

#![warn(missing_docs)]

pub mod graph;
pub mod ids;
pub mod registry;
pub mod workspace;

pub use graph::{Block, BlockKind, Cfg, Edge};
pub use ids::{BlockId, EdgeId};
pub use registry::{feature, feature_name, FeatureId};
pub use workspace::Workspace;
