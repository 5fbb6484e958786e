//! The per-edge pipeline timing engine of the Takt WCET analyzer.
//!
//! For every in-edge of every basic block, the engine walks the edge's
//! execution-step sequence, compiles each split-delimited segment into
//! a matrix of execution-time decision diagrams, threads the resource
//! state through it, and hooks the resulting time diagrams onto the
//! edge. Edges are independent, so the work parallelizes over a worker
//! pool sharing one diagram manager.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use takt_engine::{AnalysisConfig, LocalTimeProcessor, ScalarPipelineModel};
//! use takt_xdd::XddManager;
//!
//! let mgr = Arc::new(XddManager::new());
//! let model = Arc::new(ScalarPipelineModel::new(4, 0));
//! let processor = LocalTimeProcessor::new(mgr, model, AnalysisConfig::default());
//! processor.process_all(&workspace, &steps)?;
//! let wcet = workspace.total_time(edge);
//! ```
//!
//! # Architecture
//!
//! - [`step`] — execution-step records and the front-end seam
//! - [`resource`] — the pipeline resource-model seam
//! - [`compiler`] — step-sequence to matrix compilation
//! - [`state`] — the per-edge timing state vector
//! - [`processor`] — the local-edge timing driver
//! - [`scheduler`] — the edge-job producer and worker pool
//! - [`stats`] — optional per-matrix statistics
//! - [`config`] — analysis configuration loading and validation

#![warn(missing_docs)]

pub mod compiler;
pub mod config;
pub mod error;
pub mod features;
pub mod processor;
pub mod resource;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod step;

pub use compiler::StepCompiler;
pub use config::{AnalysisConfig, ConfigError};
pub use error::EngineError;
pub use processor::LocalTimeProcessor;
pub use resource::{ResourceModel, ScalarPipelineModel};
pub use scheduler::{run_jobs, EdgeJobProducer};
pub use state::TimingState;
pub use stats::{MatrixStats, MatrixStatsReport};
pub use step::{StepSource, XStep};
