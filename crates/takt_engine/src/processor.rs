//! The local-edge timing processor.
//!
//! Computes, for every in-edge of every basic block, the bag of segment
//! time diagrams of that edge in isolation. The step sequence is
//! partitioned at its split markers; each segment is compiled to one
//! matrix, applied to the edge's timing state, and the resulting time
//! diagram appended to the edge's bag. After a split the state is
//! rebased so later segments measure deltas; the bag's saturated sum is
//! therefore independent of where (and whether) the front-end placed
//! splits.

use crate::compiler::StepCompiler;
use crate::config::AnalysisConfig;
use crate::error::EngineError;
use crate::features::{
    bbtimes_feature, local_bbtimes_feature, pipeline_engine_feature, steps_feature,
};
use crate::resource::ResourceModel;
use crate::scheduler::{run_jobs, EdgeJobProducer};
use crate::state::TimingState;
use crate::stats::MatrixStats;
use crate::step::{StepSource, XStep};
use std::sync::Arc;
use takt_cfg::{feature_name, EdgeId, Workspace};
use takt_common::Time;
use takt_xdd::XddManager;

/// Per-edge timing driver.
///
/// One processor serves a whole analysis run; its workers share the
/// diagram manager, the memo cache, and (when enabled) the statistics
/// collector.
pub struct LocalTimeProcessor {
    mgr: Arc<XddManager>,
    model: Arc<dyn ResourceModel>,
    config: AnalysisConfig,
    compiler: StepCompiler,
    stats: Option<MatrixStats>,
}

impl LocalTimeProcessor {
    /// Creates a processor over the shared manager and model.
    ///
    /// The configuration is expected to have passed setup validation;
    /// statistics collection is armed here when enabled.
    pub fn new(
        mgr: Arc<XddManager>,
        model: Arc<dyn ResourceModel>,
        config: AnalysisConfig,
    ) -> Self {
        let compiler = StepCompiler::new(Arc::clone(&mgr), Arc::clone(&model));
        let stats = config.stats.then(MatrixStats::new);
        Self {
            mgr,
            model,
            config,
            compiler,
            stats,
        }
    }

    /// The shared diagram manager.
    pub fn manager(&self) -> &Arc<XddManager> {
        &self.mgr
    }

    /// The statistics collector, when enabled.
    pub fn stats(&self) -> Option<&MatrixStats> {
        self.stats.as_ref()
    }

    /// Runs the analysis over every basic-block in-edge of the
    /// workspace.
    ///
    /// Requires the steps and pipeline-engine features; provides the
    /// local and plain time-bag features on success. With
    /// `workers == 0` edges are processed sequentially in program
    /// order; otherwise a pool of that many workers shares the managers.
    /// On failure the first failing edge in program order is reported
    /// and carries no time marks.
    pub fn process_all<S>(&self, ws: &Workspace, steps: &S) -> Result<(), EngineError>
    where
        S: StepSource + Sync,
    {
        for required in [steps_feature(), pipeline_engine_feature()] {
            if !ws.has_feature(required) {
                return Err(EngineError::MissingFeature(
                    feature_name(required).to_string(),
                ));
            }
        }
        if let Some(stats) = &self.stats {
            stats.start();
        }

        let producer = EdgeJobProducer::new(ws.cfg());
        let results = run_jobs(producer, self.config.workers, |edge| {
            self.process_edge(ws, steps, edge)
        })?;
        for (_, result) in results {
            result?;
        }

        ws.mark_feature(local_bbtimes_feature());
        ws.mark_feature(bbtimes_feature());
        if let Some(stats) = &self.stats {
            stats.stop();
            stats.dump();
        }
        Ok(())
    }

    /// Computes the time bag of one edge.
    ///
    /// On error the edge's partial bag is dropped, so a failed edge
    /// carries no marks.
    pub fn process_edge<S>(
        &self,
        ws: &Workspace,
        steps: &S,
        edge: EdgeId,
    ) -> Result<(), EngineError>
    where
        S: StepSource,
    {
        let result = self.process_edge_inner(ws, steps, edge);
        if result.is_err() {
            ws.clear_times(edge);
        }
        result
    }

    fn process_edge_inner<S>(
        &self,
        ws: &Workspace,
        steps: &S,
        edge: EdgeId,
    ) -> Result<(), EngineError>
    where
        S: StepSource,
    {
        let sequence = steps.steps(edge);
        let mut state = TimingState::new(self.model.as_ref(), &self.mgr);
        let mut buffer: Vec<XStep> = Vec::new();

        for step in sequence {
            if step.is_split() {
                self.compute_segment(ws, edge, &buffer, &mut state)?;
                buffer.clear();
                state.rebase();
            } else {
                buffer.push(step.clone());
            }
        }
        if !buffer.is_empty() {
            self.compute_segment(ws, edge, &buffer, &mut state)?;
        }
        Ok(())
    }

    /// Compiles one buffered segment, applies it, and records the
    /// resulting time diagram on the edge.
    fn compute_segment(
        &self,
        ws: &Workspace,
        edge: EdgeId,
        segment: &[XStep],
        state: &mut TimingState,
    ) -> Result<(), EngineError> {
        let matrix = self.compiler.compile(segment)?;
        if let Some(stats) = &self.stats {
            stats.record(&matrix);
        }
        state.apply(&matrix);
        let time = state.time();
        if time.max_leaf() < Time::ZERO {
            return Err(EngineError::TimeInvariant { edge });
        }
        tracing::debug!(edge = edge.as_raw(), time = %time, "segment time");
        ws.add_time(edge, time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ScalarPipelineModel;
    use rustc_hash::FxHashMap;
    use takt_cfg::{BlockKind, Cfg};
    use takt_xdd::{EventVar, Xdd};

    type StepMap = FxHashMap<EdgeId, Vec<XStep>>;

    fn single_edge_ws() -> (Workspace, EdgeId) {
        let mut cfg = Cfg::new();
        let entry = cfg.add_block("entry", BlockKind::Entry);
        let bb = cfg.add_block("bb", BlockKind::Basic);
        let e = cfg.add_edge(entry, bb);
        let ws = Workspace::new(cfg);
        ws.mark_feature(steps_feature());
        ws.mark_feature(pipeline_engine_feature());
        (ws, e)
    }

    fn processor(workers: usize) -> LocalTimeProcessor {
        let mgr = Arc::new(XddManager::new());
        let model = Arc::new(ScalarPipelineModel::new(2, 0));
        let mut config = AnalysisConfig::default();
        config.workers = workers;
        LocalTimeProcessor::new(mgr, model, config)
    }

    fn use_step(duration: i64) -> XStep {
        XStep::Use {
            resource: 1,
            duration: Time::new(duration),
        }
    }

    #[test]
    fn missing_features_rejected() {
        let mut cfg = Cfg::new();
        cfg.add_block("bb", BlockKind::Basic);
        let ws = Workspace::new(cfg);
        let proc = processor(0);
        let err = proc.process_all(&ws, &StepMap::default()).unwrap_err();
        assert!(matches!(err, EngineError::MissingFeature(_)));
    }

    #[test]
    fn empty_sequence_leaves_empty_bag() {
        let (ws, e) = single_edge_ws();
        let proc = processor(0);
        proc.process_all(&ws, &StepMap::default()).unwrap();
        assert!(ws.times(e).is_empty());
        assert_eq!(ws.total_time(e), Time::ZERO);
        assert!(ws.has_feature(local_bbtimes_feature()));
        assert!(ws.has_feature(bbtimes_feature()));
    }

    #[test]
    fn single_use_yields_one_leaf() {
        let (ws, e) = single_edge_ws();
        let proc = processor(0);
        let mut steps = StepMap::default();
        steps.insert(e, vec![use_step(5)]);
        proc.process_all(&ws, &steps).unwrap();

        let bag = ws.times(e);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag[0], Xdd::leaf(proc.manager(), Time::new(5)));
        assert_eq!(ws.total_time(e), Time::new(5));
    }

    #[test]
    fn branch_yields_conditioned_diagram() {
        let (ws, e) = single_edge_ws();
        let proc = processor(0);
        let mut steps = StepMap::default();
        steps.insert(
            e,
            vec![XStep::Branch {
                var: EventVar::from_raw(1),
                taken: Time::new(3),
                not_taken: Time::new(1),
            }],
        );
        proc.process_all(&ws, &steps).unwrap();

        let bag = ws.times(e);
        assert_eq!(bag.len(), 1);
        let m = proc.manager();
        let expect = Xdd::branch(
            m,
            EventVar::from_raw(1),
            &Xdd::leaf(m, Time::new(1)),
            &Xdd::leaf(m, Time::new(3)),
        );
        assert_eq!(bag[0], expect);
    }

    #[test]
    fn split_partitions_into_deltas() {
        let (ws, e) = single_edge_ws();
        let proc = processor(0);
        let mut steps = StepMap::default();
        steps.insert(e, vec![use_step(4), XStep::Split, use_step(6)]);
        proc.process_all(&ws, &steps).unwrap();

        let bag = ws.times(e);
        let m = proc.manager();
        assert_eq!(bag.len(), 2);
        assert_eq!(bag[0], Xdd::leaf(m, Time::new(4)));
        assert_eq!(bag[1], Xdd::leaf(m, Time::new(6)));
        assert_eq!(ws.total_time(e), Time::new(10));
    }

    #[test]
    fn trailing_split_adds_no_entry() {
        let (ws, e) = single_edge_ws();
        let proc = processor(0);
        let mut steps = StepMap::default();
        steps.insert(e, vec![use_step(4), XStep::Split]);
        proc.process_all(&ws, &steps).unwrap();
        assert_eq!(ws.times(e).len(), 1);
        assert_eq!(ws.total_time(e), Time::new(4));
    }

    #[test]
    fn zero_cost_branch_reduces_to_pre_segment_time() {
        let (ws, e) = single_edge_ws();
        let proc = processor(0);
        let mut steps = StepMap::default();
        steps.insert(
            e,
            vec![XStep::Branch {
                var: EventVar::from_raw(1),
                taken: Time::ZERO,
                not_taken: Time::ZERO,
            }],
        );
        proc.process_all(&ws, &steps).unwrap();

        let bag = ws.times(e);
        assert_eq!(bag.len(), 1);
        // the vacuous decision collapsed: no inner node, just the
        // pre-segment zero leaf
        assert!(bag[0].is_leaf());
        assert_eq!(bag[0], Xdd::leaf(proc.manager(), Time::ZERO));
    }

    #[test]
    fn split_placement_does_not_change_the_sum() {
        let with_splits = vec![
            use_step(2),
            XStep::Split,
            XStep::Branch {
                var: EventVar::from_raw(1),
                taken: Time::new(3),
                not_taken: Time::new(1),
            },
            XStep::Split,
            use_step(7),
        ];
        let without: Vec<XStep> = with_splits
            .iter()
            .filter(|s| !s.is_split())
            .cloned()
            .collect();

        let mut totals = Vec::new();
        for sequence in [with_splits, without] {
            let (ws, e) = single_edge_ws();
            let proc = processor(0);
            let mut steps = StepMap::default();
            steps.insert(e, sequence);
            proc.process_all(&ws, &steps).unwrap();
            totals.push((
                ws.total(e).unwrap().leaf_values(),
                ws.total_time(e),
            ));
        }
        assert_eq!(totals[0], totals[1]);
        assert_eq!(totals[0].1, Time::new(12));
    }

    #[test]
    fn model_failure_names_edge_and_clears_bag() {
        let (ws, e) = single_edge_ws();
        let proc = processor(0);
        let mut steps = StepMap::default();
        // second segment fails after the first already recorded a time
        steps.insert(
            e,
            vec![
                use_step(4),
                XStep::Split,
                XStep::Use {
                    resource: 9,
                    duration: Time::new(1),
                },
            ],
        );
        let err = proc.process_all(&ws, &steps).unwrap_err();
        assert!(matches!(err, EngineError::ResourceModel { .. }));
        assert!(ws.times(e).is_empty());
        assert!(!ws.has_feature(bbtimes_feature()));
    }
}
