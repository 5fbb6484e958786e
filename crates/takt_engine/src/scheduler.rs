//! The edge-job producer and the worker pool.
//!
//! [`EdgeJobProducer`] is a lazy, finite, non-restartable sequence of
//! edge jobs in deterministic program order: blocks in CFG order,
//! non-basic blocks skipped, one job per in-edge. The pool is
//! orthogonal: [`run_jobs`] drains the producer either sequentially or
//! on a dedicated rayon pool. Every job is a pure function of its
//! edge's inputs, so no cross-edge ordering is needed.

use crate::error::EngineError;
use rayon::prelude::*;
use std::collections::VecDeque;
use takt_cfg::{Cfg, EdgeId};

/// Lazy producer of per-edge jobs in program order.
pub struct EdgeJobProducer<'a> {
    cfg: &'a Cfg,
    next_block: usize,
    pending: VecDeque<EdgeId>,
}

impl<'a> EdgeJobProducer<'a> {
    /// A producer over all basic-block in-edges of the CFG.
    pub fn new(cfg: &'a Cfg) -> Self {
        Self {
            cfg,
            next_block: 0,
            pending: VecDeque::new(),
        }
    }

    fn refill(&mut self) {
        while self.pending.is_empty() && self.next_block < self.cfg.blocks.len() {
            let block = &self.cfg.blocks[self.next_block];
            self.next_block += 1;
            if !block.is_basic() {
                continue;
            }
            self.pending
                .extend(self.cfg.in_edges(block.id).iter().map(|e| e.id));
        }
    }
}

impl Iterator for EdgeJobProducer<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        self.refill();
        self.pending.pop_front()
    }
}

/// Drains the producer, running `job` once per edge.
///
/// `workers == 0` runs jobs sequentially on the calling thread, in
/// producer order. Otherwise a rayon pool of exactly `workers` threads
/// executes them. Results are returned in producer order either way.
pub fn run_jobs<F>(
    producer: EdgeJobProducer<'_>,
    workers: usize,
    job: F,
) -> Result<Vec<(EdgeId, Result<(), EngineError>)>, EngineError>
where
    F: Fn(EdgeId) -> Result<(), EngineError> + Sync,
{
    let edges: Vec<EdgeId> = producer.collect();
    if workers == 0 {
        return Ok(edges.into_iter().map(|e| (e, job(e))).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
    Ok(pool.install(|| edges.par_iter().map(|&e| (e, job(e))).collect()))
}
