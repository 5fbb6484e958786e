//! Optional statistics over compiled segment matrices.
//!
//! When enabled by configuration, a [`MatrixStats`] collector is
//! started at analysis setup, fed one sample per compiled matrix, and
//! stopped and dumped at teardown. Multiple workers record samples
//! concurrently. Collection never alters analysis results.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use takt_xdd::XddMatrix;

struct StatsInner {
    started_at: Option<Instant>,
    elapsed: Option<Duration>,
    node_counts: Vec<usize>,
    leaf_counts: Vec<usize>,
}

/// Thread-safe accumulator of per-matrix size samples.
///
/// The sample count is tracked atomically so a cheap progress probe
/// never takes the lock.
pub struct MatrixStats {
    inner: Mutex<StatsInner>,
    recorded: AtomicUsize,
}

impl MatrixStats {
    /// Creates an idle collector.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StatsInner {
                started_at: None,
                elapsed: None,
                node_counts: Vec::new(),
                leaf_counts: Vec::new(),
            }),
            recorded: AtomicUsize::new(0),
        }
    }

    /// Starts the collection clock.
    pub fn start(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.started_at = Some(Instant::now());
        inner.elapsed = None;
    }

    /// Stops the collection clock.
    pub fn stop(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(started) = inner.started_at.take() {
            inner.elapsed = Some(started.elapsed());
        }
    }

    /// Records one compiled matrix.
    pub fn record(&self, matrix: &XddMatrix) {
        let nodes = matrix.node_count();
        let leaves = matrix.leaf_count();
        self.recorded.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.inner.lock().unwrap();
        inner.node_counts.push(nodes);
        inner.leaf_counts.push(leaves);
    }

    /// Number of matrices recorded so far.
    pub fn recorded(&self) -> usize {
        self.recorded.load(Ordering::Relaxed)
    }

    /// A summary of everything recorded so far.
    pub fn report(&self) -> MatrixStatsReport {
        let inner = self.inner.lock().unwrap();
        MatrixStatsReport {
            matrices: inner.node_counts.len(),
            node_count: Distribution::of(&inner.node_counts),
            leaf_count: Distribution::of(&inner.leaf_counts),
            elapsed_ms: inner
                .elapsed
                .or_else(|| Some(inner.started_at?.elapsed()))
                .map(|d| d.as_millis() as u64),
        }
    }

    /// Logs the report through the process's subscriber.
    pub fn dump(&self) {
        let report = self.report();
        tracing::info!(
            matrices = report.matrices,
            max_nodes = report.node_count.max,
            mean_nodes = report.node_count.mean,
            max_leaves = report.leaf_count.max,
            elapsed_ms = report.elapsed_ms,
            "matrix statistics"
        );
    }
}

impl Default for MatrixStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of one collection run.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixStatsReport {
    /// Number of matrices recorded.
    pub matrices: usize,
    /// Distribution of distinct-node counts per matrix.
    pub node_count: Distribution,
    /// Distribution of distinct-leaf counts per matrix.
    pub leaf_count: Distribution,
    /// Wall-clock time between start and stop, if the clock ran.
    pub elapsed_ms: Option<u64>,
}

/// Min/max/mean of one sampled quantity.
#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    /// Smallest sample, 0 when empty.
    pub min: usize,
    /// Largest sample, 0 when empty.
    pub max: usize,
    /// Arithmetic mean, 0.0 when empty.
    pub mean: f64,
}

impl Distribution {
    fn of(samples: &[usize]) -> Self {
        if samples.is_empty() {
            return Self {
                min: 0,
                max: 0,
                mean: 0.0,
            };
        }
        let min = *samples.iter().min().unwrap();
        let max = *samples.iter().max().unwrap();
        let mean = samples.iter().sum::<usize>() as f64 / samples.len() as f64;
        Self { min, max, mean }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use takt_common::Time;
    use takt_xdd::{Xdd, XddManager};

    fn sample_matrix(mgr: &Arc<XddManager>) -> XddMatrix {
        let mut mat = XddMatrix::identity(mgr, 2);
        mat.set(0, 0, &Xdd::leaf(mgr, Time::new(5)));
        mat
    }

    #[test]
    fn empty_report() {
        let stats = MatrixStats::new();
        let report = stats.report();
        assert_eq!(report.matrices, 0);
        assert_eq!(report.node_count.max, 0);
        assert_eq!(report.elapsed_ms, None);
    }

    #[test]
    fn record_and_report() {
        let mgr = Arc::new(XddManager::new());
        let stats = MatrixStats::new();
        stats.start();
        stats.record(&sample_matrix(&mgr));
        stats.record(&XddMatrix::identity(&mgr, 2));
        stats.stop();

        let report = stats.report();
        assert_eq!(report.matrices, 2);
        assert_eq!(stats.recorded(), 2);
        // sample matrix: BOT, ZERO and 5-leaf; identity: BOT and ZERO
        assert_eq!(report.node_count.max, 3);
        assert_eq!(report.node_count.min, 2);
        assert!((report.node_count.mean - 2.5).abs() < 1e-9);
        assert!(report.elapsed_ms.is_some());
    }

    #[test]
    fn report_serializes() {
        let stats = MatrixStats::new();
        let json = serde_json::to_string(&stats.report()).unwrap();
        assert!(json.contains("\"matrices\":0"));
    }

    #[test]
    fn concurrent_recording() {
        use std::thread;

        let mgr = Arc::new(XddManager::new());
        let stats = Arc::new(MatrixStats::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let stats = Arc::clone(&stats);
            let mgr = Arc::clone(&mgr);
            handles.push(thread::spawn(move || {
                for _ in 0..25 {
                    stats.record(&XddMatrix::identity(&mgr, 2));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(stats.recorded(), 100);
        assert_eq!(stats.report().matrices, 100);
    }
}
