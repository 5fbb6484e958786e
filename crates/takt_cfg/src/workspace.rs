//! The analysis workspace.
//!
//! A [`Workspace`] owns the CFG under analysis together with the
//! analysis results hooked onto it: the per-edge bags of segment time
//! diagrams and the set of feature marks. Workers append results
//! concurrently, so both stores sit behind their own locks; reads
//! return snapshots.

use crate::graph::Cfg;
use crate::ids::EdgeId;
use crate::registry::FeatureId;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Mutex;
use takt_common::Time;
use takt_xdd::Xdd;

/// The CFG plus the property stores the timing analysis fills in.
pub struct Workspace {
    cfg: Cfg,
    times: Mutex<FxHashMap<EdgeId, Vec<Xdd>>>,
    features: Mutex<FxHashSet<FeatureId>>,
}

impl Workspace {
    /// Wraps a CFG with empty property stores.
    pub fn new(cfg: Cfg) -> Self {
        Self {
            cfg,
            times: Mutex::new(FxHashMap::default()),
            features: Mutex::new(FxHashSet::default()),
        }
    }

    /// The CFG under analysis.
    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    /// Appends one segment time diagram to the edge's bag.
    pub fn add_time(&self, edge: EdgeId, time: Xdd) {
        self.times.lock().unwrap().entry(edge).or_default().push(time);
    }

    /// Snapshot of the edge's time bag; empty if the edge was never
    /// written.
    pub fn times(&self, edge: EdgeId) -> Vec<Xdd> {
        self.times
            .lock()
            .unwrap()
            .get(&edge)
            .cloned()
            .unwrap_or_default()
    }

    /// Drops the edge's time bag, if any.
    pub fn clear_times(&self, edge: EdgeId) {
        self.times.lock().unwrap().remove(&edge);
    }

    /// The saturated sum of the edge's bag as one diagram, or `None`
    /// for an empty bag.
    pub fn total(&self, edge: EdgeId) -> Option<Xdd> {
        let bag = self.times(edge);
        let mut iter = bag.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, x| acc.sat_add(&x)))
    }

    /// The edge's worst-case time: the largest leaf of the bag's sum,
    /// or `ZERO` for an edge with an empty bag.
    pub fn total_time(&self, edge: EdgeId) -> Time {
        self.total(edge).map_or(Time::ZERO, |x| x.max_leaf())
    }

    /// Marks a feature as established on this workspace.
    pub fn mark_feature(&self, feature: FeatureId) {
        self.features.lock().unwrap().insert(feature);
    }

    /// Returns `true` if the feature has been marked.
    pub fn has_feature(&self, feature: FeatureId) -> bool {
        self.features.lock().unwrap().contains(&feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BlockKind;
    use crate::registry::feature;
    use std::sync::Arc;
    use takt_xdd::XddManager;

    fn two_block_ws() -> (Workspace, EdgeId) {
        let mut cfg = Cfg::new();
        let a = cfg.add_block("a", BlockKind::Basic);
        let b = cfg.add_block("b", BlockKind::Basic);
        let e = cfg.add_edge(a, b);
        (Workspace::new(cfg), e)
    }

    #[test]
    fn empty_edge_has_zero_total() {
        let (ws, e) = two_block_ws();
        assert!(ws.times(e).is_empty());
        assert!(ws.total(e).is_none());
        assert_eq!(ws.total_time(e), Time::ZERO);
    }

    #[test]
    fn bag_accumulates_and_sums() {
        let (ws, e) = two_block_ws();
        let m = Arc::new(XddManager::new());
        ws.add_time(e, Xdd::leaf(&m, Time::new(4)));
        ws.add_time(e, Xdd::leaf(&m, Time::new(6)));
        assert_eq!(ws.times(e).len(), 2);
        assert_eq!(ws.total(e).unwrap(), Xdd::leaf(&m, Time::new(10)));
        assert_eq!(ws.total_time(e), Time::new(10));
    }

    #[test]
    fn clear_times_drops_bag() {
        let (ws, e) = two_block_ws();
        let m = Arc::new(XddManager::new());
        ws.add_time(e, Xdd::leaf(&m, Time::new(4)));
        ws.clear_times(e);
        assert!(ws.times(e).is_empty());
    }

    #[test]
    fn feature_marks() {
        let (ws, _) = two_block_ws();
        let f = feature("takt::test::WS_FEATURE");
        assert!(!ws.has_feature(f));
        ws.mark_feature(f);
        assert!(ws.has_feature(f));
    }

    #[test]
    fn concurrent_appends() {
        use std::thread;

        let (ws, e) = two_block_ws();
        let ws = Arc::new(ws);
        let m = Arc::new(XddManager::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ws = Arc::clone(&ws);
            let m = Arc::clone(&m);
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    ws.add_time(e, Xdd::leaf(&m, Time::new(1)));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(ws.times(e).len(), 400);
        assert_eq!(ws.total_time(e), Time::new(400));
    }
}
