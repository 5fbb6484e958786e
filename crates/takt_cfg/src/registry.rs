//! The process-wide feature and property registry.
//!
//! Analyses advertise what they provide and require through features:
//! stable string keys interned once into a [`FeatureId`]. The registry
//! is a lazily initialized global, so there is no static-construction
//! ordering to get wrong; any thread may register or look up keys at
//! any time and concurrent registrations of the same key return the
//! same id.

use lasso::ThreadedRodeo;
use std::sync::OnceLock;

/// Interned identifier of a feature or property key.
///
/// Ids are process-local: they are valid only against this process's
/// registry and are not serialized.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FeatureId(u32);

// SAFETY: `FeatureId` wraps a `u32`, which is always a valid `usize` on
// the supported platforms. `try_from_usize` rejects values that do not
// fit in `u32`.
unsafe impl lasso::Key for FeatureId {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(FeatureId)
    }
}

fn rodeo() -> &'static ThreadedRodeo<FeatureId> {
    static REGISTRY: OnceLock<ThreadedRodeo<FeatureId>> = OnceLock::new();
    REGISTRY.get_or_init(ThreadedRodeo::new)
}

/// Registers `name` (idempotently) and returns its id.
pub fn feature(name: &str) -> FeatureId {
    rodeo().get_or_intern(name)
}

/// Resolves an id back to its stable string key.
///
/// # Panics
///
/// Panics if the id was not produced by [`feature`].
pub fn feature_name(id: FeatureId) -> &'static str {
    rodeo().resolve(&id)
}
