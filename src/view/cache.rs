//! Published view snapshot.
//!
//! Uses `arc-swap` for lock-free reads and atomic snapshot replacement,
//! the same way the global config is hot-swapped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use super::{CompiledView, ViewSet};
use crate::error::RenderError;

/// Holds exactly one `ViewSet` at a time.
pub struct ViewCache {
    current: ArcSwap<ViewSet>,
    generation: AtomicU64,
}

impl ViewCache {
    /// Wrap the startup snapshot as generation 0.
    pub fn new(mut initial: ViewSet) -> Self {
        initial.set_generation(0);
        Self {
            current: ArcSwap::from_pointee(initial),
            generation: AtomicU64::new(0),
        }
    }

    /// Look up a view in the current snapshot.
    pub fn get(&self, name: &str) -> Result<Arc<CompiledView>, RenderError> {
        self.current
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::NotFound(name.to_string()))
    }

    /// Replace the snapshot. In-flight readers keep whichever set they loaded.
    ///
    /// Returns the generation assigned to `set`.
    pub fn publish(&self, mut set: ViewSet) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        set.set_generation(generation);
        self.current.store(Arc::new(set));
        generation
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<ViewSet> {
        self.current.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.current.load().generation()
    }
}
