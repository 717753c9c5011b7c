//! Bounded frame image cache
//!
//! Maps a frame index to a decoded image produced on demand by a
//! [`FrameLoader`]. The cache keeps at most `capacity` slots and evicts the
//! least recently used one on overflow.
//!
//! # Reclamation
//!
//! A host under memory pressure can call [`FrameImageCache::reclaim`] to drop
//! cached values without forgetting their slots. A reclaimed slot still
//! counts towards capacity and keeps its recency, but reads as absent: the
//! next [`get`](FrameImageCache::get) reloads it and reports a
//! [`CacheDiagnostic::ReclaimedReload`]. LRU eviction is the only automatic
//! eviction mechanism.
//!
//! # Locking
//!
//! Every operation takes a single mutex, and the loader runs while it is
//! held. This serializes loads, so there is never more than one load in
//! flight for an index.
//!
//! # Example
//!
//! ```rust
//! use antmark::FrameImageCache;
//!
//! let cache = FrameImageCache::with_capacity(2, |index: usize| -> std::io::Result<String> {
//!     Ok(format!("frame {index}"))
//! });
//! assert_eq!(cache.get(7).as_deref().map(String::as_str), Some("frame 7"));
//! assert!(cache.contains(7));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default number of slots, matching a few seconds of footage
pub const DEFAULT_CAPACITY: usize = 100;

/// Produces the value for a frame index.
///
/// Implemented for any `Fn(usize) -> io::Result<V>`.
pub trait FrameLoader<V>: Send + Sync {
    fn load(&self, index: usize) -> io::Result<V>;
}

impl<V, F> FrameLoader<V> for F
where
    F: Fn(usize) -> io::Result<V> + Send + Sync,
{
    fn load(&self, index: usize) -> io::Result<V> {
        self(index)
    }
}

/// Non-fatal event raised by the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDiagnostic {
    /// The loader failed; the read degraded to no value
    LoadFailed { index: usize, message: String },
    /// A reclaimed slot was reloaded
    ReclaimedReload { index: usize },
}

/// Receives cache diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: CacheDiagnostic);
}

/// Sink that logs diagnostics as warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: CacheDiagnostic) {
        match diagnostic {
            CacheDiagnostic::LoadFailed { index, message } => {
                warn!("Frame {} could not be loaded: {}", index, message);
            }
            CacheDiagnostic::ReclaimedReload { index } => {
                warn!("Reloading reclaimed frame {}", index);
            }
        }
    }
}

/// Sink that keeps diagnostics in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<CacheDiagnostic>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every diagnostic collected so far
    pub fn drain(&self) -> Vec<CacheDiagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: CacheDiagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

enum Slot<V> {
    Live(Arc<V>),
    Reclaimed,
}

struct Entry<V> {
    slot: Slot<V>,
    last_used: u64,
}

/// Slots plus access-order bookkeeping. Guarded by the cache mutex.
struct State<V> {
    entries: HashMap<usize, Entry<V>>,
    /// Access tick → index, oldest first
    order: BTreeMap<u64, usize>,
    clock: u64,
}

impl<V> State<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Mark `index` most recently used and return its live value, if any.
    fn touch_live(&mut self, index: usize) -> Option<Arc<V>> {
        let value = match self.entries.get(&index)?.slot {
            Slot::Live(ref value) => Arc::clone(value),
            Slot::Reclaimed => return None,
        };
        let tick = self.tick();
        if let Some(entry) = self.entries.get_mut(&index) {
            self.order.remove(&entry.last_used);
            entry.last_used = tick;
            self.order.insert(tick, index);
        }
        Some(value)
    }

    fn is_reclaimed(&self, index: usize) -> bool {
        matches!(
            self.entries.get(&index),
            Some(Entry {
                slot: Slot::Reclaimed,
                ..
            })
        )
    }

    fn insert(&mut self, index: usize, value: Arc<V>, capacity: usize) {
        let tick = self.tick();
        let previous = self.entries.insert(
            index,
            Entry {
                slot: Slot::Live(value),
                last_used: tick,
            },
        );
        if let Some(previous) = previous {
            self.order.remove(&previous.last_used);
        }
        self.order.insert(tick, index);

        while self.entries.len() > capacity {
            let Some((_, eldest)) = self.order.pop_first() else {
                break;
            };
            debug!("Removing cache entry for frame {}", eldest);
            self.entries.remove(&eldest);
        }
    }

    fn remove(&mut self, index: usize) {
        if let Some(entry) = self.entries.remove(&index) {
            self.order.remove(&entry.last_used);
        }
    }
}

/// Bounded, lazily populated cache of frame images
pub struct FrameImageCache<V> {
    capacity: usize,
    loader: Box<dyn FrameLoader<V>>,
    sink: Arc<dyn DiagnosticSink>,
    state: Mutex<State<V>>,
}

impl<V> FrameImageCache<V> {
    /// Create a cache with [`DEFAULT_CAPACITY`] slots
    pub fn new(loader: impl FrameLoader<V> + 'static) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, loader)
    }

    /// Create a cache holding at most `capacity` slots (minimum 1)
    pub fn with_capacity(capacity: usize, loader: impl FrameLoader<V> + 'static) -> Self {
        Self {
            capacity: capacity.max(1),
            loader: Box::new(loader),
            sink: Arc::new(TracingSink),
            state: Mutex::new(State::new()),
        }
    }

    /// Send diagnostics to `sink` instead of the log
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    fn lock(&self) -> MutexGuard<'_, State<V>> {
        // State is plain bookkeeping, safe to reuse after a poisoning panic
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the image for `index`, loading it if needed.
    ///
    /// Load failures are reported to the diagnostic sink and yield `None`.
    pub fn get(&self, index: usize) -> Option<Arc<V>> {
        self.try_get(index).ok()
    }

    /// Like [`get`](Self::get), but returns the load failure.
    pub fn try_get(&self, index: usize) -> Result<Arc<V>> {
        let mut state = self.lock();
        if let Some(value) = state.touch_live(index) {
            return Ok(value);
        }

        if state.is_reclaimed(index) {
            self.sink.report(CacheDiagnostic::ReclaimedReload { index });
        }

        match self.loader.load(index) {
            Ok(value) => {
                let value = Arc::new(value);
                state.insert(index, Arc::clone(&value), self.capacity);
                Ok(value)
            }
            Err(source) => {
                self.sink.report(CacheDiagnostic::LoadFailed {
                    index,
                    message: source.to_string(),
                });
                Err(Error::LoadFailure { index, source })
            }
        }
    }

    /// True if a live value is cached for `index`. Never loads.
    pub fn contains(&self, index: usize) -> bool {
        matches!(
            self.lock().entries.get(&index),
            Some(Entry {
                slot: Slot::Live(_),
                ..
            })
        )
    }

    /// Store a value produced elsewhere, without calling the loader
    pub fn put(&self, index: usize, value: impl Into<Arc<V>>) {
        self.lock().insert(index, value.into(), self.capacity);
    }

    /// Forget the value for `index`; the next read reloads it
    pub fn invalidate(&self, index: usize) {
        self.lock().remove(index);
    }

    /// Drop the values of all but the `keep` most recently used live slots.
    ///
    /// Returns the number of values dropped.
    pub fn reclaim(&self, keep: usize) -> usize {
        let mut state = self.lock();
        let State { entries, order, .. } = &mut *state;

        let mut kept = 0;
        let mut dropped = 0;
        for index in order.values().rev() {
            let Some(entry) = entries.get_mut(index) else {
                continue;
            };
            if let Slot::Live(_) = entry.slot {
                if kept < keep {
                    kept += 1;
                } else {
                    entry.slot = Slot::Reclaimed;
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            debug!("Reclaimed {} cached frames", dropped);
        }
        dropped
    }

    /// Drop every slot
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    /// Number of slots, live or reclaimed
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V> std::fmt::Debug for FrameImageCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameImageCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Loader that counts calls and produces `index * 10`
    fn counting_loader() -> (Arc<AtomicUsize>, impl FrameLoader<usize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader = move |index: usize| -> io::Result<usize> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(index * 10)
        };
        (calls, loader)
    }

    #[test]
    fn get_loads_once_then_hits() {
        let (calls, loader) = counting_loader();
        let cache = FrameImageCache::new(loader);

        assert_eq!(cache.get(3).as_deref(), Some(&30));
        assert_eq!(cache.get(3).as_deref(), Some(&30));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn put_bypasses_loader() {
        let (calls, loader) = counting_loader();
        let cache = FrameImageCache::new(loader);

        cache.put(5, 99);
        assert_eq!(cache.get(5).as_deref(), Some(&99));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn overflow_evicts_least_recently_used() {
        let (_, loader) = counting_loader();
        let cache = FrameImageCache::with_capacity(3, loader);

        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        cache.put(4, 4);

        assert!(!cache.contains(1));
        assert!(cache.contains(2));
        assert!(cache.contains(3));
        assert!(cache.contains(4));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn access_refreshes_recency() {
        let (_, loader) = counting_loader();
        let cache = FrameImageCache::with_capacity(3, loader);

        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        cache.get(1);
        cache.put(4, 4);

        assert!(cache.contains(1));
        assert!(!cache.contains(2));
    }

    #[test]
    fn contains_does_not_load_or_refresh() {
        let (calls, loader) = counting_loader();
        let cache = FrameImageCache::with_capacity(2, loader);

        assert!(!cache.contains(8));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        cache.put(1, 1);
        cache.put(2, 2);
        assert!(cache.contains(1));
        cache.put(3, 3);
        assert!(!cache.contains(1));
    }

    #[test]
    fn invalidate_forces_reload() {
        let (calls, loader) = counting_loader();
        let cache = FrameImageCache::new(loader);

        cache.put(2, 7);
        cache.invalidate(2);
        assert!(!cache.contains(2));
        assert_eq!(cache.get(2).as_deref(), Some(&20));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn load_failure_degrades_and_reports() {
        let sink = Arc::new(CollectingSink::new());
        let cache = FrameImageCache::new(|index: usize| -> io::Result<u8> {
            Err(io::Error::new(io::ErrorKind::NotFound, format!("no image {index}")))
        })
        .with_sink(sink.clone());

        assert!(cache.get(4).is_none());
        assert!(matches!(cache.try_get(4), Err(Error::LoadFailure { index: 4, .. })));
        assert!(cache.is_empty());

        let diagnostics = sink.drain();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0],
            CacheDiagnostic::LoadFailed {
                index: 4,
                message: "no image 4".to_string()
            }
        );
    }

    #[test]
    fn failure_on_one_index_leaves_others_alone() {
        let cache = FrameImageCache::new(|index: usize| -> io::Result<usize> {
            if index == 2 {
                Err(io::Error::other("corrupt"))
            } else {
                Ok(index)
            }
        })
        .with_sink(Arc::new(CollectingSink::new()));

        cache.put(1, 1);
        assert!(cache.get(2).is_none());
        assert_eq!(cache.get(1).as_deref(), Some(&1));
        assert_eq!(cache.get(3).as_deref(), Some(&3));
    }

    #[test]
    fn reclaimed_slots_reload_with_diagnostic() {
        let (calls, loader) = counting_loader();
        let sink = Arc::new(CollectingSink::new());
        let cache = FrameImageCache::new(loader).with_sink(sink.clone());

        cache.get(1);
        cache.get(2);
        cache.get(3);
        assert_eq!(cache.reclaim(1), 2);

        assert!(!cache.contains(1));
        assert!(!cache.contains(2));
        assert!(cache.contains(3));
        assert_eq!(cache.len(), 3);

        assert_eq!(cache.get(1).as_deref(), Some(&10));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(sink.drain(), vec![CacheDiagnostic::ReclaimedReload { index: 1 }]);
    }

    #[test]
    fn reclaimed_slots_still_count_for_eviction() {
        let (_, loader) = counting_loader();
        let cache = FrameImageCache::with_capacity(2, loader);

        cache.put(1, 1);
        cache.put(2, 2);
        cache.reclaim(0);
        cache.put(3, 3);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(3));
        assert!(!cache.contains(2));
    }

    #[test]
    fn shared_across_threads() {
        let (calls, loader) = counting_loader();
        let cache = Arc::new(FrameImageCache::new(loader));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get(6))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some(&60));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let (_, loader) = counting_loader();
        let cache = FrameImageCache::with_capacity(0, loader);
        cache.put(1, 1);
        assert_eq!(cache.capacity(), 1);
        assert!(cache.contains(1));
    }
}
