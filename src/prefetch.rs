//! Background frame warm-up
//!
//! Loads upcoming frames into a shared [`FrameImageCache`] on tokio's
//! blocking pool so that scrubbing forward hits the cache. The cache contract
//! is unchanged: loads still serialize on the cache mutex.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::cache::FrameImageCache;
use crate::error::{Error, Result};

/// Prefetch manager for frame warming
pub struct FramePrefetcher<V> {
    cache: Arc<FrameImageCache<V>>,
    /// Frames to warm after the current one
    window: usize,
}

impl<V> FramePrefetcher<V>
where
    V: Send + Sync + 'static,
{
    #[must_use]
    pub fn new(cache: Arc<FrameImageCache<V>>, window: usize) -> Self {
        Self { cache, window }
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Load one index into the cache
    ///
    /// Returns the time spent, zero if the frame was already cached.
    pub async fn warm(&self, index: usize) -> Result<Duration> {
        if self.cache.contains(index) {
            debug!("Frame {} already cached", index);
            return Ok(Duration::ZERO);
        }

        let start = Instant::now();
        let cache = Arc::clone(&self.cache);
        tokio::task::spawn_blocking(move || cache.try_get(index))
            .await
            .map_err(|err| Error::LoadFailure {
                index,
                source: io::Error::other(err),
            })??;

        let elapsed = start.elapsed();
        debug!("Warmed frame {} in {:?}", index, elapsed);
        Ok(elapsed)
    }

    /// Warm several indexes concurrently
    pub async fn warm_many(
        &self,
        indexes: impl IntoIterator<Item = usize>,
    ) -> Vec<(usize, Result<Duration>)> {
        let futures: Vec<_> = indexes
            .into_iter()
            .map(|index| async move { (index, self.warm(index).await) })
            .collect();

        futures::future::join_all(futures).await
    }

    /// Warm the frames following `current`, stopping before `len`
    pub async fn warm_ahead(&self, current: usize, len: usize) -> Vec<(usize, Result<Duration>)> {
        let start = current.saturating_add(1);
        let end = start.saturating_add(self.window).min(len);
        let results = self.warm_many(start..end).await;

        let loaded = results.iter().filter(|(_, result)| result.is_ok()).count();
        info!(
            "Prefetched {}/{} frames after index {}",
            loaded,
            results.len(),
            current
        );
        results
    }
}
