use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use antmark::{Config, FrameDirectory, FramePrefetcher};

pub async fn cmd_frames(dir: &Path, config: &Config, window: usize) -> Result<()> {
    let frames = FrameDirectory::open(dir, config)
        .with_context(|| format!("cannot use {} as a frame directory", dir.display()))?;

    println!("🎞️  {}", frames.dir().display());
    println!(
        "   Frames: {}-{} ({} images)",
        frames.first_frame(),
        frames.last_frame(),
        frames.len()
    );

    let first = frames
        .try_image(frames.first_frame())
        .context("failed to read the first frame")?;
    println!("   First image: {} bytes", first.bytes.len());

    if window > 0 {
        let start = Instant::now();
        let prefetcher = FramePrefetcher::new(frames.cache(), window);
        let results = prefetcher.warm_ahead(0, frames.len()).await;
        let failed: Vec<usize> = results
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(index, _)| *index)
            .collect();

        println!(
            "   Prefetched {} frames in {:.1}ms",
            results.len() - failed.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        for index in failed {
            println!("   ⚠️  Unreadable frame at position {index}");
        }
    }
    Ok(())
}
