use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use antmark::codec::{self, FileGeneration};
use antmark::FrameRecordStore;

#[derive(Debug, Serialize)]
struct Summary {
    file: String,
    generation: FileGeneration,
    markers: usize,
    interactions: usize,
    first_frame: Option<u32>,
    last_frame: Option<u32>,
    /// Marker count per focal ant
    ants: BTreeMap<u32, usize>,
}

fn summarize(file: &Path, generation: FileGeneration, store: &FrameRecordStore) -> Summary {
    let mut ants = BTreeMap::new();
    for record in store.records() {
        *ants.entry(record.subject_id).or_insert(0) += 1;
    }
    let mut frames = store.iter().map(|(frame, _)| frame);
    let first_frame = frames.next();
    let last_frame = frames.last().or(first_frame);

    Summary {
        file: file.display().to_string(),
        generation,
        markers: store.record_count(),
        interactions: store.records().filter(|record| record.is_interaction()).count(),
        first_frame,
        last_frame,
        ants,
    }
}

pub fn cmd_inspect(file: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let generation = codec::detect_version(&text)?;
    let store = codec::read_str(&text, Some(file))?;
    let summary = summarize(file, generation, &store);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("📄 {}", summary.file);
    println!("   Generation: {:?}", summary.generation);
    println!(
        "   Markers: {} ({} interactions)",
        summary.markers, summary.interactions
    );
    if let (Some(first), Some(last)) = (summary.first_frame, summary.last_frame) {
        println!("   Frames: {first}-{last}");
    }
    println!("   Ants: {}", summary.ants.len());
    for (ant, count) in &summary.ants {
        println!("     Ant {ant}: {count} markers");
    }
    Ok(())
}
