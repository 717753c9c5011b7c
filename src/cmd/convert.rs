use std::path::Path;

use anyhow::{Context, Result};

use antmark::codec::{self, FileGeneration};

pub fn cmd_convert(input: &Path, output: Option<&Path>) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let generation = codec::detect_version(&text)
        .with_context(|| format!("cannot convert {}", input.display()))?;
    let store = codec::read_str(&text, Some(input))?;

    let target = output.unwrap_or(input);
    if generation == FileGeneration::V3 && target == input {
        println!("✅ {} is already version 3", input.display());
        return Ok(());
    }

    codec::write_file(target, &store)
        .with_context(|| format!("failed to write {}", target.display()))?;

    println!(
        "✅ Converted {} markers ({:?} → V3): {}",
        store.record_count(),
        generation,
        target.display()
    );
    Ok(())
}
