use std::{fs::File, io::BufReader, io::Read, path::Path};

use anyhow::{Ok, Result};

use crate::export_format::TimelineExport;
use crate::timeline::{Timeline, TimelineStore};

pub fn read_export(reader: impl Read) -> Result<TimelineExport> {
    let export: TimelineExport = serde_json::from_reader(reader)?;
    if export.semantic_segments.is_empty() {
        warn!("[import] export has no semantic segments");
    }
    Ok(export)
}

pub fn load_export(file_path: impl AsRef<Path>) -> Result<TimelineExport> {
    let file_path = file_path.as_ref();
    info!("[import] reading {}", file_path.display());
    let file = File::open(file_path)
        .map_err(|e| anyhow!("failed to open {}: {}", file_path.display(), e))?;
    read_export(BufReader::new(file))
}

pub fn load_timeline(file_path: impl AsRef<Path>) -> Result<Timeline> {
    Ok(Timeline::from_export(load_export(file_path)?)?)
}

/// Reads and normalizes the file, then publishes it as the store's current
/// snapshot. The store is only touched if everything succeeded.
pub fn load_into_store(store: &TimelineStore, file_path: impl AsRef<Path>) -> Result<()> {
    store.load(load_export(file_path)?)?;
    Ok(())
}
