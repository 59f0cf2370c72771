//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve the engine config
//! - `open_snapshot` / `save_snapshot` - Read and atomically rewrite the snapshot file
//! - `print_json` - JSON output for `--json`

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use runway_core::{EngineConfig, Snapshot};
use serde::Serialize;
use tempfile::NamedTempFile;

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    EngineConfig::load(path).context("Failed to load engine config")
}

pub fn open_snapshot(path: &Path) -> Result<Snapshot> {
    Snapshot::load(path).with_context(|| {
        format!(
            "Failed to read snapshot {} (pass --data <file.json>)",
            path.display()
        )
    })
}

/// Write the snapshot to a temp file next to `path`, then rename over it
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).context("Failed to create temp snapshot file")?;
    tmp.write_all(snapshot.to_json()?.as_bytes())
        .context("Failed to write snapshot")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace snapshot {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Snapshot saved");
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
