//! JSON snapshot export/import for the whole record store.
//!
//! The snapshot is a single JSON document with a manifest and the full record
//! list. Import replaces the store wholesale; the login tables are rebuilt
//! with regenerated starter credentials since passwords are not part of the
//! snapshot.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::model::StudentRecord;

pub const SNAPSHOT_FORMAT_V1: &str = "srms-snapshot-v1";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    format: String,
    version: u32,
    app_version: String,
    exported_at: u64,
    records: Vec<StudentRecord>,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub record_count: usize,
    pub complaint_count: usize,
}

pub fn export_snapshot(records: &[StudentRecord], out_path: &Path) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }

    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let snapshot = Snapshot {
        format: SNAPSHOT_FORMAT_V1.to_string(),
        version: 1,
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        exported_at,
        records: records.to_vec(),
    };

    let mut out = File::create(out_path).with_context(|| {
        format!(
            "failed to create snapshot file {}",
            out_path.to_string_lossy()
        )
    })?;
    out.write_all(
        serde_json::to_string_pretty(&snapshot)
            .context("failed to serialize snapshot")?
            .as_bytes(),
    )
    .context("failed to write snapshot")?;

    Ok(ExportSummary {
        record_count: snapshot.records.len(),
        complaint_count: snapshot.records.iter().filter(|r| r.has_complaint()).count(),
    })
}

pub fn import_snapshot(path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open snapshot {}", path.to_string_lossy()))?;
    let snapshot: Snapshot =
        serde_json::from_reader(BufReader::new(file)).context("failed to parse snapshot")?;
    if snapshot.format != SNAPSHOT_FORMAT_V1 {
        return Err(anyhow!("unsupported snapshot format: {}", snapshot.format));
    }
    Ok(snapshot.records)
}
