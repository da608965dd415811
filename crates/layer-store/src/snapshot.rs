//! JSON snapshots of the whole hierarchy.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use layer_model::SectionTree;

use crate::error::{Result, StoreError};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of the store: every section as a full tree, in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub layer_sections: Vec<SectionTree>,
}

impl Snapshot {
    pub fn new(layer_sections: Vec<SectionTree>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            layer_sections,
        }
    }
}

/// Write a snapshot to `path`.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a torn file.
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| StoreError::Snapshot {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            operation: "create directory for",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(&bytes).map_err(|e| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| StoreError::Io {
        operation: "replace",
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        sections = snapshot.layer_sections.len(),
        bytes = bytes.len(),
        "saved snapshot"
    );
    Ok(())
}

/// Read a snapshot from `path`.
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = fs::read(path).map_err(|e| StoreError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|e| StoreError::Snapshot {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(StoreError::Snapshot {
            path: path.to_path_buf(),
            reason: format!(
                "version {} is newer than supported version {SNAPSHOT_VERSION}",
                snapshot.version
            ),
        });
    }
    tracing::debug!(
        path = %path.display(),
        sections = snapshot.layer_sections.len(),
        "read snapshot"
    );
    Ok(snapshot)
}
