//! Metadata persistence: load/save with atomic writes

use std::fs;
use std::path::{Path, PathBuf};

use super::metadata::{IndexMetadata, METADATA_VERSION};
use crate::error::{IndexError, Result};

const METADATA_FILENAME: &str = "indexer-metadata.json";

/// Path of the metadata file kept inside the index directory
pub fn metadata_path(index_dir: &Path) -> PathBuf {
    index_dir.join(METADATA_FILENAME)
}

/// Load run metadata for an index.
/// Returns None if the file is missing or was written by an incompatible version.
pub fn load_metadata(index_dir: &Path) -> Result<Option<IndexMetadata>> {
    let path = metadata_path(index_dir);
    if !path.exists() {
        return Ok(None);
    }

    let metadata_error = |reason: String| IndexError::Metadata { path: path.clone(), reason };
    let json = fs::read_to_string(&path).map_err(|e| metadata_error(e.to_string()))?;
    let metadata: IndexMetadata =
        serde_json::from_str(&json).map_err(|e| metadata_error(e.to_string()))?;

    if metadata.version != METADATA_VERSION {
        log::warn!(
            "Index metadata version mismatch (expected {}, found {}), ignoring",
            METADATA_VERSION,
            metadata.version
        );
        return Ok(None);
    }

    Ok(Some(metadata))
}

/// Save run metadata atomically (temp file + rename)
pub fn save_metadata(index_dir: &Path, metadata: &IndexMetadata) -> Result<()> {
    let path = metadata_path(index_dir);
    let temp = index_dir.join(format!("{}.tmp", METADATA_FILENAME));
    let metadata_error = |reason: String| IndexError::Metadata { path: path.clone(), reason };

    let json = serde_json::to_string_pretty(metadata).map_err(|e| metadata_error(e.to_string()))?;
    fs::write(&temp, json).map_err(|e| metadata_error(e.to_string()))?;
    fs::rename(&temp, &path).map_err(|e| metadata_error(e.to_string()))?;

    Ok(())
}
