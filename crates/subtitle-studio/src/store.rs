//! Sidecar persistence for editing progress.
//!
//! The editable list is saved as a flat JSON array next to the media file
//! and written via a temp file plus rename so a crash mid-write never
//! leaves a truncated sidecar behind.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use subtitle_studio_types::Subtitle;

use crate::formats::{FormatError, parse_json, render_json};

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Format {
        path: PathBuf,
        source: FormatError,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "sidecar i/o failure at '{}': {source}", path.display())
            }
            StoreError::Format { path, source } => {
                write!(f, "sidecar content at '{}' is unusable: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Format { source, .. } => Some(source),
        }
    }
}

/// Sidecar location for a given media or subtitle input path.
pub fn default_sidecar_path(input: &Path) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension("subtitles.json");
    path
}

pub fn save_subtitles(path: &Path, subtitles: &[Subtitle]) -> Result<(), StoreError> {
    let rendered = render_json(subtitles).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp_path = path.with_extension("part");
    fs::write(&tmp_path, rendered).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

pub fn load_subtitles(path: &Path) -> Result<Vec<Subtitle>, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&contents).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })
}
