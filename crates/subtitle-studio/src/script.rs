//! Replayable edit scripts: a JSON array of editing operations applied
//! through the history engine, so a recorded editing session can be rerun
//! headlessly.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use subtitle_studio_editor::{EditHistory, EditOp};
use subtitle_studio_types::Subtitle;
use tracing::warn;

#[derive(Debug)]
pub enum ScriptError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io { path, source } => {
                write!(f, "failed to read edit script {}: {source}", path.display())
            }
            ScriptError::Parse { path, source } => {
                write!(f, "failed to parse edit script {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Io { source, .. } => Some(source),
            ScriptError::Parse { source, .. } => Some(source),
        }
    }
}

pub fn load_script(path: &Path) -> Result<Vec<EditOp>, ScriptError> {
    let contents = fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ScriptError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Replay operations over the initial list. Inapplicable operations are
/// skipped with a warning, mirroring how the interactive editor swallows
/// them. Returns the final list and the number of operations that applied.
pub fn replay(initial: Vec<Subtitle>, ops: &[EditOp]) -> (Vec<Subtitle>, usize) {
    let mut history = EditHistory::new(initial);
    let mut applied = 0usize;
    for op in ops {
        if history.apply(op) {
            applied += 1;
        } else {
            warn!(?op, "skipping inapplicable edit");
        }
    }
    (history.snapshot(), applied)
}
