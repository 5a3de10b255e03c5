//! Shared handles over per-track edit histories.
//!
//! An editing session carries two independent tracks (original language and
//! translation), each with its own history. The tracks share no state; the
//! session only remembers which one is being edited.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use subtitle_studio_types::{Subtitle, TimeField};
use tokio::sync::watch;
use tracing::debug;

use crate::history::EditHistory;
use crate::ops::EditOp;
use crate::playback;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TrackKind {
    Original,
    Translated,
}

impl TrackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackKind::Original => "original",
            TrackKind::Translated => "translated",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct TrackKindParseError(pub String);

impl fmt::Display for TrackKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown track '{}'", self.0)
    }
}

impl std::error::Error for TrackKindParseError {}

impl FromStr for TrackKind {
    type Err = TrackKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "original" => Ok(TrackKind::Original),
            "translated" => Ok(TrackKind::Translated),
            _ => Err(TrackKindParseError(lower)),
        }
    }
}

/// Cloneable handle to one track's history.
///
/// The history is owned exclusively behind the handle; consumers observe it
/// through snapshots and the watch channel, and mutate it only through the
/// operation methods here.
#[derive(Clone)]
pub struct TrackHandle {
    kind: TrackKind,
    history: Arc<Mutex<EditHistory>>,
    updates: watch::Sender<Vec<Subtitle>>,
}

impl TrackHandle {
    pub fn new(kind: TrackKind, initial: Vec<Subtitle>) -> Self {
        let (updates, _) = watch::channel(initial.clone());
        Self {
            kind,
            history: Arc::new(Mutex::new(EditHistory::new(initial))),
            updates,
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn snapshot(&self) -> Vec<Subtitle> {
        self.history.lock().snapshot()
    }

    /// Subscribe to list snapshots; the receiver observes every committed
    /// transition.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Subtitle>> {
        self.updates.subscribe()
    }

    /// Replace the track contents wholesale (new media source).
    pub fn load(&self, list: Vec<Subtitle>) {
        let mut history = self.history.lock();
        history.load(list);
        self.broadcast(&history);
    }

    pub fn apply(&self, op: &EditOp) -> bool {
        let mut history = self.history.lock();
        let changed = history.apply(op);
        if changed {
            self.broadcast(&history);
        } else {
            debug!(track = %self.kind, ?op, "ignoring inapplicable edit");
        }
        changed
    }

    pub fn undo(&self) -> bool {
        self.transition(EditHistory::undo)
    }

    pub fn redo(&self) -> bool {
        self.transition(EditHistory::redo)
    }

    pub fn reset(&self) -> bool {
        self.transition(EditHistory::reset)
    }

    pub fn mark_saved(&self) {
        self.history.lock().mark_saved();
    }

    pub fn can_undo(&self) -> bool {
        self.history.lock().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.lock().can_redo()
    }

    pub fn is_at_original_state(&self) -> bool {
        self.history.lock().is_at_original_state()
    }

    pub fn is_at_saved_state(&self) -> bool {
        self.history.lock().is_at_saved_state()
    }

    pub fn delete(&self, index: usize) -> bool {
        self.apply(&EditOp::Delete { index })
    }

    pub fn set_text(&self, index: usize, text: impl Into<String>) -> bool {
        self.apply(&EditOp::SetText {
            index,
            text: text.into(),
        })
    }

    pub fn insert_after(&self, after: Option<usize>) -> bool {
        self.apply(&EditOp::Insert { after })
    }

    pub fn merge(&self, index: usize) -> bool {
        self.apply(&EditOp::Merge { index })
    }

    pub fn move_entry(&self, from: usize, to: usize) -> bool {
        self.apply(&EditOp::Move { from, to })
    }

    pub fn retime(&self, index: usize, field: TimeField, value: f64) -> bool {
        self.apply(&EditOp::Retime {
            index,
            field,
            value,
        })
    }

    pub fn active_index(&self, current_time: f64) -> Option<usize> {
        playback::active_index(self.history.lock().current(), current_time)
    }

    fn transition(&self, step: fn(&mut EditHistory) -> bool) -> bool {
        let mut history = self.history.lock();
        let changed = step(&mut history);
        if changed {
            self.broadcast(&history);
        }
        changed
    }

    fn broadcast(&self, history: &EditHistory) {
        let _ = self.updates.send(history.snapshot());
    }
}

/// One editing session: both tracks plus the active-track toggle.
#[derive(Clone)]
pub struct EditorSession {
    original: TrackHandle,
    translated: TrackHandle,
    active: Arc<Mutex<TrackKind>>,
}

impl EditorSession {
    pub fn new(original: Vec<Subtitle>, translated: Vec<Subtitle>) -> Self {
        Self {
            original: TrackHandle::new(TrackKind::Original, original),
            translated: TrackHandle::new(TrackKind::Translated, translated),
            active: Arc::new(Mutex::new(TrackKind::Original)),
        }
    }

    pub fn track(&self, kind: TrackKind) -> &TrackHandle {
        match kind {
            TrackKind::Original => &self.original,
            TrackKind::Translated => &self.translated,
        }
    }

    pub fn active_kind(&self) -> TrackKind {
        *self.active.lock()
    }

    pub fn set_active(&self, kind: TrackKind) {
        *self.active.lock() = kind;
    }

    pub fn active_track(&self) -> &TrackHandle {
        self.track(self.active_kind())
    }
}
