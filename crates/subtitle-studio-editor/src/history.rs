//! Undo/redo-capable holder of the live subtitle list.

use std::sync::Arc;

use subtitle_studio_types::{Subtitle, TimeField};

use crate::ops::{self, EditOp};

/// Cap on retained undo states; the oldest entry falls off beyond this.
pub const MAX_HISTORY_DEPTH: usize = 100;

/// Invoked with the fresh snapshot after every state transition.
pub type UpdateCallback = Arc<dyn Fn(&[Subtitle]) + Send + Sync>;

/// Owns the editable subtitle list together with its undo and redo stacks
/// and the `original` / `saved` reference snapshots.
///
/// Every mutation funnels through [`EditHistory::apply`], so each successful
/// edit is exactly one undo unit. Operations that do not apply leave the
/// state (and both stacks) untouched.
pub struct EditHistory {
    original: Vec<Subtitle>,
    saved: Vec<Subtitle>,
    current: Vec<Subtitle>,
    undo_stack: Vec<Vec<Subtitle>>,
    redo_stack: Vec<Vec<Subtitle>>,
    on_update: Option<UpdateCallback>,
}

impl EditHistory {
    pub fn new(initial: Vec<Subtitle>) -> Self {
        Self {
            original: initial.clone(),
            saved: initial.clone(),
            current: initial,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            on_update: None,
        }
    }

    /// Register a callback fired after apply, undo, redo, reset, and load.
    pub fn set_on_update(&mut self, callback: UpdateCallback) {
        self.on_update = Some(callback);
    }

    pub fn current(&self) -> &[Subtitle] {
        &self.current
    }

    pub fn snapshot(&self) -> Vec<Subtitle> {
        self.current.clone()
    }

    pub fn original(&self) -> &[Subtitle] {
        &self.original
    }

    pub fn saved(&self) -> &[Subtitle] {
        &self.saved
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn is_at_original_state(&self) -> bool {
        self.current == self.original
    }

    pub fn is_at_saved_state(&self) -> bool {
        self.current == self.saved
    }

    /// Apply one editing operation. Returns whether the state changed.
    pub fn apply(&mut self, op: &EditOp) -> bool {
        self.apply_with(|current| ops::apply(current, op))
    }

    /// Apply an arbitrary transform. A transform returning `None` is a
    /// silent no-op: no undo entry, no notification.
    pub fn apply_with<F>(&mut self, transform: F) -> bool
    where
        F: FnOnce(&[Subtitle]) -> Option<Vec<Subtitle>>,
    {
        let Some(next) = transform(&self.current) else {
            return false;
        };
        self.push_undo();
        self.current = next;
        self.redo_stack.clear();
        self.notify();
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let replaced = std::mem::replace(&mut self.current, previous);
        self.redo_stack.push(replaced);
        self.notify();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let replaced = std::mem::replace(&mut self.current, next);
        self.undo_stack.push(replaced);
        self.notify();
        true
    }

    /// Return to the original snapshot. The reset itself is undoable.
    pub fn reset(&mut self) -> bool {
        if self.is_at_original_state() {
            return false;
        }
        self.push_undo();
        self.current = self.original.clone();
        self.redo_stack.clear();
        self.notify();
        true
    }

    /// Anchor the saved snapshot at the current state.
    pub fn mark_saved(&mut self) {
        self.saved = self.current.clone();
    }

    /// Replace the list wholesale (new media source); history is discarded
    /// and both reference snapshots re-anchor.
    pub fn load(&mut self, list: Vec<Subtitle>) {
        self.original = list.clone();
        self.saved = list.clone();
        self.current = list;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify();
    }

    // Convenience forwarders, one per editing operation.

    pub fn delete(&mut self, index: usize) -> bool {
        self.apply(&EditOp::Delete { index })
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        self.apply(&EditOp::SetText {
            index,
            text: text.into(),
        })
    }

    pub fn insert_after(&mut self, after: Option<usize>) -> bool {
        self.apply(&EditOp::Insert { after })
    }

    pub fn merge(&mut self, index: usize) -> bool {
        self.apply(&EditOp::Merge { index })
    }

    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        self.apply(&EditOp::Move { from, to })
    }

    pub fn retime(&mut self, index: usize, field: TimeField, value: f64) -> bool {
        self.apply(&EditOp::Retime {
            index,
            field,
            value,
        })
    }

    fn push_undo(&mut self) {
        if self.undo_stack.len() == MAX_HISTORY_DEPTH {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(self.current.clone());
    }

    fn notify(&self) {
        if let Some(callback) = &self.on_update {
            callback(&self.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn three() -> Vec<Subtitle> {
        vec![
            Subtitle::new(1, 0.0, 1.0, "a"),
            Subtitle::new(2, 1.0, 2.0, "b"),
            Subtitle::new(3, 2.0, 3.0, "c"),
        ]
    }

    #[test]
    fn apply_undo_redo_round_trip() {
        let initial = three();
        let mut history = EditHistory::new(initial.clone());

        let ops = vec![
            EditOp::Delete { index: 0 },
            EditOp::SetText {
                index: 0,
                text: "edited".into(),
            },
            EditOp::Merge { index: 0 },
        ];
        for op in &ops {
            assert!(history.apply(op));
        }
        let final_state = history.snapshot();

        for _ in 0..ops.len() {
            assert!(history.undo());
        }
        assert_eq!(history.current(), initial.as_slice());
        assert!(history.is_at_original_state());

        for _ in 0..ops.len() {
            assert!(history.redo());
        }
        assert_eq!(history.current(), final_state.as_slice());
    }

    #[test]
    fn failed_op_leaves_stacks_untouched() {
        let mut history = EditHistory::new(three());
        assert!(!history.delete(10));
        assert!(!history.can_undo());
        assert!(history.is_at_original_state());
    }

    #[test]
    fn idempotent_text_edit_creates_no_undo_entry() {
        let mut history = EditHistory::new(three());
        assert!(!history.set_text(0, "a"));
        assert!(!history.can_undo());
        assert!(history.set_text(0, "different"));
        assert!(history.can_undo());
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut history = EditHistory::new(three());
        history.delete(0);
        history.undo();
        assert!(history.can_redo());
        history.delete(1);
        assert!(!history.can_redo());
    }

    #[test]
    fn merge_then_undo_restores_exact_pre_merge_entries() {
        let initial = three();
        let mut history = EditHistory::new(initial.clone());
        assert!(history.merge(0));
        assert_eq!(history.current().len(), 2);
        assert!(history.undo());
        assert_eq!(history.current(), initial.as_slice());
    }

    #[test]
    fn reset_is_undoable() {
        let mut history = EditHistory::new(three());
        history.delete(0);
        let edited = history.snapshot();
        assert!(history.reset());
        assert!(history.is_at_original_state());
        assert!(history.undo());
        assert_eq!(history.current(), edited.as_slice());
    }

    #[test]
    fn reset_at_original_is_a_no_op() {
        let mut history = EditHistory::new(three());
        assert!(!history.reset());
        assert!(!history.can_undo());
    }

    #[test]
    fn saved_state_tracks_by_value_not_reference() {
        let mut history = EditHistory::new(three());
        history.delete(0);
        history.mark_saved();
        assert!(history.is_at_saved_state());
        history.set_text(0, "changed");
        assert!(!history.is_at_saved_state());
        history.undo();
        assert!(history.is_at_saved_state());
    }

    #[test]
    fn load_replaces_everything() {
        let mut history = EditHistory::new(three());
        history.delete(0);
        let replacement = vec![Subtitle::new(1, 0.0, 4.0, "fresh")];
        history.load(replacement.clone());
        assert_eq!(history.current(), replacement.as_slice());
        assert_eq!(history.original(), replacement.as_slice());
        assert!(history.is_at_saved_state());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn on_update_fires_for_every_transition() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut history = EditHistory::new(three());
        history.set_on_update(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        history.delete(0);
        history.undo();
        history.redo();
        history.reset();
        assert_eq!(count.load(Ordering::SeqCst), 4);

        history.delete(10);
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn undo_depth_is_bounded() {
        let mut history = EditHistory::new(three());
        for i in 0..(MAX_HISTORY_DEPTH + 20) {
            assert!(history.set_text(0, format!("edit {i}")));
        }
        let mut undone = 0;
        while history.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_HISTORY_DEPTH);
    }
}
