//! Drag controllers: retime-by-drag and reorder/merge-by-drop.
//!
//! Both controllers are plain state machines fed with pointer coordinates
//! and caller-supplied timestamps; they emit [`EditOp`] values and never
//! touch the list themselves. Malformed input degrades to a no-op so a
//! stale or corrupted drag can never wedge the editor.

use serde::{Deserialize, Serialize};
use subtitle_studio_types::TimeField;

use crate::ops::EditOp;

/// Minimum spacing between processed pointer-move events (~60 Hz).
pub const DRAG_MOVE_INTERVAL_MS: f64 = 16.0;

/// Clicks landing this soon after a drag ended are leftovers of the drag
/// gesture and must not trigger a seek.
pub const CLICK_SUPPRESSION_WINDOW_MS: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        index: usize,
        field: TimeField,
        origin_x: f64,
        origin_value: f64,
    },
}

/// State machine behind the time-handle drag.
///
/// `Idle -> Dragging` on pointer-down, back to `Idle` on pointer-up. While
/// dragging, [`RetimeDrag::update`] throttles move events and computes the
/// retimed value from the horizontal pixel delta. Once `end` has run, any
/// queued update for the stale session hits the `Idle` arm and yields
/// nothing, so late animation-frame callbacks cannot apply a mutation.
#[derive(Debug)]
pub struct RetimeDrag {
    state: DragState,
    last_move_ms: Option<f64>,
    last_end_ms: Option<f64>,
    committed: bool,
}

impl Default for RetimeDrag {
    fn default() -> Self {
        Self::new()
    }
}

impl RetimeDrag {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            last_move_ms: None,
            last_end_ms: None,
            committed: false,
        }
    }

    /// Pointer-down on a time handle.
    pub fn begin(&mut self, index: usize, field: TimeField, origin_x: f64, origin_value: f64) {
        self.state = DragState::Dragging {
            index,
            field,
            origin_x,
            origin_value,
        };
        self.last_move_ms = None;
        self.committed = false;
    }

    /// Pointer-move. Returns the retime to apply, or `None` when idle,
    /// throttled, or the computed value is unusable.
    pub fn update(&mut self, x: f64, now_ms: f64, time_scale: f64) -> Option<EditOp> {
        let DragState::Dragging {
            index,
            field,
            origin_x,
            origin_value,
        } = self.state
        else {
            return None;
        };

        if let Some(last) = self.last_move_ms
            && now_ms - last < DRAG_MOVE_INTERVAL_MS
        {
            return None;
        }
        self.last_move_ms = Some(now_ms);

        let value = origin_value + (x - origin_x) * time_scale;
        if !value.is_finite() {
            return None;
        }
        self.committed = true;
        Some(EditOp::Retime {
            index,
            field,
            value: value.max(0.0),
        })
    }

    /// Pointer-up. Returns whether any move was committed during the
    /// session; a drag with no committed move is abandoned outright.
    pub fn end(&mut self, now_ms: f64) -> bool {
        let was_dragging = self.state != DragState::Idle;
        self.state = DragState::Idle;
        self.last_move_ms = None;
        if was_dragging {
            self.last_end_ms = Some(now_ms);
        }
        std::mem::take(&mut self.committed)
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    /// The handle currently being dragged, for highlight rendering.
    pub fn active_handle(&self) -> Option<(usize, TimeField)> {
        match self.state {
            DragState::Dragging { index, field, .. } => Some((index, field)),
            DragState::Idle => None,
        }
    }

    /// True while a click should be swallowed because a drag just ended.
    pub fn suppress_click(&self, now_ms: f64) -> bool {
        self.last_end_ms
            .is_some_and(|end| now_ms - end < CLICK_SUPPRESSION_WINDOW_MS)
    }
}

/// Pixel-to-seconds factor for a timeline of `duration` seconds rendered
/// across `width_px` pixels.
pub fn time_scale(duration: f64, width_px: f64) -> f64 {
    if !duration.is_finite() || !width_px.is_finite() || width_px <= 0.0 {
        return 0.0;
    }
    duration / width_px
}

/// What a row drag means, chosen by modifier key at drag start.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Move,
    Merge,
}

/// Payload carried through the platform drag-data channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: DragKind,
}

impl DragPayload {
    pub fn new(index: usize, kind: DragKind) -> Self {
        Self { index, kind }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a payload, falling back to a bare integer index for drags
    /// originating from older producers. Anything else is unusable.
    pub fn decode(raw: &str) -> Option<Self> {
        if let Ok(payload) = serde_json::from_str::<DragPayload>(raw) {
            return Some(payload);
        }
        raw.trim()
            .parse::<usize>()
            .ok()
            .map(|index| Self::new(index, DragKind::Merge))
    }
}

/// Vertical region of the hovered row, driving the drop indicator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DropZone {
    Top,
    Middle,
    Bottom,
}

/// Top quartile, middle half, bottom quartile.
pub fn classify_drop_zone(offset_y: f64, row_height: f64) -> DropZone {
    if row_height.is_nan() || row_height <= 0.0 || !offset_y.is_finite() {
        return DropZone::Middle;
    }
    let ratio = offset_y / row_height;
    if ratio < 0.25 {
        DropZone::Top
    } else if ratio > 0.75 {
        DropZone::Bottom
    } else {
        DropZone::Middle
    }
}

/// Resolve a drop into the operation to apply.
///
/// Top inserts before the target, bottom after it (compensating for the
/// removal shift), and the middle zone merges at the lower of the two
/// indices. Dropping a row onto itself does nothing.
pub fn drop_command(from: usize, to: usize, zone: DropZone) -> Option<EditOp> {
    if from == to {
        return None;
    }
    Some(match zone {
        DropZone::Top => EditOp::Move { from, to },
        DropZone::Bottom => EditOp::Move {
            from,
            to: if from < to { to } else { to + 1 },
        },
        DropZone::Middle => EditOp::Merge {
            index: if from < to { from } else { to },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_before_begin_yields_nothing() {
        let mut drag = RetimeDrag::new();
        assert!(drag.update(50.0, 0.0, 0.1).is_none());
    }

    #[test]
    fn drag_computes_value_from_pixel_delta() {
        let mut drag = RetimeDrag::new();
        drag.begin(2, TimeField::Start, 100.0, 10.0);
        let op = drag.update(140.0, 0.0, 0.25).unwrap();
        assert_eq!(
            op,
            EditOp::Retime {
                index: 2,
                field: TimeField::Start,
                value: 20.0,
            }
        );
    }

    #[test]
    fn moves_are_throttled_to_sixteen_millis() {
        let mut drag = RetimeDrag::new();
        drag.begin(0, TimeField::End, 0.0, 5.0);
        assert!(drag.update(1.0, 0.0, 1.0).is_some());
        assert!(drag.update(2.0, 10.0, 1.0).is_none());
        assert!(drag.update(3.0, 15.9, 1.0).is_none());
        assert!(drag.update(4.0, 16.0, 1.0).is_some());
    }

    #[test]
    fn dragging_left_clamps_at_zero() {
        let mut drag = RetimeDrag::new();
        drag.begin(0, TimeField::Start, 200.0, 1.0);
        let op = drag.update(0.0, 0.0, 0.1).unwrap();
        assert_eq!(
            op,
            EditOp::Retime {
                index: 0,
                field: TimeField::Start,
                value: 0.0,
            }
        );
    }

    #[test]
    fn end_without_moves_reports_abandonment() {
        let mut drag = RetimeDrag::new();
        drag.begin(0, TimeField::Start, 0.0, 1.0);
        assert!(!drag.end(500.0));

        drag.begin(0, TimeField::Start, 0.0, 1.0);
        drag.update(10.0, 600.0, 0.1);
        assert!(drag.end(700.0));
    }

    #[test]
    fn updates_after_end_are_dead() {
        let mut drag = RetimeDrag::new();
        drag.begin(1, TimeField::End, 0.0, 2.0);
        drag.end(0.0);
        // A queued frame firing after pointer-up must find the session gone.
        assert!(drag.update(300.0, 5.0, 1.0).is_none());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn click_suppression_window_is_one_hundred_millis() {
        let mut drag = RetimeDrag::new();
        drag.begin(0, TimeField::Start, 0.0, 1.0);
        drag.update(5.0, 10.0, 1.0);
        drag.end(1000.0);
        assert!(drag.suppress_click(1050.0));
        assert!(drag.suppress_click(1099.9));
        assert!(!drag.suppress_click(1100.0));
    }

    #[test]
    fn time_scale_guards_zero_width() {
        assert_eq!(time_scale(120.0, 0.0), 0.0);
        assert_eq!(time_scale(120.0, 600.0), 0.2);
    }

    #[test]
    fn payload_round_trips_as_json() {
        let payload = DragPayload::new(7, DragKind::Move);
        let encoded = payload.encode();
        assert_eq!(encoded, r#"{"index":7,"type":"move"}"#);
        assert_eq!(DragPayload::decode(&encoded), Some(payload));
    }

    #[test]
    fn payload_falls_back_to_bare_index() {
        assert_eq!(
            DragPayload::decode(" 12 "),
            Some(DragPayload::new(12, DragKind::Merge))
        );
        assert_eq!(DragPayload::decode("not a payload"), None);
        assert_eq!(DragPayload::decode("{\"index\":"), None);
    }

    #[test]
    fn zones_split_into_quartiles() {
        assert_eq!(classify_drop_zone(0.0, 100.0), DropZone::Top);
        assert_eq!(classify_drop_zone(24.9, 100.0), DropZone::Top);
        assert_eq!(classify_drop_zone(25.0, 100.0), DropZone::Middle);
        assert_eq!(classify_drop_zone(75.0, 100.0), DropZone::Middle);
        assert_eq!(classify_drop_zone(75.1, 100.0), DropZone::Bottom);
        assert_eq!(classify_drop_zone(10.0, 0.0), DropZone::Middle);
    }

    #[test]
    fn drop_decision_table() {
        assert_eq!(drop_command(3, 3, DropZone::Top), None);
        assert_eq!(
            drop_command(1, 4, DropZone::Top),
            Some(EditOp::Move { from: 1, to: 4 })
        );
        assert_eq!(
            drop_command(1, 4, DropZone::Bottom),
            Some(EditOp::Move { from: 1, to: 4 })
        );
        assert_eq!(
            drop_command(4, 1, DropZone::Bottom),
            Some(EditOp::Move { from: 4, to: 2 })
        );
        assert_eq!(
            drop_command(1, 4, DropZone::Middle),
            Some(EditOp::Merge { index: 1 })
        );
        assert_eq!(
            drop_command(4, 1, DropZone::Middle),
            Some(EditOp::Merge { index: 1 })
        );
    }
}
