//! Pure editing operations over the subtitle list.
//!
//! Every operation is a total transform `&[Subtitle] -> Option<Vec<Subtitle>>`:
//! `Some` carries the fully built next list, `None` means the operation does
//! not apply (out-of-range index, no-op edit, degenerate timing) and the
//! caller keeps the list it has. A partially mutated list is never observable.

use serde::{Deserialize, Serialize};
use subtitle_studio_types::{Subtitle, TimeField, renumber};

/// Duration given to a freshly inserted entry when no neighbor constrains it.
pub const DEFAULT_INSERT_DURATION: f64 = 1.0;

/// A single editing operation. Serializable so edit scripts can be replayed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Delete {
        index: usize,
    },
    SetText {
        index: usize,
        text: String,
    },
    /// Insert a new empty entry after `after`; `None` inserts at the head.
    Insert {
        after: Option<usize>,
    },
    /// Merge the entry at `index` with its successor.
    Merge {
        index: usize,
    },
    /// Reposition an entry without touching its timing. The list may leave
    /// start-sorted order afterwards; consumers work off list position.
    Move {
        from: usize,
        to: usize,
    },
    Retime {
        index: usize,
        field: TimeField,
        value: f64,
    },
}

/// Apply one operation, returning the next list or `None` for a no-op.
pub fn apply(list: &[Subtitle], op: &EditOp) -> Option<Vec<Subtitle>> {
    match op {
        EditOp::Delete { index } => delete(list, *index),
        EditOp::SetText { index, text } => set_text(list, *index, text),
        EditOp::Insert { after } => insert(list, *after),
        EditOp::Merge { index } => merge(list, *index),
        EditOp::Move { from, to } => move_entry(list, *from, *to),
        EditOp::Retime {
            index,
            field,
            value,
        } => retime(list, *index, *field, *value),
    }
}

fn delete(list: &[Subtitle], index: usize) -> Option<Vec<Subtitle>> {
    if index >= list.len() {
        return None;
    }
    let mut next = list.to_vec();
    next.remove(index);
    renumber(&mut next);
    Some(next)
}

fn set_text(list: &[Subtitle], index: usize, text: &str) -> Option<Vec<Subtitle>> {
    let current = list.get(index)?;
    if current.text == text {
        return None;
    }
    let mut next = list.to_vec();
    next[index].text = text.to_string();
    Some(next)
}

fn insert(list: &[Subtitle], after: Option<usize>) -> Option<Vec<Subtitle>> {
    let (position, start, end) = match after {
        None => head_slot(list),
        Some(index) => {
            let anchor = list.get(index)?;
            let start = anchor.end;
            let end = match list.get(index + 1) {
                Some(next) if next.start > start => {
                    (start + DEFAULT_INSERT_DURATION).min(next.start)
                }
                // Neighbor already overlaps the anchor; non-overlap is not
                // achievable, take the default duration.
                Some(_) => start + DEFAULT_INSERT_DURATION,
                None => start + DEFAULT_INSERT_DURATION,
            };
            (index + 1, start, end)
        }
    };

    let mut next = list.to_vec();
    next.insert(position, Subtitle::new(0, start, end, ""));
    renumber(&mut next);
    Some(next)
}

// Slot for an insert before the first entry, anchored on its start.
fn head_slot(list: &[Subtitle]) -> (usize, f64, f64) {
    match list.first() {
        Some(first) if first.start > 0.0 => {
            let start = (first.start - DEFAULT_INSERT_DURATION).max(0.0);
            (0, start, first.start)
        }
        Some(_) => (0, 0.0, DEFAULT_INSERT_DURATION),
        None => (0, 0.0, DEFAULT_INSERT_DURATION),
    }
}

fn merge(list: &[Subtitle], index: usize) -> Option<Vec<Subtitle>> {
    let left = list.get(index)?;
    let right = list.get(index + 1)?;
    let combined = Subtitle::new(
        0,
        left.start,
        right.end,
        format!("{}\n{}", left.text, right.text),
    );
    let mut next = list.to_vec();
    next[index] = combined;
    next.remove(index + 1);
    renumber(&mut next);
    Some(next)
}

fn move_entry(list: &[Subtitle], from: usize, to: usize) -> Option<Vec<Subtitle>> {
    if from >= list.len() || from == to {
        return None;
    }
    let mut next = list.to_vec();
    let entry = next.remove(from);
    let position = to.min(next.len());
    next.insert(position, entry);
    renumber(&mut next);
    Some(next)
}

fn retime(list: &[Subtitle], index: usize, field: TimeField, value: f64) -> Option<Vec<Subtitle>> {
    let current = list.get(index)?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    match field {
        TimeField::Start => {
            if value >= current.end || value == current.start {
                return None;
            }
        }
        TimeField::End => {
            if value <= current.start || value == current.end {
                return None;
            }
        }
    }
    let mut next = list.to_vec();
    match field {
        TimeField::Start => next[index].start = value,
        TimeField::End => next[index].end = value,
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtitle(id: u32, start: f64, end: f64, text: &str) -> Subtitle {
        Subtitle::new(id, start, end, text)
    }

    fn three() -> Vec<Subtitle> {
        vec![
            subtitle(1, 0.0, 1.0, "a"),
            subtitle(2, 1.0, 2.0, "b"),
            subtitle(3, 2.0, 3.0, "c"),
        ]
    }

    #[test]
    fn delete_renumbers_survivors() {
        let next = apply(&three(), &EditOp::Delete { index: 1 }).unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].text, "a");
        assert_eq!(next[1].text, "c");
        assert_eq!(next[1].id, 2);
    }

    #[test]
    fn delete_out_of_range_is_a_no_op() {
        assert!(apply(&three(), &EditOp::Delete { index: 3 }).is_none());
        assert!(apply(&[], &EditOp::Delete { index: 0 }).is_none());
    }

    #[test]
    fn set_text_with_identical_text_is_a_no_op() {
        let list = three();
        assert!(
            apply(
                &list,
                &EditOp::SetText {
                    index: 0,
                    text: "a".into(),
                }
            )
            .is_none()
        );
        let next = apply(
            &list,
            &EditOp::SetText {
                index: 0,
                text: "changed".into(),
            },
        )
        .unwrap();
        assert_eq!(next[0].text, "changed");
        assert_eq!(next[0].start, 0.0);
        assert_eq!(next[0].end, 1.0);
    }

    #[test]
    fn insert_after_last_takes_default_duration() {
        let list = vec![subtitle(1, 0.0, 2.0, "a")];
        let next = apply(&list, &EditOp::Insert { after: Some(0) }).unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].start, 2.0);
        assert_eq!(next[1].end, 3.0);
        assert_eq!(next[1].text, "");
        assert_eq!(next[1].id, 2);
    }

    #[test]
    fn insert_clamps_to_following_neighbor() {
        let list = vec![subtitle(1, 0.0, 2.0, "a"), subtitle(2, 2.5, 4.0, "b")];
        let next = apply(&list, &EditOp::Insert { after: Some(0) }).unwrap();
        assert_eq!(next[1].start, 2.0);
        assert_eq!(next[1].end, 2.5);
        assert_eq!(next[2].text, "b");
    }

    #[test]
    fn insert_at_head_leans_on_first_start() {
        let list = vec![subtitle(1, 5.0, 6.0, "a")];
        let next = apply(&list, &EditOp::Insert { after: None }).unwrap();
        assert_eq!(next[0].start, 4.0);
        assert_eq!(next[0].end, 5.0);
        assert_eq!(next[1].text, "a");
        assert_eq!(next[1].id, 2);
    }

    #[test]
    fn insert_at_head_of_zero_start_list_still_yields_valid_timing() {
        let list = vec![subtitle(1, 0.0, 1.0, "a")];
        let next = apply(&list, &EditOp::Insert { after: None }).unwrap();
        assert!(next[0].start < next[0].end);
    }

    #[test]
    fn insert_into_empty_list_only_works_at_head() {
        assert!(apply(&[], &EditOp::Insert { after: Some(0) }).is_none());
        let next = apply(&[], &EditOp::Insert { after: None }).unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].start, 0.0);
        assert_eq!(next[0].end, 1.0);
    }

    #[test]
    fn merge_spans_both_entries_and_joins_text() {
        let next = apply(&three(), &EditOp::Merge { index: 0 }).unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].start, 0.0);
        assert_eq!(next[0].end, 2.0);
        assert_eq!(next[0].text, "a\nb");
        assert_eq!(next[1].id, 2);
    }

    #[test]
    fn merge_without_successor_is_a_no_op() {
        assert!(apply(&three(), &EditOp::Merge { index: 2 }).is_none());
    }

    #[test]
    fn move_uses_splice_semantics_and_keeps_timing() {
        let next = apply(&three(), &EditOp::Move { from: 0, to: 2 }).unwrap();
        let spans: Vec<(f64, f64)> = next.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(spans, vec![(1.0, 2.0), (2.0, 3.0), (0.0, 1.0)]);
        let ids: Vec<u32> = next.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn move_backwards_lands_before_target() {
        let next = apply(&three(), &EditOp::Move { from: 2, to: 0 }).unwrap();
        let texts: Vec<&str> = next.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
    }

    #[test]
    fn move_onto_itself_is_a_no_op() {
        assert!(apply(&three(), &EditOp::Move { from: 1, to: 1 }).is_none());
    }

    #[test]
    fn retime_rejects_degenerate_spans() {
        let list = three();
        assert!(
            apply(
                &list,
                &EditOp::Retime {
                    index: 0,
                    field: TimeField::Start,
                    value: 1.0,
                }
            )
            .is_none()
        );
        assert!(
            apply(
                &list,
                &EditOp::Retime {
                    index: 0,
                    field: TimeField::End,
                    value: 0.0,
                }
            )
            .is_none()
        );
        assert!(
            apply(
                &list,
                &EditOp::Retime {
                    index: 0,
                    field: TimeField::Start,
                    value: f64::NAN,
                }
            )
            .is_none()
        );
    }

    #[test]
    fn retime_moves_a_single_boundary() {
        let next = apply(
            &three(),
            &EditOp::Retime {
                index: 1,
                field: TimeField::End,
                value: 2.5,
            },
        )
        .unwrap();
        assert_eq!(next[1].start, 1.0);
        assert_eq!(next[1].end, 2.5);
        // Neighbors are intentionally not clamped.
        assert_eq!(next[2].start, 2.0);
    }

    #[test]
    fn retime_does_not_clamp_against_neighbors() {
        let next = apply(
            &three(),
            &EditOp::Retime {
                index: 0,
                field: TimeField::End,
                value: 10.0,
            },
        )
        .unwrap();
        assert_eq!(next[0].end, 10.0);
    }

    #[test]
    fn every_structural_op_preserves_invariants() {
        let ops = vec![
            EditOp::Insert { after: Some(1) },
            EditOp::Delete { index: 0 },
            EditOp::Merge { index: 0 },
            EditOp::Move { from: 0, to: 1 },
        ];
        let mut list = three();
        for op in &ops {
            list = apply(&list, op).unwrap();
            for (index, subtitle) in list.iter().enumerate() {
                assert_eq!(subtitle.id as usize, index + 1);
                assert!(subtitle.start < subtitle.end);
            }
        }
    }

    #[test]
    fn edit_op_serde_tagging() {
        let op = EditOp::Retime {
            index: 2,
            field: TimeField::Start,
            value: 1.5,
        };
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, r#"{"op":"retime","index":2,"field":"start","value":1.5}"#);
        let back: EditOp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }
}
