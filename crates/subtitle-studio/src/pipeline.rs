//! Normalization passes applied between load and export.

use subtitle_studio_types::{Subtitle, clean_text, dedupe_and_sort, merge_overlapping, renumber};
use tracing::debug;

use crate::settings::NormalizeSettings;

/// Run the enabled passes in a fixed order: text cleanup, dedupe/sort,
/// overlap merging, then the timestamp offset.
pub fn run(subtitles: Vec<Subtitle>, settings: &NormalizeSettings) -> Vec<Subtitle> {
    let mut list = subtitles;

    if settings.clean_text {
        for subtitle in &mut list {
            subtitle.text = clean_text(&subtitle.text);
        }
    }
    if settings.dedupe {
        let before = list.len();
        list = dedupe_and_sort(list);
        debug!(dropped = before - list.len(), "deduplicated subtitles");
    }
    if settings.merge_overlapping {
        let before = list.len();
        list = merge_overlapping(list);
        debug!(merged = before - list.len(), "merged overlapping subtitles");
    }
    if settings.offset_seconds != 0.0 {
        list = shift(list, settings.offset_seconds);
    }

    list
}

// Entries pushed entirely before zero are dropped; partial underflow is
// clamped at zero.
fn shift(subtitles: Vec<Subtitle>, offset: f64) -> Vec<Subtitle> {
    let mut shifted: Vec<Subtitle> = subtitles
        .into_iter()
        .filter_map(|mut subtitle| {
            subtitle.start += offset;
            subtitle.end += offset;
            if subtitle.end <= 0.0 {
                return None;
            }
            subtitle.start = subtitle.start.max(0.0);
            Some(subtitle)
        })
        .collect();
    renumber(&mut shifted);
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtitle(start: f64, end: f64, text: &str) -> Subtitle {
        Subtitle::new(0, start, end, text)
    }

    #[test]
    fn disabled_passes_leave_the_list_alone() {
        let list = vec![subtitle(0.0, 1.0, "a"), subtitle(0.5, 1.5, "a")];
        let result = run(list.clone(), &NormalizeSettings::default());
        assert_eq!(result, list);
    }

    #[test]
    fn positive_offset_shifts_everything() {
        let settings = NormalizeSettings {
            offset_seconds: 2.0,
            ..NormalizeSettings::default()
        };
        let result = run(vec![subtitle(1.0, 2.0, "a")], &settings);
        assert_eq!(result[0].start, 3.0);
        assert_eq!(result[0].end, 4.0);
    }

    #[test]
    fn negative_offset_clamps_and_drops() {
        let settings = NormalizeSettings {
            offset_seconds: -2.0,
            ..NormalizeSettings::default()
        };
        let result = run(
            vec![
                subtitle(0.0, 1.5, "gone"),
                subtitle(1.0, 3.0, "clamped"),
                subtitle(5.0, 6.0, "moved"),
            ],
            &settings,
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "clamped");
        assert_eq!(result[0].start, 0.0);
        assert_eq!(result[0].end, 1.0);
        assert_eq!(result[1].start, 3.0);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn passes_compose() {
        let settings = NormalizeSettings {
            dedupe: true,
            merge_overlapping: true,
            clean_text: true,
            offset_seconds: 0.0,
        };
        let result = run(
            vec![
                subtitle(2.0, 3.5, "later\r\nline"),
                subtitle(0.0, 2.5, "early"),
                subtitle(0.0, 2.5, "early"),
            ],
            &settings,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "early\nlater\nline");
        assert_eq!(result[0].start, 0.0);
        assert_eq!(result[0].end, 3.5);
    }
}
