//! List and text cleanup applied to freshly ingested subtitles.

use std::collections::HashSet;

use crate::subtitle::{Subtitle, renumber};
use crate::timecode::parse_timestamp;

/// Drop duplicate entries (same start, same trimmed text), sort the rest by
/// start time, and renumber. Entries without text are discarded.
pub fn dedupe_and_sort(subtitles: Vec<Subtitle>) -> Vec<Subtitle> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Subtitle> = subtitles
        .into_iter()
        .filter(|subtitle| !subtitle.text.is_empty() && subtitle.start.is_finite())
        .filter(|subtitle| seen.insert((subtitle.start.to_bits(), subtitle.text.trim().to_string())))
        .collect();
    unique.sort_by(|a, b| a.start.total_cmp(&b.start));
    renumber(&mut unique);
    unique
}

/// Strip stray SRT scaffolding (cue numbers, timestamp lines, bracketed clock
/// lines) that models sometimes echo back inside subtitle text, normalize
/// line endings, and drop blank lines.
pub fn clean_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let kept: Vec<&str> = normalized
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !is_cue_number(trimmed)
                && !is_timestamp_line(trimmed)
                && !is_bracket_clock_line(trimmed)
        })
        .collect();
    kept.join("\n").trim().to_string()
}

/// Merge chains of overlapping entries into single entries spanning the
/// union, joining texts with a newline. Input order is not trusted; the
/// result is sorted by start and renumbered.
pub fn merge_overlapping(subtitles: Vec<Subtitle>) -> Vec<Subtitle> {
    if subtitles.len() <= 1 {
        return subtitles;
    }

    let mut sorted = subtitles;
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Subtitle> = Vec::with_capacity(sorted.len());
    let mut current = sorted.remove(0);
    for next in sorted {
        if current.end >= next.start {
            current.end = current.end.max(next.end);
            current.text = format!("{}\n{}", current.text, next.text);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    renumber(&mut merged);
    merged
}

fn is_cue_number(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

fn is_timestamp_line(line: &str) -> bool {
    let Some((left, right)) = line.split_once("-->") else {
        return false;
    };
    parse_timestamp(left).is_some() && parse_timestamp(right).is_some()
}

// `[ 0m1s200ms - 0m3s400ms ]`
fn is_bracket_clock_line(line: &str) -> bool {
    let Some(inner) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) else {
        return false;
    };
    let Some((left, right)) = inner.split_once('-') else {
        return false;
    };
    let left = left.trim();
    let right = right.trim();
    left.ends_with("ms") && right.ends_with("ms") && parse_timestamp(left).is_some() && parse_timestamp(right).is_some()
}
