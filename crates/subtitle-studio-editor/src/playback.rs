//! Mapping playback time onto the subtitle list.

use subtitle_studio_types::Subtitle;

/// Minimum spacing between processed playback ticks.
pub const PLAYBACK_TICK_INTERVAL_MS: f64 = 100.0;

/// Resolve the active subtitle for a playback position.
///
/// The scan is positional, not temporal: the active entry is the first one
/// whose start has been reached and whose *successor in the list* has not
/// started yet. After a move the list may not be start-sorted, and the
/// active entry still follows list adjacency. The last entry absorbs any
/// time past its end.
pub fn active_index(list: &[Subtitle], current_time: f64) -> Option<usize> {
    for (index, subtitle) in list.iter().enumerate() {
        if current_time < subtitle.start {
            continue;
        }
        match list.get(index + 1) {
            Some(next) => {
                if current_time < next.start {
                    return Some(index);
                }
            }
            None => return Some(index),
        }
    }
    None
}

/// Fraction of the entry already played, clamped to `0.0..=1.0`. Drives the
/// per-row progress indicator.
pub fn progress(subtitle: &Subtitle, current_time: f64) -> f64 {
    let span = subtitle.end - subtitle.start;
    if !span.is_finite() || span <= 0.0 {
        return 0.0;
    }
    ((current_time - subtitle.start) / span).clamp(0.0, 1.0)
}

/// Lets a tick through only when enough wall-clock time elapsed since the
/// previous accepted tick. Callers supply the clock, which keeps the
/// throttle deterministic under test.
#[derive(Debug, Default)]
pub struct TickThrottle {
    min_interval_ms: f64,
    last_ms: Option<f64>,
}

impl TickThrottle {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_ms: None,
        }
    }

    pub fn accept(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_ms
            && now_ms - last < self.min_interval_ms
        {
            return false;
        }
        self.last_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
