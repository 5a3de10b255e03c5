use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single timed text entry.
///
/// `id` mirrors the 1-based position in the owning list and is reassigned
/// after every structural edit; callers must not hold ids across edits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Subtitle {
    pub fn new(id: u32, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Timing sanity check: finite, non-negative, and strictly ordered.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.start < self.end
    }
}

/// Which timing boundary an edit targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeField {
    Start,
    End,
}

impl TimeField {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeField::Start => "start",
            TimeField::End => "end",
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct TimeFieldParseError(pub String);

impl fmt::Display for TimeFieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown time field '{}'", self.0)
    }
}

impl std::error::Error for TimeFieldParseError {}

impl FromStr for TimeField {
    type Err = TimeFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "start" => Ok(TimeField::Start),
            "end" => Ok(TimeField::End),
            _ => Err(TimeFieldParseError(lower)),
        }
    }
}

/// Reassign every id to its 1-based list position.
pub fn renumber(subtitles: &mut [Subtitle]) {
    for (index, subtitle) in subtitles.iter_mut().enumerate() {
        subtitle.id = index as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_requires_ordered_finite_times() {
        assert!(Subtitle::new(1, 0.0, 2.0, "a").is_valid());
        assert!(!Subtitle::new(1, 2.0, 2.0, "a").is_valid());
        assert!(!Subtitle::new(1, 3.0, 2.0, "a").is_valid());
        assert!(!Subtitle::new(1, -0.5, 2.0, "a").is_valid());
        assert!(!Subtitle::new(1, f64::NAN, 2.0, "a").is_valid());
    }

    #[test]
    fn renumber_assigns_one_based_positions() {
        let mut subtitles = vec![
            Subtitle::new(9, 0.0, 1.0, "a"),
            Subtitle::new(4, 1.0, 2.0, "b"),
        ];
        renumber(&mut subtitles);
        assert_eq!(subtitles[0].id, 1);
        assert_eq!(subtitles[1].id, 2);
    }

    #[test]
    fn subtitle_json_uses_flat_field_names() {
        let subtitle = Subtitle::new(1, 1.5, 3.0, "hello");
        let json = serde_json::to_string(&subtitle).unwrap();
        assert_eq!(json, r#"{"id":1,"start":1.5,"end":3.0,"text":"hello"}"#);
        let back: Subtitle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subtitle);
    }

    #[test]
    fn time_field_round_trips_through_str() {
        assert_eq!("start".parse::<TimeField>().unwrap(), TimeField::Start);
        assert_eq!("End".parse::<TimeField>().unwrap(), TimeField::End);
        assert!("middle".parse::<TimeField>().is_err());
    }
}
