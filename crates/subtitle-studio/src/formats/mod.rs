//! Subtitle file formats: SRT and JSON in both directions, VTT and plain
//! text as export targets.

mod json;
mod srt;
mod txt;
mod vtt;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use subtitle_studio_types::Subtitle;

use crate::settings::DisplaySettings;

pub use json::{parse_json, render_json};
pub use srt::{parse_srt, render_srt};
pub use txt::render_txt;
pub use vtt::render_vtt;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Format {
    Srt,
    Vtt,
    Json,
    Txt,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Srt => "srt",
            Format::Vtt => "vtt",
            Format::Json => "json",
            Format::Txt => "txt",
        }
    }

    pub fn available() -> Vec<Format> {
        vec![Format::Srt, Format::Vtt, Format::Json, Format::Txt]
    }

    pub fn from_extension(path: &Path) -> Option<Format> {
        let extension = path.extension()?.to_str()?;
        Format::from_str(extension).ok()
    }

    /// Whether this format can be read, not just written.
    pub fn readable(self) -> bool {
        matches!(self, Format::Srt | Format::Json)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct FormatParseError(pub String);

impl fmt::Display for FormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown subtitle format '{}'", self.0)
    }
}

impl std::error::Error for FormatParseError {}

impl FromStr for Format {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "srt" => Ok(Format::Srt),
            "vtt" => Ok(Format::Vtt),
            "json" => Ok(Format::Json),
            "txt" => Ok(Format::Txt),
            _ => Err(FormatParseError(lower)),
        }
    }
}

/// Errors raised while reading or writing subtitle content.
#[derive(Debug)]
pub enum FormatError {
    MissingTimestamp {
        cue: usize,
    },
    InvalidTimestamp {
        cue: usize,
        value: String,
    },
    InvalidTiming {
        cue: usize,
        start: f64,
        end: f64,
    },
    UnsupportedInput {
        format: Format,
    },
    Json {
        source: serde_json::Error,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::MissingTimestamp { cue } => {
                write!(f, "cue {cue} has no timestamp line")
            }
            FormatError::InvalidTimestamp { cue, value } => {
                write!(f, "cue {cue} has an unreadable timestamp '{value}'")
            }
            FormatError::InvalidTiming { cue, start, end } => {
                write!(f, "cue {cue} has start {start} not before end {end}")
            }
            FormatError::UnsupportedInput { format } => {
                write!(f, "{format} files can be written but not read")
            }
            FormatError::Json { source } => write!(f, "json failure: {source}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Json { source } => Some(source),
            _ => None,
        }
    }
}

/// Parse subtitle content in a readable format.
pub fn parse(format: Format, content: &str) -> Result<Vec<Subtitle>, FormatError> {
    match format {
        Format::Srt => parse_srt(content),
        Format::Json => parse_json(content),
        Format::Vtt | Format::Txt => Err(FormatError::UnsupportedInput { format }),
    }
}

/// Render subtitles in any supported format.
pub fn render(
    format: Format,
    subtitles: &[Subtitle],
    display: &DisplaySettings,
) -> Result<String, FormatError> {
    match format {
        Format::Srt => Ok(render_srt(subtitles)),
        Format::Vtt => Ok(render_vtt(subtitles, display)),
        Format::Json => render_json(subtitles),
        Format::Txt => Ok(render_txt(subtitles)),
    }
}
