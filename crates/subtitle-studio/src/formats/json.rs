use subtitle_studio_types::{Subtitle, renumber};

use super::FormatError;

/// Render the list as the flat JSON array used by the sidecar store.
pub fn render_json(subtitles: &[Subtitle]) -> Result<String, FormatError> {
    let mut out = serde_json::to_string_pretty(subtitles)
        .map_err(|source| FormatError::Json { source })?;
    out.push('\n');
    Ok(out)
}

/// Parse the flat JSON array, validating timing and renumbering by position.
pub fn parse_json(content: &str) -> Result<Vec<Subtitle>, FormatError> {
    let mut subtitles: Vec<Subtitle> =
        serde_json::from_str(content).map_err(|source| FormatError::Json { source })?;
    for (index, subtitle) in subtitles.iter().enumerate() {
        if !subtitle.is_valid() {
            return Err(FormatError::InvalidTiming {
                cue: index + 1,
                start: subtitle.start,
                end: subtitle.end,
            });
        }
    }
    renumber(&mut subtitles);
    Ok(subtitles)
}
