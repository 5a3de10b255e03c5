use subtitle_studio_types::{Subtitle, format_srt_timestamp, parse_timestamp, renumber};

use super::FormatError;

/// Render the list as SubRip text. Cue numbers come from list position.
pub fn render_srt(subtitles: &[Subtitle]) -> String {
    let mut out = String::new();
    for (index, subtitle) in subtitles.iter().enumerate() {
        out.push_str(&(index + 1).to_string());
        out.push('\n');
        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(subtitle.start),
            format_srt_timestamp(subtitle.end)
        ));
        for line in subtitle.text.lines() {
            out.push_str(line);
            out.push('\n');
        }
        if subtitle.text.is_empty() {
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Parse SubRip text. Cue numbers in the file are ignored; entries are
/// renumbered by position.
pub fn parse_srt(content: &str) -> Result<Vec<Subtitle>, FormatError> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut subtitles = Vec::new();

    for (block_index, block) in normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .enumerate()
    {
        let cue = block_index + 1;
        let mut lines = block.lines().peekable();

        // Leading cue number is optional.
        if let Some(first) = lines.peek()
            && is_cue_number(first)
        {
            lines.next();
        }

        let Some(timing) = lines.next() else {
            return Err(FormatError::MissingTimestamp { cue });
        };
        let Some((raw_start, raw_end)) = timing.split_once("-->") else {
            return Err(FormatError::MissingTimestamp { cue });
        };
        let start = parse_timestamp(raw_start).ok_or_else(|| FormatError::InvalidTimestamp {
            cue,
            value: raw_start.trim().to_string(),
        })?;
        let end = parse_timestamp(raw_end).ok_or_else(|| FormatError::InvalidTimestamp {
            cue,
            value: raw_end.trim().to_string(),
        })?;
        if start >= end {
            return Err(FormatError::InvalidTiming { cue, start, end });
        }

        let text = lines.collect::<Vec<_>>().join("\n");
        subtitles.push(Subtitle::new(0, start, end, text));
    }

    renumber(&mut subtitles);
    Ok(subtitles)
}

fn is_cue_number(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}
