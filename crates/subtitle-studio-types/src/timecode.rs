//! Timecode parsing and formatting.
//!
//! Four textual forms are supported: SRT (`HH:MM:SS,mmm`), VTT
//! (`HH:MM:SS.mmm`), the clock form (`MMmSSsNNNms`), and the short editor
//! input form (`MM:SS.cc`). Bare fractional seconds also parse.

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_timestamp(seconds: f64) -> String {
    let (hours, minutes, secs, millis) = split_seconds(seconds);
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Format seconds as a WebVTT timestamp (`HH:MM:SS.mmm`).
pub fn format_vtt_timestamp(seconds: f64) -> String {
    let (hours, minutes, secs, millis) = split_seconds(seconds);
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}

/// Format seconds in the clock form (`MMmSSsNNNms`). Minutes are not capped.
pub fn format_clock(seconds: f64) -> String {
    let (hours, minutes, secs, millis) = split_seconds(seconds);
    let minutes = hours * 60 + minutes;
    format!("{minutes:02}m{secs:02}s{millis:03}ms")
}

/// Format seconds in the short editor input form (`MM:SS.cc`).
pub fn format_edit_input(seconds: f64) -> String {
    let total_cs = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 100.0).round() as u64
    } else {
        0
    };
    let minutes = total_cs / 6000;
    let secs = (total_cs / 100) % 60;
    let centis = total_cs % 100;
    format!("{minutes:02}:{secs:02}.{centis:02}")
}

/// Parse any supported timestamp form into seconds.
///
/// Returns `None` for unrecognized input; callers pick the fallback.
pub fn parse_timestamp(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    parse_long(value)
        .or_else(|| parse_clock(value))
        .or_else(|| parse_edit_input(value))
        .or_else(|| parse_seconds(value))
}

fn split_seconds(seconds: f64) -> (u64, u64, u64, u64) {
    if !seconds.is_finite() || seconds <= 0.0 {
        return (0, 0, 0, 0);
    }
    let total_ms = (seconds * 1000.0).floor() as u64;
    let total_secs = total_ms / 1000;
    (
        total_secs / 3600,
        (total_secs / 60) % 60,
        total_secs % 60,
        total_ms % 1000,
    )
}

// `HH:MM:SS,mmm` or `HH:MM:SS.mmm`.
fn parse_long(value: &str) -> Option<f64> {
    let (hours, rest) = value.split_once(':')?;
    let (minutes, rest) = rest.split_once(':')?;
    let (secs, millis) = rest.split_once([',', '.'])?;
    if millis.len() != 3 {
        return None;
    }
    let hours = parse_digits(hours)?;
    let minutes = parse_digits(minutes)?;
    let secs = parse_digits(secs)?;
    let millis = parse_digits(millis)?;
    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + secs as f64 + millis as f64 / 1000.0)
}

// `MMmSSsNNNms`.
fn parse_clock(value: &str) -> Option<f64> {
    let rest = value.strip_suffix("ms")?;
    let (minutes, rest) = rest.split_once('m')?;
    let (secs, millis) = rest.split_once('s')?;
    let minutes = parse_digits(minutes)?;
    let secs = parse_digits(secs)?;
    let millis = parse_digits(millis)?;
    Some(minutes as f64 * 60.0 + secs as f64 + millis as f64 / 1000.0)
}

// `MM:SS.cc`, two digits per component.
fn parse_edit_input(value: &str) -> Option<f64> {
    let (minutes, rest) = value.split_once(':')?;
    let (secs, centis) = rest.split_once('.')?;
    if minutes.len() != 2 || secs.len() != 2 || centis.len() != 2 {
        return None;
    }
    let minutes = parse_digits(minutes)?;
    let secs = parse_digits(secs)?;
    let centis = parse_digits(centis)?;
    Some(minutes as f64 * 60.0 + secs as f64 + centis as f64 / 100.0)
}

// Bare non-negative seconds, optionally fractional.
fn parse_seconds(value: &str) -> Option<f64> {
    let mut dots = 0usize;
    for ch in value.chars() {
        match ch {
            '0'..='9' => {}
            '.' => dots += 1,
            _ => return None,
        }
    }
    if dots > 1 || value.starts_with('.') || value.ends_with('.') {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srt_formatting_floors_milliseconds() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(61.5), "00:01:01,500");
        assert_eq!(format_srt_timestamp(3723.0079), "01:02:03,007");
        assert_eq!(format_srt_timestamp(f64::NAN), "00:00:00,000");
        assert_eq!(format_srt_timestamp(-3.0), "00:00:00,000");
    }

    #[test]
    fn vtt_formatting_uses_dot_separator() {
        assert_eq!(format_vtt_timestamp(61.5), "00:01:01.500");
    }

    #[test]
    fn clock_formatting_does_not_cap_minutes() {
        assert_eq!(format_clock(0.25), "00m00s250ms");
        assert_eq!(format_clock(3723.5), "62m03s500ms");
    }

    #[test]
    fn edit_input_rounds_to_centiseconds() {
        assert_eq!(format_edit_input(65.259), "01:05.26");
        assert_eq!(format_edit_input(59.999), "01:00.00");
    }

    #[test]
    fn parses_srt_and_vtt_forms() {
        assert_eq!(parse_timestamp("00:01:01,500"), Some(61.5));
        assert_eq!(parse_timestamp("01:02:03.007"), Some(3723.007));
        assert_eq!(parse_timestamp("00:00:00,00"), None);
    }

    #[test]
    fn parses_clock_form() {
        assert_eq!(parse_timestamp("02m05s250ms"), Some(125.25));
        assert_eq!(parse_timestamp("02m05s250"), None);
    }

    #[test]
    fn parses_edit_input_form() {
        assert_eq!(parse_timestamp("01:05.26"), Some(65.26));
        assert_eq!(parse_timestamp("1:05.26"), None);
    }

    #[test]
    fn parses_bare_seconds() {
        assert_eq!(parse_timestamp("12"), Some(12.0));
        assert_eq!(parse_timestamp("12.75"), Some(12.75));
        assert_eq!(parse_timestamp("-3"), None);
        assert_eq!(parse_timestamp("1.2.3"), None);
        assert_eq!(parse_timestamp("abc"), None);
    }

    #[test]
    fn format_and_parse_round_trip() {
        let value = 4517.042;
        let parsed = parse_timestamp(&format_srt_timestamp(value)).unwrap();
        assert!((parsed - value).abs() < 0.001);
    }
}
