use subtitle_studio_types::{Subtitle, format_vtt_timestamp};

use crate::settings::{DisplaySettings, SubtitlePosition};

/// Render the list as WebVTT. Display settings become a `STYLE` block and,
/// for top-positioned subtitles, a `line` cue setting.
pub fn render_vtt(subtitles: &[Subtitle], display: &DisplaySettings) -> String {
    let mut out = String::from("WEBVTT\n\n");

    out.push_str("STYLE\n::cue {\n");
    out.push_str(&format!("  color: {};\n", display.color));
    out.push_str(&format!("  font-size: {}px;\n", display.font_size));
    out.push_str("}\n\n");

    let cue_settings = match display.position {
        SubtitlePosition::Top => " line:0",
        SubtitlePosition::Bottom => "",
    };

    for (index, subtitle) in subtitles.iter().enumerate() {
        out.push_str(&(index + 1).to_string());
        out.push('\n');
        out.push_str(&format!(
            "{} --> {}{}\n",
            format_vtt_timestamp(subtitle.start),
            format_vtt_timestamp(subtitle.end),
            cue_settings
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
