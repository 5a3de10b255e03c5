use subtitle_studio_types::Subtitle;

/// Render just the texts, one entry per paragraph.
pub fn render_txt(subtitles: &[Subtitle]) -> String {
    let mut out = subtitles
        .iter()
        .map(|subtitle| subtitle.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
