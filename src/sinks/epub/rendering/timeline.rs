use crate::source::TimelineEntry;
use html_escape::encode_text;

/// Render the timeline appendix body. Events are trusted markup.
pub fn render(entries: &[TimelineEntry]) -> String {
    if entries.is_empty() {
        return "<div class=\"timeline\">\n<h2>Timeline</h2>\n</div>".to_string();
    }

    let items = entries
        .iter()
        .map(|entry| {
            format!(
                "<dt>{}</dt>\n<dd>{}</dd>",
                encode_text(&entry.date),
                entry.event.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("<div class=\"timeline\">\n<h2>Timeline</h2>\n<dl>\n{items}\n</dl>\n</div>")
}
