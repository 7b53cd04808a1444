//! The "About This Book" page.
//!
//! Closes the book with the about text, the first publication date, the
//! bibliography and links to the rest of the series.

use super::paragraphs;
use crate::source::{Book, Colophon};
use html_escape::{encode_double_quoted_attribute, encode_text};

pub const TITLE: &str = "About This Book";

/// Render the colophon page body.
pub fn render(book: &Book, colophon: &Colophon) -> String {
    let mut parts = vec![format!("<h2>{TITLE}</h2>")];

    if !colophon.about.trim().is_empty() {
        parts.push(paragraphs(&colophon.about));
    }

    if let Some(date) = colophon.published {
        parts.push(format!(
            r#"<p class="published">First published by {} on {}.</p>"#,
            encode_text(&book.publisher),
            date.format("%-d %B %Y")
        ));
    }

    if !colophon.bibliography.is_empty() {
        let items = colophon
            .bibliography
            .iter()
            .map(|source| format!("<li>{}</li>", source.trim()))
            .collect::<Vec<_>>()
            .join("\n");
        parts.push(format!(
            "<h3>Sources and Further Reading</h3>\n<ul class=\"bibliography\">\n{items}\n</ul>"
        ));
    }

    if !colophon.related.is_empty() {
        let items = colophon
            .related
            .iter()
            .map(|related| {
                format!(
                    r#"<li><a href="{}">{}</a></li>"#,
                    encode_double_quoted_attribute(&related.url),
                    encode_text(&related.title)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        parts.push(format!(
            "<h3>More from {}</h3>\n<ul class=\"related\">\n{items}\n</ul>",
            encode_text(&book.series)
        ));
    }

    format!("<div class=\"colophon\">\n{}\n</div>", parts.join("\n"))
}
