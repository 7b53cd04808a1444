//! Title page rendering.
//!
//! Everything here comes from the book's metadata, which is plain text, so it
//! is all escaped.

use crate::source::Book;
use html_escape::encode_text;

/// Render the title page body.
pub fn render(book: &Book) -> String {
    let mut lines = vec![format!("<h1>{}</h1>", encode_text(&book.title))];

    if !book.subtitle.is_empty() {
        lines.push(format!(
            r#"<p class="subtitle">{}</p>"#,
            encode_text(&book.subtitle)
        ));
    }
    if !book.series.is_empty() {
        lines.push(format!(
            r#"<p class="series">{}</p>"#,
            encode_text(&book.series)
        ));
    }
    lines.push(format!(
        r#"<p class="author">{}</p>"#,
        encode_text(&book.author)
    ));
    if !book.publisher.is_empty() {
        lines.push(format!(
            r#"<p class="publisher">{}</p>"#,
            encode_text(&book.publisher)
        ));
    }

    format!("<div class=\"title-page\">\n{}\n</div>", lines.join("\n"))
}
