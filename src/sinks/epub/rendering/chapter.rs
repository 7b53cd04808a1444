//! Chapter rendering.
//!
//! A chapter page is its number label, its title, its body and then each of
//! its illustrations in the order they were attached. Bodies are trusted and
//! are never escaped.

use super::{figures::figure, paragraphs};
use crate::source::Chapter;
use html_escape::encode_text;

/// Render a chapter page body.
pub fn render(chapter: &Chapter) -> String {
    let mut html = format!(
        "<p class=\"chapter-number\">Chapter {}</p>\n<h2 class=\"chapter-title\">{}</h2>\n{}",
        encode_text(&chapter.number),
        encode_text(&chapter.title),
        paragraphs(&chapter.body),
    );

    for f in &chapter.figures {
        let figure_html = figure(f.image.as_ref(), &f.alt, &f.caption);
        if !figure_html.is_empty() {
            html.push('\n');
            html.push_str(&figure_html);
        }
    }

    html
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::{Figure, ImageRef};
    use std::path::PathBuf;

    #[test]
    fn chapter_has_label_title_and_body() {
        let chapter = Chapter::new("3", "Don't Go There", "<p>It was late.</p>");
        assert_eq!(
            render(&chapter),
            concat!(
                "<p class=\"chapter-number\">Chapter 3</p>\n",
                "<h2 class=\"chapter-title\">Don't Go There</h2>\n",
                "<p>It was late.</p>"
            )
        );
    }

    #[test]
    fn figures_follow_the_body_in_order() {
        let image = |name: &str| ImageRef {
            path: PathBuf::from(name),
            href: format!("images/{name}"),
            media_type: "image/jpeg",
            data: Vec::new(),
        };

        let mut chapter = Chapter::new("1", "Intro", "Hello.");
        chapter
            .add_figure(Figure {
                image: Some(image("a.jpg")),
                alt: "first".to_string(),
                caption: String::new(),
            })
            .add_figure(Figure {
                image: None,
                alt: "missing".to_string(),
                caption: "never shown".to_string(),
            })
            .add_figure(Figure {
                image: Some(image("b.jpg")),
                alt: "second".to_string(),
                caption: String::new(),
            });

        let html = render(&chapter);
        let body = html.find("<p>Hello.</p>").expect("body rendered");
        let first = html.find("images/a.jpg").expect("first figure rendered");
        let second = html.find("images/b.jpg").expect("second figure rendered");
        assert!(body < first && first < second);
        assert!(!html.contains("never shown"));
        assert!(!html.contains(r#"src="""#));
    }
}
