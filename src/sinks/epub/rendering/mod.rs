//! Document assembly.
//!
//! Turns a `Manuscript` into the ordered list of sections handed to the
//! compiler: title page, epigraph, one section per chapter, timeline and
//! colophon. The order here is the reading order of the finished book and the
//! order of its table of contents.

mod chapter;
mod colophon;
mod epigraph;
mod figures;
mod timeline;
mod title_page;

pub use figures::figure;

use crate::source::{ImageRef, Manuscript};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    TitlePage,
    Epigraph,
    Chapter,
    Timeline,
    Colophon,
}

/// A named HTML fragment that becomes one document in the book.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    /// Table of contents entry
    pub title: String,
    pub file_name: String,
    /// Body fragment; the compiler wraps it into a complete XHTML document
    pub content: String,
    /// Images the content refers to
    pub images: Vec<ImageRef>,
}

impl Section {
    fn new<T: ToString, F: ToString>(
        kind: SectionKind,
        title: T,
        file_name: F,
        content: String,
    ) -> Section {
        Section {
            kind,
            title: title.to_string(),
            file_name: file_name.to_string(),
            content,
            images: Vec::default(),
        }
    }
}

/// Assemble every section of the book, in reading order.
///
/// Always produces `chapters.len() + 4` sections.
pub fn assemble(manuscript: &Manuscript) -> Vec<Section> {
    let mut sections = Vec::with_capacity(manuscript.chapters.len() + 4);

    sections.push(Section::new(
        SectionKind::TitlePage,
        "Title Page",
        "title-page.xhtml",
        title_page::render(&manuscript.book),
    ));

    sections.push(Section::new(
        SectionKind::Epigraph,
        "Epigraph",
        "epigraph.xhtml",
        epigraph::render(&manuscript.epigraph),
    ));

    for (i, ch) in manuscript.chapters.iter().enumerate() {
        let mut section = Section::new(
            SectionKind::Chapter,
            &ch.title,
            format!("chapter-{:04}.xhtml", i + 1),
            chapter::render(ch),
        );
        section.images = ch.images().cloned().collect();
        sections.push(section);
    }

    sections.push(Section::new(
        SectionKind::Timeline,
        "Timeline",
        "timeline.xhtml",
        timeline::render(&manuscript.timeline),
    ));

    sections.push(Section::new(
        SectionKind::Colophon,
        colophon::TITLE,
        "colophon.xhtml",
        colophon::render(&manuscript.book, &manuscript.colophon),
    ));

    sections
}

/// Markup is passed through untouched; plain text becomes one `<p>` per
/// blank-line separated paragraph.
pub(crate) fn paragraphs(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() || text.starts_with('<') {
        return text.to_string();
    }

    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
        .into_iter()
        .map(|lines| format!("<p>{}</p>", lines.join("\n")))
        .collect::<Vec<_>>()
        .join("\n")
}
