mod book;
pub use book::*;

mod chapter;
pub use chapter::*;

mod extractor;
pub use extractor::*;

mod images;
pub use images::*;

mod matter;
pub use matter::*;

use std::collections::HashMap;

/// Everything we need to know to assemble a book
#[derive(Debug, Clone)]
pub struct Manuscript {
    pub book: Book,

    /// Chapters in reading order, with their illustrations attached
    pub chapters: Vec<Chapter>,

    pub epigraph: Epigraph,
    pub timeline: Vec<TimelineEntry>,
    pub colophon: Colophon,
}

impl Manuscript {
    pub fn new(book: Book) -> Manuscript {
        Manuscript {
            book,
            chapters: Vec::default(),
            epigraph: Epigraph::default(),
            timeline: Vec::default(),
            colophon: Colophon::default(),
        }
    }

    pub fn add_chapter(&mut self, chapter: Chapter) -> &mut Self {
        self.chapters.push(chapter);
        self
    }

    pub fn set_epigraph(&mut self, epigraph: Epigraph) -> &mut Self {
        self.epigraph = epigraph;
        self
    }

    pub fn add_timeline_entry<D: ToString, E: ToString>(&mut self, date: D, event: E) -> &mut Self {
        self.timeline.push(TimelineEntry {
            date: date.to_string(),
            event: event.to_string(),
        });
        self
    }

    pub fn set_colophon(&mut self, colophon: Colophon) -> &mut Self {
        self.colophon = colophon;
        self
    }

    /// Attach each figure to the chapter with the matching number.
    ///
    /// Figures naming a chapter that doesn't exist are dropped with a warning.
    /// When two chapters share a number the figure goes to the first of them.
    /// Returns how many figures were attached.
    pub fn attach_figures<I>(&mut self, figures: I) -> usize
    where
        I: IntoIterator<Item = (String, Figure)>,
    {
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, chapter) in self.chapters.iter().enumerate() {
            if index.contains_key(chapter.number.as_str()) {
                log::warn!(
                    "Chapter number {} is used more than once; figures attach to the first",
                    chapter.number
                );
            } else {
                index.insert(chapter.number.as_str(), i);
            }
        }

        let mut placements = Vec::new();
        for (number, figure) in figures {
            match index.get(number.as_str()) {
                Some(&i) => placements.push((i, figure)),
                None => log::warn!(
                    "Figure `{}` names chapter {number}, which doesn't exist; skipping it",
                    figure.alt
                ),
            }
        }

        let attached = placements.len();
        for (i, figure) in placements {
            self.chapters[i].add_figure(figure);
        }
        attached
    }
}
