use super::images::ImageRef;

/// An illustration attached to a chapter. The caption is trusted markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub image: Option<ImageRef>,
    pub alt: String,
    pub caption: String,
}

/// One chapter of narrative, in the order it was found in the manuscript
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chapter {
    /// Display label, e.g. "1", "IV" or "Epilogue"
    pub number: String,
    pub title: String,
    /// Trusted HTML (or plain text paragraphs) authored alongside the book
    pub body: String,
    pub figures: Vec<Figure>,
}

impl Chapter {
    pub fn new<N: ToString, T: ToString, B: ToString>(number: N, title: T, body: B) -> Chapter {
        Chapter {
            number: number.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            figures: Vec::default(),
        }
    }

    pub fn add_figure(&mut self, figure: Figure) -> &mut Self {
        self.figures.push(figure);
        self
    }

    /// Images that will actually be rendered for this chapter
    pub fn images(&self) -> impl Iterator<Item = &ImageRef> {
        self.figures.iter().filter_map(|f| f.image.as_ref())
    }
}
