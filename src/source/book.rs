use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bibliographic details of a single book in the series
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct Book {
    pub title: String,

    #[builder(default)]
    #[serde(default)]
    pub subtitle: String,

    pub author: String,

    /// Series label shown on the title page and used as the EPUB subject
    #[builder(default = "default_series()")]
    #[serde(default = "default_series")]
    pub series: String,

    /// Stem of the output `.epub` and of the cached cover image
    pub slug: String,

    #[builder(default)]
    #[serde(default)]
    pub description: String,

    /// BCP 47 language tag
    #[builder(default = "default_language()")]
    #[serde(default = "default_language")]
    pub language: String,

    #[builder(default = "default_publisher()")]
    #[serde(default = "default_publisher")]
    pub publisher: String,
}

fn default_series() -> String {
    "HistorIQly Books".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_publisher() -> String {
    "HistorIQly".to_string()
}

impl Book {
    /// Title and subtitle joined the way they appear in library listings
    pub fn full_title(&self) -> String {
        if self.subtitle.is_empty() {
            self.title.clone()
        } else {
            format!("{}: {}", self.title, self.subtitle)
        }
    }

    pub fn epub_file_name(&self) -> String {
        format!("{}.epub", self.slug)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.full_title(), self.author)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_create_book_with_builder_pattern() {
        let book = BookBuilder::default()
            .title("The Radium Girls")
            .author("HistorIQly")
            .slug("radium-girls")
            .build()
            .expect("can build book");

        assert_eq!(book.language, "en");
        assert_eq!(book.publisher, "HistorIQly");
        assert_eq!(book.series, "HistorIQly Books");
        assert_eq!(book.epub_file_name(), "radium-girls.epub");
    }

    #[test]
    fn book_gets_formatted_decently() {
        let book = BookBuilder::default()
            .title("The Radium Girls")
            .subtitle("Poison in the Paint")
            .author("Jane Doe")
            .slug("radium-girls")
            .build()
            .unwrap();

        assert_eq!(
            book.to_string(),
            "The Radium Girls: Poison in the Paint by Jane Doe".to_string()
        );
    }

    #[test]
    fn missing_fields_take_defaults_when_deserialising() {
        let book: Book = toml::from_str(
            r#"
            title = "Tunguska"
            author = "HistorIQly"
            slug = "tunguska"
            "#,
        )
        .expect("can parse book");
        assert_eq!(book.subtitle, "");
        assert_eq!(book.language, "en");
        assert_eq!(book.full_title(), "Tunguska");
    }
}
