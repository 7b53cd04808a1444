//! Static front and back matter that each book carries alongside its chapters.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epigraph {
    /// Trusted markup
    pub quote: String,
    #[serde(default)]
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: String,
    /// Trusted markup
    pub event: String,
}

/// Another title in the series, linked from the colophon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedBook {
    pub title: String,
    pub url: String,
}

/// The closing "About This Book" page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colophon {
    /// Trusted markup; paragraphs separated by blank lines when plain text
    pub about: String,
    /// First publication date, written `YYYY-MM-DD`
    #[serde(
        deserialize_with = "publication_date",
        serialize_with = "serialize_publication_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub published: Option<NaiveDate>,
    /// Trusted markup, one entry per source
    pub bibliography: Vec<String>,
    pub related: Vec<RelatedBook>,
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An empty string means no date.
fn publication_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let text = String::deserialize(deserializer)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|e| de::Error::custom(format!("invalid publication date `{text}`: {e}")))
}

fn serialize_publication_date<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}
