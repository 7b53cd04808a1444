//! Per-book build configuration.
//!
//! Each book is described by one TOML file: its metadata, where its manuscript
//! and images live, its front and back matter, its illustrations, and the
//! external tools used for the cover and for polishing. Relative paths are
//! resolved against the directory the file lives in, so a config can be built
//! from anywhere.

use crate::command::ExternalCommand;
use crate::cover::CoverConfig;
use crate::source::{Book, Colophon, Epigraph, RelatedBook, TimelineEntry};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for building one book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    pub book: Book,
    pub paths: PathsConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub epigraph: Epigraph,
    #[serde(default)]
    pub figures: Vec<FigureConfig>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub colophon: Colophon,
    #[serde(default)]
    pub cover: CoverConfig,
    /// Post-processing command. Placeholders: {input}, {output}.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polish: Option<ExternalCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Manuscript file the chapters are extracted from
    pub source: PathBuf,
    #[serde(default = "default_images")]
    pub images: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_covers_dir")]
    pub covers_dir: PathBuf,
}

fn default_images() -> PathBuf {
    PathBuf::from("images")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("books")
}

fn default_covers_dir() -> PathBuf {
    PathBuf::from("covers")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// When set, a different chapter count is warned about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_chapters: Option<usize>,
}

/// An illustration and the chapter it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Chapter number as it appears in the manuscript
    #[serde(deserialize_with = "display_string")]
    pub chapter: String,
    /// File name inside the image directory
    pub image: String,
    #[serde(default)]
    pub alt: String,
    /// Trusted markup
    #[serde(default)]
    pub caption: String,
}

/// Accept `chapter = 3` as well as `chapter = "3"` or `chapter = "Epilogue"`.
fn display_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Integer(i64),
        Text(String),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Integer(i) => i.to_string(),
        Label::Text(s) => s,
    })
}

impl Configuration {
    /// Load a config file and resolve its relative paths.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let mut config: Configuration = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new(""));
        config.resolve_paths(base);
        Ok(config)
    }

    /// Make every relative path relative to `base` instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.paths.source);
        resolve(&mut self.paths.images);
        resolve(&mut self.paths.output_dir);
        resolve(&mut self.paths.covers_dir);

        if let Some(mut image) = self.cover.image_path() {
            resolve(&mut image);
            self.cover.image = image.to_string_lossy().to_string();
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.paths.output_dir.join(self.book.epub_file_name())
    }

    /// A filled-in example config for a new book.
    pub fn starter(slug: &str) -> Configuration {
        Configuration {
            book: Book {
                title: "Untitled".to_string(),
                subtitle: String::new(),
                author: "HistorIQly".to_string(),
                series: "HistorIQly Books".to_string(),
                slug: slug.to_string(),
                description: String::new(),
                language: "en".to_string(),
                publisher: "HistorIQly".to_string(),
            },
            paths: PathsConfig {
                source: PathBuf::from(format!("{slug}.js")),
                images: default_images(),
                output_dir: default_output_dir(),
                covers_dir: default_covers_dir(),
            },
            extraction: ExtractionConfig::default(),
            epigraph: Epigraph {
                quote: "History is a set of lies agreed upon.".to_string(),
                attribution: "Napoleon Bonaparte".to_string(),
            },
            figures: vec![FigureConfig {
                chapter: "1".to_string(),
                image: format!("{slug}-1.jpg"),
                alt: "Describe the image".to_string(),
                caption: "Caption markup".to_string(),
            }],
            timeline: vec![TimelineEntry {
                date: "1900".to_string(),
                event: "Something happened".to_string(),
            }],
            colophon: Colophon {
                about: "What this book is about.".to_string(),
                published: None,
                bibliography: vec!["Author, <em>Title</em> (Year)".to_string()],
                related: vec![RelatedBook {
                    title: "Another Book".to_string(),
                    url: "https://historiqly.com/books".to_string(),
                }],
            },
            cover: CoverConfig::default(),
            polish: None,
        }
    }
}
