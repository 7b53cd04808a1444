//! Cover images.
//!
//! A book's cover is either a static image named in its config, or the output
//! of an external generator. Generated covers are cached at
//! `<covers_dir>/<slug>.<ext>`. Next to each one sits `<slug>.<ext>.sha256`,
//! the SHA-256 of the generator command line that produced it; the generator
//! only runs again when that key changes or either file is deleted.

use crate::command::ExternalCommand;
use crate::source::{mime_from_path, Book};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Cover configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Static cover image path. Empty string for none.
    pub image: String,
    /// Extension of cached covers
    pub extension: String,
    /// Program that draws the cover. Placeholders: {output}, {title},
    /// {subtitle}, {author}, {series}, {slug}.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<ExternalCommand>,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            image: String::new(),
            extension: "jpg".to_string(),
            generator: None,
        }
    }
}

impl CoverConfig {
    /// Returns the static cover image path, if configured.
    pub fn image_path(&self) -> Option<PathBuf> {
        if self.image.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.image))
        }
    }
}

/// Cover bytes ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub file_name: String,
    pub media_type: &'static str,
    pub data: Vec<u8>,
}

impl CoverImage {
    pub fn load(path: &Path) -> Result<CoverImage> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read cover image: {}", path.display()))?;
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "img".to_string());
        Ok(CoverImage {
            file_name: format!("cover.{extension}"),
            media_type: mime_from_path(path),
            data,
        })
    }
}

pub trait CoverGenerator {
    /// Identifies what `generate` would produce; a change forces regeneration.
    fn cache_key(&self, book: &Book, output: &Path) -> String;

    fn generate(&self, book: &Book, output: &Path) -> Result<()>;
}

fn placeholders<'a>(book: &'a Book, output: &'a str) -> [(&'static str, &'a str); 6] {
    [
        ("output", output),
        ("title", book.title.as_str()),
        ("subtitle", book.subtitle.as_str()),
        ("author", book.author.as_str()),
        ("series", book.series.as_str()),
        ("slug", book.slug.as_str()),
    ]
}

impl CoverGenerator for ExternalCommand {
    fn cache_key(&self, book: &Book, output: &Path) -> String {
        let output = output.to_string_lossy();
        self.command_line(&placeholders(book, &output))
    }

    fn generate(&self, book: &Book, output: &Path) -> Result<()> {
        let output = output.to_string_lossy();
        self.run(&placeholders(book, &output))
    }
}

#[derive(Debug, Clone)]
pub struct CoverCache {
    dir: PathBuf,
    extension: String,
}

impl CoverCache {
    pub fn new<P: Into<PathBuf>, S: ToString>(dir: P, extension: S) -> CoverCache {
        CoverCache {
            dir: dir.into(),
            extension: extension.to_string(),
        }
    }

    pub fn image_path(&self, book: &Book) -> PathBuf {
        self.dir.join(format!("{}.{}", book.slug, self.extension))
    }

    pub fn key_path(&self, book: &Book) -> PathBuf {
        self.dir
            .join(format!("{}.{}.sha256", book.slug, self.extension))
    }

    /// Return the cached cover, running `generator` first if the cache is
    /// missing or was made by a different command.
    pub fn get_or_generate(&self, book: &Book, generator: &dyn CoverGenerator) -> Result<PathBuf> {
        let image_path = self.image_path(book);
        let key_path = self.key_path(book);
        let key = hash_key(&generator.cache_key(book, &image_path));

        let cached_key = std::fs::read_to_string(&key_path).ok();
        if image_path.is_file() && cached_key.as_deref().map(str::trim) == Some(key.as_str()) {
            log::info!("Using cached cover {}", image_path.display());
            return Ok(image_path);
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cover directory {}", self.dir.display()))?;
        println!("Generating cover {}...", image_path.display());
        generator
            .generate(book, &image_path)
            .with_context(|| format!("Failed to generate cover for {}", book.slug))?;
        if !image_path.is_file() {
            bail!(
                "Cover generator finished but {} doesn't exist",
                image_path.display()
            );
        }

        std::fs::write(&key_path, format!("{key}\n"))
            .with_context(|| format!("Failed to write cover cache key {}", key_path.display()))?;
        Ok(image_path)
    }

    /// Work out the cover for `book`.
    ///
    /// A static image wins, then a generator, then whatever is already sitting
    /// in the cache. No cover at all is allowed and only warned about.
    pub fn provide(&self, config: &CoverConfig, book: &Book) -> Result<Option<CoverImage>> {
        if let Some(path) = config.image_path() {
            return CoverImage::load(&path).map(Some);
        }

        if let Some(generator) = &config.generator {
            let path = self.get_or_generate(book, generator)?;
            return CoverImage::load(&path).map(Some);
        }

        let cached = self.image_path(book);
        if cached.is_file() {
            log::info!("Using existing cover {}", cached.display());
            return CoverImage::load(&cached).map(Some);
        }

        log::warn!(
            "No cover configured for {}; building without one",
            book.slug
        );
        Ok(None)
    }
}

fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::BookBuilder;
    use std::cell::Cell;

    struct CountingGenerator {
        key: String,
        calls: Cell<usize>,
    }

    impl CountingGenerator {
        fn new(key: &str) -> Self {
            CountingGenerator {
                key: key.to_string(),
                calls: Cell::new(0),
            }
        }
    }

    impl CoverGenerator for CountingGenerator {
        fn cache_key(&self, _book: &Book, _output: &Path) -> String {
            self.key.clone()
        }

        fn generate(&self, _book: &Book, output: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            std::fs::write(output, b"cover")?;
            Ok(())
        }
    }

    fn book() -> Book {
        BookBuilder::default()
            .title("Tunguska")
            .author("A. Writer")
            .slug("tunguska")
            .build()
            .unwrap()
    }

    #[test]
    fn covers_are_generated_once_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CoverCache::new(dir.path().join("covers"), "jpg");
        let generator = CountingGenerator::new("v1");

        let path = cache.get_or_generate(&book(), &generator).unwrap();
        assert_eq!(path, dir.path().join("covers").join("tunguska.jpg"));
        cache.get_or_generate(&book(), &generator).unwrap();
        assert_eq!(generator.calls.get(), 1);

        let key = std::fs::read_to_string(cache.key_path(&book())).unwrap();
        assert_eq!(key.trim(), hash_key("v1"));
    }

    #[test]
    fn changing_the_key_regenerates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CoverCache::new(dir.path(), "jpg");

        let first = CountingGenerator::new("v1");
        cache.get_or_generate(&book(), &first).unwrap();
        let second = CountingGenerator::new("v2");
        cache.get_or_generate(&book(), &second).unwrap();
        assert_eq!(second.calls.get(), 1);
    }

    #[test]
    fn deleting_the_key_regenerates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CoverCache::new(dir.path(), "jpg");
        let generator = CountingGenerator::new("v1");

        cache.get_or_generate(&book(), &generator).unwrap();
        std::fs::remove_file(cache.key_path(&book())).unwrap();
        cache.get_or_generate(&book(), &generator).unwrap();
        assert_eq!(generator.calls.get(), 2);
    }

    #[test]
    fn generators_that_write_nothing_are_errors() {
        struct Lazy;
        impl CoverGenerator for Lazy {
            fn cache_key(&self, _book: &Book, _output: &Path) -> String {
                String::new()
            }
            fn generate(&self, _book: &Book, _output: &Path) -> Result<()> {
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let cache = CoverCache::new(dir.path(), "jpg");
        assert!(cache.get_or_generate(&book(), &Lazy).is_err());
    }

    #[test]
    fn static_images_win() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("art.PNG");
        std::fs::write(&image, b"png").unwrap();

        let config = CoverConfig {
            image: image.to_string_lossy().to_string(),
            ..CoverConfig::default()
        };
        let cover = CoverCache::new(dir.path(), "jpg")
            .provide(&config, &book())
            .unwrap()
            .expect("has cover");
        assert_eq!(cover.file_name, "cover.png");
        assert_eq!(cover.media_type, "image/png");
        assert_eq!(cover.data, b"png");
    }

    #[test]
    fn existing_cache_is_used_without_a_generator() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tunguska.jpg"), b"jpg").unwrap();

        let cache = CoverCache::new(dir.path(), "jpg");
        let cover = cache.provide(&CoverConfig::default(), &book()).unwrap();
        assert_eq!(cover.map(|c| c.data), Some(b"jpg".to_vec()));
    }

    #[test]
    fn no_cover_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CoverCache::new(dir.path(), "jpg");
        assert_eq!(
            cache.provide(&CoverConfig::default(), &book()).unwrap(),
            None
        );
    }

    #[test]
    fn command_cache_keys_include_book_details() {
        let command = ExternalCommand::new("cover-gen", &["--title={title}", "{output}"]);
        let key = command.cache_key(&book(), Path::new("covers/tunguska.jpg"));
        assert_eq!(key, "cover-gen --title=Tunguska covers/tunguska.jpg");
    }
}
