//! The build of one book, start to finish.
//!
//! Directories, cover, chapters, figures, assembly, compilation, write,
//! polish. Each step runs once, in order; the first failure ends the build and
//! may leave a stale or partial file at the output path.

use crate::config::Configuration;
use crate::cover::CoverCache;
use crate::polish::{Polish, Polisher};
use crate::sinks::{assemble, EpubCompiler};
use crate::source::{extract_chapters, Chapter, Figure, ImageResolver, Manuscript};
use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use std::path::PathBuf;

/// What a finished build produced, used for user feedback.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub slug: String,
    pub output: PathBuf,
    pub chapters: usize,
    pub figures: usize,
    pub sections: usize,
    pub bytes: u64,
}

/// Build the book described by `config`.
pub fn build(config: &Configuration, progress: &ProgressBar) -> Result<BuildReport> {
    let book = &config.book;

    progress.set_message(format!("{}: preparing directories...", book.slug));
    for dir in [&config.paths.output_dir, &config.paths.covers_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    progress.set_message(format!("{}: preparing cover...", book.slug));
    let cover = CoverCache::new(&config.paths.covers_dir, &config.cover.extension)
        .provide(&config.cover, book)
        .with_context(|| "Failed to prepare the cover")?;

    progress.set_message(format!("{}: extracting chapters...", book.slug));
    let manuscript = load_manuscript(config)?;
    let figures = manuscript.chapters.iter().map(|c| c.images().count()).sum();

    progress.set_message(format!("{}: assembling...", book.slug));
    let sections = assemble(&manuscript);

    progress.set_message(format!("{}: compiling EPUB...", book.slug));
    let epub = EpubCompiler
        .compile(book, &sections, cover.as_ref())
        .with_context(|| format!("Failed to compile {}", book.slug))?;

    let output = config.output_path();
    std::fs::write(&output, &epub)
        .with_context(|| format!("Failed to write EPUB file: {}", output.display()))?;

    progress.set_message(format!("{}: polishing...", book.slug));
    Polisher::from(config.polish.clone()).polish(&output, &output)?;

    let bytes = std::fs::metadata(&output)
        .with_context(|| format!("Failed to read {}", output.display()))?
        .len();

    Ok(BuildReport {
        slug: book.slug.clone(),
        output,
        chapters: manuscript.chapters.len(),
        figures,
        sections: sections.len(),
        bytes,
    })
}

/// Extract the chapters named by `config` without checking how many there are.
pub fn read_chapters(config: &Configuration) -> Result<Vec<Chapter>> {
    let path = &config.paths.source;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manuscript {}", path.display()))?;
    extract_chapters(&text)
        .with_context(|| format!("Failed to extract chapters from {}", path.display()))
}

/// Extract the chapters, check the count, and attach front matter, back
/// matter and illustrations.
///
/// A manuscript with no chapters at all is an error. A count that differs from
/// `expected_chapters` is only a warning.
pub fn load_manuscript(config: &Configuration) -> Result<Manuscript> {
    let chapters = read_chapters(config)?;
    log::info!(
        "Found {} chapters in {}",
        chapters.len(),
        config.paths.source.display()
    );

    if chapters.is_empty() {
        bail!("No chapters found in {}", config.paths.source.display());
    }
    if let Some(expected) = config.extraction.expected_chapters {
        if expected != chapters.len() {
            log::warn!(
                "Expected {expected} chapters in {} but found {}",
                config.paths.source.display(),
                chapters.len()
            );
        }
    }

    let mut manuscript = Manuscript::new(config.book.clone());
    for chapter in chapters {
        manuscript.add_chapter(chapter);
    }
    manuscript
        .set_epigraph(config.epigraph.clone())
        .set_colophon(config.colophon.clone());
    for entry in &config.timeline {
        manuscript.add_timeline_entry(&entry.date, &entry.event);
    }

    let resolver = ImageResolver::new(&config.paths.images);
    let figures = config.figures.iter().map(|f| {
        (
            f.chapter.clone(),
            Figure {
                image: resolver.resolve(&f.image),
                alt: f.alt.clone(),
                caption: f.caption.clone(),
            },
        )
    });
    let attached = manuscript.attach_figures(figures);
    log::info!("Attached {attached} of {} figures", config.figures.len());

    Ok(manuscript)
}
