//! EPUB compilation.
//!
//! Uses the `epub-builder` crate, which handles the EPUB packaging
//! requirements (OPF manifest, NCX navigation, ZIP structure with the proper
//! MIME type). Each assembled section becomes its own XHTML document, in
//! order, and each image the sections refer to is embedded once.

use super::rendering::{Section, SectionKind};
use super::styles::{STYLESHEET, STYLESHEET_HREF};
use crate::cover::CoverImage;
use crate::source::{Book, ImageRef};
use anyhow::{bail, Context, Result};
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, ZipLibrary};
use std::collections::BTreeMap;

/// Value of the EPUB `generator` metadata.
const GENERATOR: &str = concat!("historiqly-books v", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, Default)]
pub struct EpubCompiler;

impl EpubCompiler {
    /// Compile the sections into an EPUB, returning the file contents.
    pub fn compile(
        &self,
        book: &Book,
        sections: &[Section],
        cover: Option<&CoverImage>,
    ) -> Result<Vec<u8>> {
        let zip = ZipLibrary::new()
            .map_err(anyhow::Error::msg)
            .with_context(|| "Failed to create ZIP library for EPUB")?;
        let mut builder = EpubBuilder::new(zip)
            .map_err(anyhow::Error::msg)
            .with_context(|| "Failed to build builder")?;

        builder
            .metadata("title", book.full_title())
            .map_err(anyhow::Error::msg)
            .with_context(|| "Failed to set title metadata")?;
        builder
            .metadata("author", &book.author)
            .map_err(anyhow::Error::msg)
            .with_context(|| {
                format!("Failed to add author metadata for author: {}", book.author)
            })?;
        builder
            .metadata("lang", &book.language)
            .map_err(anyhow::Error::msg)
            .with_context(|| "Failed to set language metadata")?;
        builder
            .metadata("generator", GENERATOR)
            .map_err(anyhow::Error::msg)
            .with_context(|| "Failed to set generator metadata")?;
        if !book.description.is_empty() {
            builder
                .metadata("description", &book.description)
                .map_err(anyhow::Error::msg)
                .with_context(|| "Failed to set description metadata")?;
        }
        if !book.series.is_empty() {
            builder
                .metadata("subject", &book.series)
                .map_err(anyhow::Error::msg)
                .with_context(|| "Failed to set subject (series) metadata")?;
        }

        builder
            .stylesheet(STYLESHEET.as_bytes())
            .map_err(anyhow::Error::msg)
            .with_context(|| "Failed to add stylesheet")?;

        if let Some(cover) = cover {
            builder
                .add_cover_image(&cover.file_name, cover.data.as_slice(), cover.media_type)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Failed to add cover image: {}", cover.file_name))?;
        }

        let mut embedded: BTreeMap<&str, &ImageRef> = BTreeMap::new();
        for image in sections.iter().flat_map(|s| s.images.iter()) {
            if let Some(previous) = embedded.get(image.href.as_str()) {
                if previous.data != image.data {
                    bail!(
                        "Images {} and {} would both be stored as {}",
                        previous.path.display(),
                        image.path.display(),
                        image.href
                    );
                }
                continue;
            }
            embedded.insert(image.href.as_str(), image);
            builder
                .add_resource(&image.href, image.data.as_slice(), image.media_type)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Failed to embed image: {}", image.path.display()))?;
        }

        let mut seen_first_chapter = false;
        for section in sections {
            let reftype = match section.kind {
                SectionKind::TitlePage => Some(ReferenceType::TitlePage),
                SectionKind::Epigraph => Some(ReferenceType::Epigraph),
                SectionKind::Chapter if !seen_first_chapter => {
                    seen_first_chapter = true;
                    Some(ReferenceType::Text)
                }
                SectionKind::Colophon => Some(ReferenceType::Colophon),
                SectionKind::Chapter | SectionKind::Timeline => None,
            };

            let document = xhtml_document(book, section);
            let mut content =
                EpubContent::new(&section.file_name, document.as_bytes()).title(&section.title);
            if let Some(reftype) = reftype {
                content = content.reftype(reftype);
            }
            builder
                .add_content(content)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Failed to add section to EPUB: {}", section.title))?;
        }

        let mut out = Vec::new();
        builder
            .generate(&mut out)
            .map_err(anyhow::Error::msg)
            .with_context(|| "Failed to generate EPUB file")?;
        Ok(out)
    }
}

/// Wrap a section's body fragment into a standalone XHTML document.
fn xhtml_document(book: &Book, section: &Section) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="{stylesheet}"/>
</head>
<body>
{body}
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(&book.language),
        title = html_escape::encode_text(&section.title),
        stylesheet = STYLESHEET_HREF,
        body = section.content,
    )
}
