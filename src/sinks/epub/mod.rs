//! EPUB generation for HistorIQly books.
//!
//! This module turns a `Manuscript` into an EPUB ebook with:
//! - A title page and an epigraph
//! - One document per chapter, with its illustrations
//! - A timeline appendix
//! - An "About This Book" colophon with sources and links to the series
//!
//! Every book shares the same stylesheet.

mod compiler;
pub mod rendering;
pub mod styles;

pub use compiler::EpubCompiler;
pub use rendering::{assemble, figure, Section, SectionKind};
