//! Compiles HistorIQly narrative history manuscripts into EPUB e-books.
//!
//! A book is described by a TOML [`config::Configuration`]. Its chapters are
//! scanned out of a hand-authored manuscript, illustrated from a local image
//! directory, assembled with a title page, epigraph, timeline and colophon,
//! compiled to EPUB and handed to an external polishing tool.

pub mod command;
pub mod config;
pub mod cover;
pub mod pipeline;
pub mod polish;
pub mod sinks;
pub mod source;
