use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Builds the EPUB for each book config, in order, stopping at the first failure
    Build {
        /// Book config files
        #[clap(required = true)]
        configs: Vec<PathBuf>,
    },
    /// Lists the chapters extracted from a book's manuscript
    Chapters {
        config: PathBuf,
        /// Print the listing as JSON
        #[clap(long)]
        json: bool,
    },
    /// Writes a starter config file for a new book
    New {
        /// Slug of the new book; the config is written to <SLUG>.toml
        slug: String,
    },
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
