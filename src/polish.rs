//! Post-processing of the written EPUB.
//!
//! Polishing (structure fixes, cover page insertion, image recompression) is
//! done by an external tool that takes an input path and an output path. The
//! two may be the same file, in which case the tool rewrites it in place.

use crate::command::ExternalCommand;
use anyhow::{Context, Result};
use std::path::Path;

pub trait Polish {
    fn polish(&self, input: &Path, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub enum Polisher {
    /// No polishing configured; a separate output path gets a plain copy
    Skip,
    Command(ExternalCommand),
}

impl From<Option<ExternalCommand>> for Polisher {
    fn from(command: Option<ExternalCommand>) -> Self {
        match command {
            Some(c) => Polisher::Command(c),
            None => Polisher::Skip,
        }
    }
}

impl Polish for Polisher {
    fn polish(&self, input: &Path, output: &Path) -> Result<()> {
        match self {
            Polisher::Skip => {
                if input != output {
                    std::fs::copy(input, output).with_context(|| {
                        format!("Failed to copy {} to {}", input.display(), output.display())
                    })?;
                }
                Ok(())
            }
            Polisher::Command(command) => {
                let input = input.to_string_lossy();
                let output = output.to_string_lossy();
                command
                    .run(&[("input", &*input), ("output", &*output)])
                    .with_context(|| format!("Failed to polish {input}"))
            }
        }
    }
}
