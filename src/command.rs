//! External programs the build hands work off to (cover art, polishing).
//!
//! Arguments may contain `{name}` placeholders that are filled in just before
//! the program runs.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new<P: ToString>(program: P, args: &[&str]) -> ExternalCommand {
        ExternalCommand {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Arguments with every `{name}` placeholder replaced.
    ///
    /// Substituted values are inserted as-is and never expanded again.
    pub fn expand_args(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.args.iter().map(|arg| expand(arg, vars)).collect()
    }

    /// The program and its expanded arguments, for messages and cache keys.
    pub fn command_line(&self, vars: &[(&str, &str)]) -> String {
        std::iter::once(self.program.clone())
            .chain(self.expand_args(vars))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion. A non-zero exit status is an error.
    pub fn run(&self, vars: &[(&str, &str)]) -> Result<()> {
        let args = self.expand_args(vars);
        log::debug!("Running {}", self.command_line(vars));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .with_context(|| format!("Failed to start `{}`", self.program))?;

        if !status.success() {
            bail!("`{}` failed with {status}", self.command_line(vars));
        }
        Ok(())
    }
}

/// Expand the `{name}` placeholders in `arg` in a single left-to-right pass.
/// Braces that don't enclose a known name are kept.
fn expand(arg: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn placeholders_get_expanded() {
        let command = ExternalCommand::new(
            "node",
            &["polish.mjs", "{input}", "--out={output}", "{input}"],
        );
        let args = command.expand_args(&[("input", "a.epub"), ("output", "b.epub")]);
        assert_eq!(args, vec!["polish.mjs", "a.epub", "--out=b.epub", "a.epub"]);
        assert_eq!(
            command.command_line(&[("input", "a.epub"), ("output", "b.epub")]),
            "node polish.mjs a.epub --out=b.epub a.epub"
        );
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        let command = ExternalCommand::new("echo", &["{nope}"]);
        assert_eq!(command.expand_args(&[("input", "x")]), vec!["{nope}"]);
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let command = ExternalCommand::new("gen", &["{title}", "{author}: {title}"]);
        let args = command.expand_args(&[("title", "Who Wrote {author}?"), ("author", "Jane")]);
        assert_eq!(
            args,
            vec!["Who Wrote {author}?", "Jane: Who Wrote {author}?"]
        );
    }

    #[test]
    fn stray_braces_are_kept() {
        let command = ExternalCommand::new("echo", &["{{title}}", "{", "}{title", "a{b}c"]);
        let args = command.expand_args(&[("title", "T")]);
        assert_eq!(args, vec!["{T}", "{", "}{title", "a{b}c"]);
    }

    #[cfg(unix)]
    #[test]
    fn failing_programs_are_errors() {
        let command = ExternalCommand::new("sh", &["-c", "exit 3"]);
        let err = command.run(&[]).unwrap_err();
        assert!(format!("{err:#}").contains("sh -c exit 3"));
        ExternalCommand::new("true", &[])
            .run(&[])
            .expect("true succeeds");
    }

    #[test]
    fn missing_programs_are_errors() {
        let command = ExternalCommand::new("definitely-not-a-real-program-4821", &[]);
        assert!(command.run(&[]).is_err());
    }
}
