use anyhow::{bail, Context, Result};
use byte_unit::{Byte, UnitType};
use cli::Cli;
use historiqly_books::config::Configuration;
use historiqly_books::pipeline;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Build { configs } => {
            for path in configs {
                build(path)?;
            }
            Ok(())
        }
        cli::Commands::Chapters { config, json } => chapters(config, *json),
        cli::Commands::New { slug } => new(slug),
    }
}

fn build(path: &Path) -> Result<()> {
    println!("Loading configuration {}...", path.display());
    let config = Configuration::load(path)?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("can parse progress style"),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = pipeline::build(&config, &progress);
    progress.finish_and_clear();
    let report = report.with_context(|| format!("Failed to build {}", config.book.slug))?;

    let size = Byte::from_u64(report.bytes).get_appropriate_unit(UnitType::Binary);
    println!("{}", console::style(&config.book).bold());
    println!("  Chapters:  {}", report.chapters);
    println!("  Figures:   {}", report.figures);
    println!("  Sections:  {}", report.sections);
    println!("  EPUB:      {} ({size:.1})", report.output.display());
    Ok(())
}

#[derive(Serialize)]
struct ChapterListing<'a> {
    number: &'a str,
    title: &'a str,
    body_chars: usize,
}

fn chapters(path: &Path, json: bool) -> Result<()> {
    let config = Configuration::load(path)?;
    let chapters = pipeline::read_chapters(&config)?;

    let listing: Vec<_> = chapters
        .iter()
        .map(|c| ChapterListing {
            number: &c.number,
            title: &c.title,
            body_chars: c.body.chars().count(),
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&listing)
            .with_context(|| "Failed to serialize chapter listing")?;
        println!("{out}");
        return Ok(());
    }

    for chapter in &listing {
        println!(
            "{:>10}  {}  ({} chars)",
            chapter.number, chapter.title, chapter.body_chars
        );
    }
    println!("{} chapters", listing.len());
    if let Some(expected) = config.extraction.expected_chapters {
        if expected != listing.len() {
            println!(
                "{}: expected {expected}",
                console::style("Warning").yellow()
            );
        }
    }
    Ok(())
}

fn new(slug: &str) -> Result<()> {
    let path = PathBuf::from(format!("{slug}.toml"));
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let contents = toml::to_string(&Configuration::starter(slug))
        .with_context(|| "Failed to serialize starter configuration")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
