use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use verso::books::BookIndex;
use verso::config::{self, SiteConfig};
use verso::passage::{DirChapterSource, load_passage};
use verso::reference::ReferenceScanner;
use verso::timeline::html::{TimelineBar, chronology_bars, positional_bars, render_timeline};
use verso::timeline::{
    PositionalEvent, TimelineEvent, TrackLayout, layout_chronology, layout_positional,
};
use verso::{dataset, generate, output};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "verso")]
#[command(about = "Scripture reference scanning and timeline layout")]
#[command(long_about = "\
Scripture reference scanning and timeline layout

Finds citations like 'Jo 3:16-18; 4:1' in text and markdown, links them to a
Bible reader, and lays out timeline datasets into non-overlapping lanes.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── books.toml                   # Custom book table (optional, see config)
  ├── datasets/
  │   ├── vida-de-jesus.json       # Chronology: year/month events
  │   └── exodo.json               # Positional: startPosition/range events
  └── estudos/
      └── joao.md                  # Markdown with references

Run 'verso gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory (holds config.toml and datasets/)
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the references found in a file
    Refs {
        file: PathBuf,
        /// Print references as JSON
        #[arg(long)]
        json: bool,
        /// Bible text directory (<dir>/<version>/<book>/<chapter>.json)
        #[arg(long)]
        bible: Option<PathBuf>,
    },
    /// Render a markdown file to HTML with linked references
    Render {
        file: PathBuf,
        /// Output file (defaults to the input with an .html extension)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Lay out a timeline dataset (a JSON file or a dataset id)
    Timeline {
        dataset: String,
        /// Dataset holds positional events instead of dated ones
        #[arg(long)]
        positional: bool,
        /// Print the laid-out events as JSON
        #[arg(long)]
        json: bool,
        /// Write a standalone HTML page
        #[arg(long, conflicts_with = "json")]
        html: Option<PathBuf>,
    },
    /// Scan every .md, .mdx and .txt file under a directory
    Check {
        /// Directory to scan (defaults to --source)
        dir: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("verso=debug,info")
    } else {
        EnvFilter::new("verso=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Refs { file, json, bible } => {
            let (site_config, index) = load_site(&cli.source)?;
            let scanner = ReferenceScanner::new(&index)?;
            let text = std::fs::read_to_string(&file)?;
            let references = scanner.find(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&references)?);
            } else if let Some(bible) = bible {
                let source = DirChapterSource::new(bible);
                let version = &site_config.references.version;
                let passages: Vec<_> = references
                    .iter()
                    .map(|reference| match load_passage(&source, version, reference) {
                        Ok(passage) => Some(passage),
                        Err(e) => {
                            warn!(
                                reference = %reference.canonical(),
                                error = %e,
                                "could not load passage"
                            );
                            None
                        }
                    })
                    .collect();
                output::print_references_with_text(&file, &references, &passages);
            } else {
                output::print_references(&file, &references);
            }
        }
        Command::Render { file, output } => {
            let (site_config, index) = load_site(&cli.source)?;
            let scanner = ReferenceScanner::new(&index)?;
            let output = output.unwrap_or_else(|| file.with_extension("html"));
            let count = generate::generate_reference_page(&file, &output, &scanner, &site_config)?;
            println!(
                "{} \u{2192} {} ({} references)",
                file.display(),
                output.display(),
                count
            );
        }
        Command::Timeline {
            dataset,
            positional,
            json,
            html,
        } => {
            let site_config = config::load_config(&cli.source)?;
            run_timeline(&cli.source, &site_config, &dataset, positional, json, html)?;
        }
        Command::Check { dir } => {
            let (site_config, index) = load_site(&cli.source)?;
            let scanner = ReferenceScanner::new(&index)?;
            let dir = dir.unwrap_or_else(|| cli.source.clone());
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", dir.display());
            let results = check_dir(&dir, &scanner)?;
            output::print_check(&results);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Site config plus the book index it names.
fn load_site(source: &Path) -> Result<(SiteConfig, BookIndex), Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    let index = BookIndex::from_config(&site_config.references, source)?;
    debug!(names = index.len(), "loaded book index");
    Ok((site_config, index))
}

/// Read events from an explicit file (strict) or a dataset id (degrading).
fn read_dataset<T: serde::de::DeserializeOwned>(
    source: &Path,
    name: &str,
) -> Result<Vec<T>, dataset::DatasetError> {
    let path = Path::new(name);
    if path.is_file() {
        dataset::read_events(path)
    } else {
        Ok(dataset::load_dataset(&source.join("datasets"), name))
    }
}

fn dataset_title(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().replace('-', " "))
        .unwrap_or_else(|| name.to_string())
}

fn run_timeline(
    source: &Path,
    site_config: &SiteConfig,
    name: &str,
    positional: bool,
    json: bool,
    html: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let title = dataset_title(name);
    let timeline_config = &site_config.timeline;

    if positional {
        let mut events: Vec<PositionalEvent> = read_dataset(source, name)?;
        let (extents, layout) = layout_positional(&events, timeline_config);
        if json {
            for (event, track) in events.iter_mut().zip(&layout.tracks) {
                event.track = Some(*track);
            }
            print_layout_json(&events, layout.track_count)?;
            return Ok(());
        }
        let bars = positional_bars(&events, &extents);
        emit_timeline(&title, &bars, &layout, html, site_config)?;
    } else {
        let mut events: Vec<TimelineEvent> = read_dataset(source, name)?;
        let layout = layout_chronology(&events, timeline_config);
        if json {
            for (event, track) in events.iter_mut().zip(&layout.tracks) {
                event.track = Some(*track);
            }
            print_layout_json(&events, layout.track_count)?;
            return Ok(());
        }
        let bars = chronology_bars(&events, &timeline_config.months);
        emit_timeline(&title, &bars, &layout, html, site_config)?;
    }
    Ok(())
}

/// Write the timeline page when `html` is given, else print the layout.
fn emit_timeline(
    title: &str,
    bars: &[TimelineBar<'_>],
    layout: &TrackLayout,
    html: Option<PathBuf>,
    site_config: &SiteConfig,
) -> Result<(), generate::GenerateError> {
    match html {
        Some(path) => {
            let markup = render_timeline(bars, layout, &site_config.timeline);
            generate::generate_timeline_page(title, markup, &path, site_config)?;
            println!("{} \u{2192} {}", title, path.display());
        }
        None => output::print_layout(title, bars, layout),
    }
    Ok(())
}

fn print_layout_json<T: serde::Serialize>(
    events: &[T],
    track_count: usize,
) -> Result<(), serde_json::Error> {
    let value = serde_json::json!({
        "trackCount": track_count,
        "events": events,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Count references in every text file under `dir`, in parallel.
fn check_dir(
    dir: &Path,
    scanner: &ReferenceScanner<'_>,
) -> Result<Vec<(PathBuf, usize)>, std::io::Error> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e, "md" | "mdx" | "txt"))
        })
        .collect();
    files.sort();

    files
        .into_par_iter()
        .map(|path| {
            let text = std::fs::read_to_string(&path)?;
            let count = scanner.find(&text).len();
            Ok((path, count))
        })
        .collect()
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
