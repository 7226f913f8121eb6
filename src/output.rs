//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what was found, not where it came from: each entity is
//! a positional index and its text, with detail as indented context lines.
//!
//! # Output Format
//!
//! ## refs
//!
//! ```text
//! estudo.md (2 references)
//! 001 Jo 3:16-18
//!     Canonical: joao 3:16-18
//! 002 Gn 1
//!     Canonical: genesis 1
//! ```
//!
//! With `--bible`, each reference is followed by its verse text:
//!
//! ```text
//! 001 Jo 3:16
//!     Canonical: joao 3:16
//!     3:16 Porque Deus amou o mundo de tal maneira...
//! ```
//!
//! ## timeline
//!
//! ```text
//! Vida de Jesus (3 events, 2 tracks)
//! 001 Nascimento
//!     Track 0: -5 → -5
//! 002 Ministério
//!     Track 1: 27.75 → 30.25
//! ```
//!
//! ## check
//!
//! ```text
//! 003 content/estudos/joao.md: 12 references
//! Scanned 3 files, 17 references
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::passage::Passage;
use crate::reference::Reference;
use crate::timeline::html::{TimelineBar, format_axis};
use crate::timeline::TrackLayout;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

// ============================================================================
// refs
// ============================================================================

/// Format the references found in one file.
pub fn format_references(path: &Path, references: &[Reference]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        path.display(),
        plural(references.len(), "reference")
    )];
    for (i, reference) in references.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), reference.full_match));
        lines.push(format!("{}Canonical: {}", indent(1), reference.canonical()));
    }
    lines
}

/// Format references with the verse text loaded for each.
///
/// `passages` is parallel to `references`; `None` marks a reference whose
/// text could not be loaded.
pub fn format_references_with_text(
    path: &Path,
    references: &[Reference],
    passages: &[Option<Passage>],
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        path.display(),
        plural(references.len(), "reference")
    )];
    for (i, reference) in references.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), reference.full_match));
        lines.push(format!("{}Canonical: {}", indent(1), reference.canonical()));
        match passages.get(i).and_then(Option::as_ref) {
            Some(passage) => lines.extend(format_passage(passage)),
            None => lines.push(format!("{}(text unavailable)", indent(1))),
        }
    }
    lines
}

/// One indented line per verse, `chapter:verse text`.
pub fn format_passage(passage: &Passage) -> Vec<String> {
    if passage.chapters.is_empty() {
        return vec![format!("{}(text unavailable)", indent(1))];
    }
    passage
        .chapters
        .iter()
        .flat_map(|chapter| {
            chapter.verses.iter().map(move |verse| {
                format!(
                    "{}{}:{} {}",
                    indent(1),
                    chapter.chapter,
                    verse.number,
                    verse.text
                )
            })
        })
        .collect()
}

/// Print the references found in one file to stdout.
pub fn print_references(path: &Path, references: &[Reference]) {
    for line in format_references(path, references) {
        println!("{}", line);
    }
}

pub fn print_references_with_text(
    path: &Path,
    references: &[Reference],
    passages: &[Option<Passage>],
) {
    for line in format_references_with_text(path, references, passages) {
        println!("{}", line);
    }
}

// ============================================================================
// timeline
// ============================================================================

/// Format a laid-out timeline: one entry per event with its lane and extent.
pub fn format_layout(title: &str, bars: &[TimelineBar<'_>], layout: &TrackLayout) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}, {})",
        title,
        plural(bars.len(), "event"),
        plural(layout.track_count, "track")
    )];
    for (i, bar) in bars.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), bar.label));
        let track = layout
            .track_of(i)
            .map_or_else(|| "?".to_string(), |t| t.to_string());
        lines.push(format!(
            "{}Track {}: {} \u{2192} {}",
            indent(1),
            track,
            format_axis(bar.extent.start),
            format_axis(bar.extent.end)
        ));
        if !bar.description.is_empty() {
            lines.push(format!("{}{}", indent(1), truncate_desc(bar.description, 60)));
        }
        for (label, at) in &bar.pins {
            lines.push(format!("{}Pin {} at {}", indent(1), label, format_axis(*at)));
        }
    }
    lines
}

pub fn print_layout(title: &str, bars: &[TimelineBar<'_>], layout: &TrackLayout) {
    for line in format_layout(title, bars, layout) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format per-file reference counts and a summary line.
pub fn format_check(results: &[(PathBuf, usize)]) -> Vec<String> {
    let mut lines: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, (path, count))| {
            format!(
                "{} {}: {}",
                format_index(i + 1),
                path.display(),
                plural(*count, "reference")
            )
        })
        .collect();
    let total: usize = results.iter().map(|(_, count)| count).sum();
    lines.push(format!(
        "Scanned {}, {}",
        plural(results.len(), "file"),
        plural(total, "reference")
    ));
    lines
}

pub fn print_check(results: &[(PathBuf, usize)]) {
    for line in format_check(results) {
        println!("{}", line);
    }
}
