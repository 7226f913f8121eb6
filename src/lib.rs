//! # Verso
//!
//! Scripture reference scanning and timeline lane layout for static content
//! sites. Two independent engines share one configuration:
//!
//! ```text
//! text / markdown ──> reference scanner ──> linked HTML, passages, reports
//! timeline dataset ──> lane assignment  ──> positioned bars, reports
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`books`] | Book name → slug table; built-in pt-BR table or a TOML file |
//! | [`reference`] | Pattern construction, clause parsing and the reference scanner |
//! | [`linker`] | Markdown walker that turns references into anchors |
//! | [`passage`] | Verse selection against chapter text on disk |
//! | [`timeline`] | Greedy lane assignment, chronology and positional datasets, markup |
//! | [`dataset`] | JSON dataset loading, strict and degrading |
//! | [`generate`] | Full HTML pages around linked markdown and timelines using Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Types shared by datasets and pages (`SourceRef`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Data-Driven Book Pattern
//!
//! The reference pattern is built at startup from whatever book table is
//! loaded, so adding a language or an abbreviation is a data change. Names
//! are tried longest first: `1 João` must win over `João`, and `João` over
//! `Jo`. Book names are matched case-insensitively and anchored at a word
//! boundary so `Jo` never fires inside `Joana`.
//!
//! ## Total Scanning
//!
//! Scanning never fails. Unknown names, malformed clauses and zero chapters
//! are dropped and the surrounding text is left exactly as written. The
//! scanner exposes [`reference::ReferenceScanner::segments`], which covers
//! the input byte for byte, so a renderer can only ever add markup.
//!
//! ## Input-Order Lane Assignment
//!
//! Timeline lanes are assigned first-fit in the order events are authored.
//! Authors control stacking by ordering their dataset; an explicit `track`
//! on an event pins it. A margin proportional to the total span keeps bars
//! on one lane from touching at any zoom.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a build error and every interpolation is escaped. The one pre-escaped
//! input is the HTML pulldown-cmark produces for page bodies.

pub mod books;
pub mod config;
pub mod dataset;
pub mod generate;
pub mod linker;
pub mod output;
pub mod passage;
pub mod reference;
pub mod timeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
