//! Verse text for resolved references.
//!
//! Chapter text is supplied by a [`ChapterSource`]. The bundled
//! [`DirChapterSource`] reads one JSON array of verse strings per chapter:
//!
//! ```text
//! bible/
//! └── ara/
//!     └── joao/
//!         ├── 1.json
//!         └── 3.json      ["No princípio era o Verbo...", ...]
//! ```
//!
//! Selection never fails: verses past the end of the chapter are clipped and
//! a missing chapter yields `None` rather than an error.

use crate::reference::{ChapterSelector, Reference};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PassageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supplier of chapter text, verse 1 at index 0.
pub trait ChapterSource {
    /// `Ok(None)` when the version, book or chapter does not exist.
    fn chapter(
        &self,
        version: &str,
        book_slug: &str,
        chapter: u32,
    ) -> Result<Option<Vec<String>>, PassageError>;
}

/// Reads `<root>/<version>/<book>/<chapter>.json`.
#[derive(Debug, Clone)]
pub struct DirChapterSource {
    root: PathBuf,
}

impl DirChapterSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn chapter_path(&self, version: &str, book_slug: &str, chapter: u32) -> PathBuf {
        self.root
            .join(version)
            .join(book_slug)
            .join(format!("{chapter}.json"))
    }
}

impl ChapterSource for DirChapterSource {
    fn chapter(
        &self,
        version: &str,
        book_slug: &str,
        chapter: u32,
    ) -> Result<Option<Vec<String>>, PassageError> {
        let path = self.chapter_path(version, book_slug, chapter);
        if !path.is_file() {
            debug!(path = %path.display(), "chapter not found");
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassageVerse {
    pub number: u32,
    pub text: String,
}

/// Verses of one chapter selected by a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassageChapter {
    pub chapter: u32,
    pub verses: Vec<PassageVerse>,
}

/// Text of a whole reference; chapters the source lacks are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    pub version: String,
    pub book_slug: String,
    pub chapters: Vec<PassageChapter>,
}

/// Pick the verses a selector names out of a chapter's text.
///
/// An empty selector takes the whole chapter. Otherwise single verses and
/// ranges are merged, sorted, deduplicated and clipped to the chapter.
pub fn select_verses(chapter: &[String], selector: &ChapterSelector) -> Vec<PassageVerse> {
    let len = u32::try_from(chapter.len()).unwrap_or(u32::MAX);
    let numbers: BTreeSet<u32> = if selector.is_whole_chapter() {
        (1..=len).collect()
    } else {
        selector
            .verses
            .iter()
            .copied()
            .chain(
                selector
                    .ranges
                    .iter()
                    .flat_map(|r| r.start..=r.last(len).min(len)),
            )
            .filter(|&n| (1..=len).contains(&n))
            .collect()
    };
    numbers
        .into_iter()
        .map(|number| PassageVerse {
            number,
            text: chapter[(number - 1) as usize].clone(),
        })
        .collect()
}

/// Load the text of every chapter in `reference`.
pub fn load_passage(
    source: &impl ChapterSource,
    version: &str,
    reference: &Reference,
) -> Result<Passage, PassageError> {
    let mut chapters = Vec::with_capacity(reference.chapters.len());
    for selector in &reference.chapters {
        let Some(text) = source.chapter(version, &reference.book_slug, selector.chapter)? else {
            continue;
        };
        chapters.push(PassageChapter {
            chapter: selector.chapter,
            verses: select_verses(&text, selector),
        });
    }
    Ok(Passage {
        version: version.to_string(),
        book_slug: reference.book_slug.clone(),
        chapters,
    })
}
