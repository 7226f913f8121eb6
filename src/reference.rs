//! Scripture reference scanning.
//!
//! Finds citations like `João 3:16-18, 20; 4:1` in free text, resolves the
//! book name through a [`BookIndex`], and decomposes the chapter clauses into
//! [`ChapterSelector`]s.
//!
//! ## Grammar
//!
//! ```text
//! reference  = book WS+ first (";" WS* next)*
//! first      = DIGITS ( WS* [:.] WS* run )?
//! next       = ( DIGITS WS* [:.] WS* )? DIGIT run
//! run        = ( DIGIT | "," | dash | space )*
//! ```
//!
//! The book alternation is built from the index at scanner construction,
//! longest names first, so that `Jo` never claims the start of `João`.
//!
//! ## Clause Decomposition
//!
//! Clauses are separated by `;`. A clause either starts a new chapter
//! (`14:2,4-6` or a bare `14`) or continues the previous one (`; 18-20`).
//! A continuation with no earlier chapter is dropped. Inside a clause, pieces
//! are separated by `,`; a piece containing a dash is a range, anything else
//! a single verse. Pieces that are not integers are dropped without affecting
//! the rest of the clause.
//!
//! ## Matched Spans
//!
//! The verse run is greedy, so a match can end in punctuation that belongs to
//! the sentence (`"Jo 3:16, e"` matches `"Jo 3:16, "`). Trailing whitespace,
//! dashes, and separators are trimmed back to plain text before the span is
//! used as the reference label.

use crate::books::BookIndex;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Reference pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Dash glyphs accepted as range separators: hyphen-minus, hyphen,
/// non-breaking hyphen, figure dash, en dash, em dash.
const DASHES: [char; 6] = ['-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}'];

/// Regex class body matching [`DASHES`].
const DASH_CLASS: &str = r"\-\x{2010}-\x{2014}";

/// Horizontal whitespace allowed inside the chapter clauses.
const SPACE_CLASS: &str = r" \t\x{A0}";

/// Whether `c` is one of the accepted dash glyphs.
pub fn is_dash(c: char) -> bool {
    DASHES.contains(&c)
}

/// Replace every dash glyph with a plain hyphen.
pub fn normalize_dashes(s: &str) -> Cow<'_, str> {
    if s.chars().any(|c| c != '-' && is_dash(c)) {
        Cow::Owned(s.chars().map(|c| if is_dash(c) { '-' } else { c }).collect())
    } else {
        Cow::Borrowed(s)
    }
}

/// Strip trailing whitespace, dashes, and separators from a matched span.
pub fn trim_reference_tail(s: &str) -> &str {
    s.trim_end_matches(|c: char| {
        c.is_whitespace() || is_dash(c) || matches!(c, ',' | ';' | ':' | '.')
    })
}

// ============================================================================
// Data model
// ============================================================================

/// End of a verse range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RangeEnd {
    Verse(u32),
    /// Runs to the last verse of the chapter.
    EndOfChapter,
}

/// Inclusive verse range, serialized as `[start, end]` (`end = null` for
/// [`RangeEnd::EndOfChapter`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(u32, Option<u32>)", from = "(u32, Option<u32>)")]
pub struct VerseRange {
    pub start: u32,
    pub end: RangeEnd,
}

impl VerseRange {
    /// Range between two verses. Inverted bounds are swapped.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: start.min(end),
            end: RangeEnd::Verse(start.max(end)),
        }
    }

    /// Range from `start` to the end of the chapter.
    pub fn to_end_of_chapter(start: u32) -> Self {
        Self {
            start,
            end: RangeEnd::EndOfChapter,
        }
    }

    /// Last verse covered, given the chapter length.
    pub fn last(&self, chapter_len: u32) -> u32 {
        match self.end {
            RangeEnd::Verse(v) => v,
            RangeEnd::EndOfChapter => chapter_len,
        }
    }

    pub fn contains(&self, verse: u32) -> bool {
        verse >= self.start
            && match self.end {
                RangeEnd::Verse(end) => verse <= end,
                RangeEnd::EndOfChapter => true,
            }
    }
}

impl From<VerseRange> for (u32, Option<u32>) {
    fn from(range: VerseRange) -> Self {
        let end = match range.end {
            RangeEnd::Verse(v) => Some(v),
            RangeEnd::EndOfChapter => None,
        };
        (range.start, end)
    }
}

impl From<(u32, Option<u32>)> for VerseRange {
    fn from((start, end): (u32, Option<u32>)) -> Self {
        match end {
            Some(end) => Self::new(start, end),
            None => Self::to_end_of_chapter(start),
        }
    }
}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            RangeEnd::Verse(end) => write!(f, "{}-{}", self.start, end),
            RangeEnd::EndOfChapter => write!(f, "{}-", self.start),
        }
    }
}

/// Verses selected within one chapter.
///
/// Empty `verses` and `ranges` mean the whole chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSelector {
    pub chapter: u32,
    pub verses: BTreeSet<u32>,
    pub ranges: Vec<VerseRange>,
}

impl ChapterSelector {
    pub fn whole(chapter: u32) -> Self {
        Self {
            chapter,
            verses: BTreeSet::new(),
            ranges: Vec::new(),
        }
    }

    pub fn is_whole_chapter(&self) -> bool {
        self.verses.is_empty() && self.ranges.is_empty()
    }

    /// Lowest selected verse, or `None` for a whole chapter.
    pub fn first_verse(&self) -> Option<u32> {
        let single = self.verses.first().copied();
        let ranged = self.ranges.iter().map(|r| r.start).min();
        match (single, ranged) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn contains(&self, verse: u32) -> bool {
        self.is_whole_chapter()
            || self.verses.contains(&verse)
            || self.ranges.iter().any(|r| r.contains(verse))
    }
}

/// Canonical `chapter:items` notation, items ordered by first verse.
impl fmt::Display for ChapterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chapter)?;
        if self.is_whole_chapter() {
            return Ok(());
        }
        let mut items: Vec<(u32, String)> = self
            .verses
            .iter()
            .map(|v| (*v, v.to_string()))
            .chain(self.ranges.iter().map(|r| (r.start, r.to_string())))
            .collect();
        items.sort_by_key(|(start, _)| *start);
        let items: Vec<String> = items.into_iter().map(|(_, s)| s).collect();
        write!(f, ":{}", items.join(","))
    }
}

/// A resolved citation found in text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Book name as written in the source text.
    pub book: String,
    /// Canonical slug from the [`BookIndex`].
    pub book_slug: String,
    /// One selector per distinct chapter, in citation order.
    pub chapters: Vec<ChapterSelector>,
    /// The matched text with trailing punctuation trimmed.
    pub full_match: String,
    /// Byte offsets of `full_match` in the scanned text.
    pub span: Range<usize>,
}

impl Reference {
    /// Canonical form, e.g. `joao 3:16-18; 4:1`.
    pub fn canonical(&self) -> String {
        let chapters: Vec<String> = self.chapters.iter().map(|c| c.to_string()).collect();
        format!("{} {}", self.book_slug, chapters.join("; "))
    }
}

/// A piece of scanned text: untouched text or a resolved reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'t> {
    Text(&'t str),
    Reference(Reference),
}

impl Segment<'_> {
    /// The source text this segment covers.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Reference(reference) => &reference.full_match,
        }
    }
}

// ============================================================================
// Pattern construction
// ============================================================================

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Build the reference pattern for a set of book names.
///
/// Names are sorted longest first (ties alphabetically, so the pattern is
/// deterministic), escaped, and anchored at a word boundary. Capture group 1
/// is the book name; group 2 is the chapter clauses.
pub fn build_reference_regex<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Result<Regex, regex::Error> {
    let mut names: Vec<&str> = names.into_iter().filter(|n| !n.is_empty()).collect();
    names.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    names.dedup();

    let alternation = if names.is_empty() {
        // Matches nothing.
        "[a&&b]".to_string()
    } else {
        names
            .iter()
            .map(|name| {
                let escaped = regex::escape(name);
                if name.chars().next().is_some_and(is_word_char) {
                    format!(r"\b{escaped}")
                } else {
                    escaped
                }
            })
            .collect::<Vec<_>>()
            .join("|")
    };

    let run = format!("[0-9,{SPACE_CLASS}{DASH_CLASS}]*");
    let sep = format!("[{SPACE_CLASS}]*[:.][{SPACE_CLASS}]*");
    let first = format!("[0-9]+(?:{sep}{run})?");
    let next = format!("[{SPACE_CLASS}]*;[{SPACE_CLASS}]*(?:[0-9]+{sep})?[0-9]{run}");
    Regex::new(&format!(r"(?i:({alternation}))\s+({first}(?:{next})*)"))
}

// ============================================================================
// Clause parsing
// ============================================================================

/// Decompose the chapter clauses that follow a book name.
///
/// `"1:1-3, 10; 14:2,4-6, 11"` yields chapter 1 (range 1-3, verse 10) and
/// chapter 14 (verses 2 and 11, range 4-6).
pub fn parse_chapter_clauses(raw: &str) -> Vec<ChapterSelector> {
    let (chapters, _) = raw.split(';').fold(
        (Vec::<ChapterSelector>::new(), None::<u32>),
        |(mut chapters, last_chapter), part| {
            let part = part.trim();
            if part.is_empty() {
                return (chapters, last_chapter);
            }
            let Some((chapter, verse_spec)) = split_clause(part, last_chapter) else {
                debug!(clause = part, "dropping clause without a chapter");
                return (chapters, last_chapter);
            };
            let idx = match chapters.iter().position(|c| c.chapter == chapter) {
                Some(idx) => idx,
                None => {
                    chapters.push(ChapterSelector::whole(chapter));
                    chapters.len() - 1
                }
            };
            parse_verse_spec(verse_spec, &mut chapters[idx]);
            (chapters, Some(chapter))
        },
    );
    chapters
}

/// Split a trimmed clause into its chapter and verse spec.
///
/// `"14:2,4"` → `(14, "2,4")`; `"14"` → `(14, "")`; `"4-6"` continues
/// `last_chapter`, or yields `None` when there is none.
fn split_clause(part: &str, last_chapter: Option<u32>) -> Option<(u32, &str)> {
    let digits_end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    if digits_end > 0 {
        let rest = part[digits_end..].trim_start();
        let explicit = if rest.is_empty() {
            Some("")
        } else {
            rest.strip_prefix([':', '.']).map(str::trim_start)
        };
        if let Some(verse_spec) = explicit {
            return match part[..digits_end].parse::<u32>() {
                Ok(chapter) if chapter > 0 => Some((chapter, verse_spec)),
                _ => None,
            };
        }
    }
    last_chapter.map(|chapter| (chapter, part))
}

/// Add the comma-separated verses and ranges of `spec` to `selector`.
fn parse_verse_spec(spec: &str, selector: &mut ChapterSelector) {
    for piece in spec.split(',') {
        let piece = normalize_dashes(piece.trim());
        if piece.is_empty() {
            continue;
        }
        if let Some((start, end)) = piece.split_once('-') {
            match (parse_verse(start), parse_verse(end)) {
                (Some(start), Some(end)) => selector.ranges.push(VerseRange::new(start, end)),
                _ => debug!(piece = %piece, "dropping malformed verse range"),
            }
        } else if let Some(verse) = parse_verse(&piece) {
            selector.verses.insert(verse);
        } else {
            debug!(piece = %piece, "dropping malformed verse");
        }
    }
}

fn parse_verse(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

// ============================================================================
// Scanning
// ============================================================================

/// A compiled reference pattern bound to a book index.
///
/// Build once and reuse; the scanner is `Sync` and can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct ReferenceScanner<'a> {
    index: &'a BookIndex,
    pattern: Regex,
}

impl<'a> ReferenceScanner<'a> {
    pub fn new(index: &'a BookIndex) -> Result<Self, ScanError> {
        let pattern = build_reference_regex(index.names())?;
        Ok(Self { index, pattern })
    }

    /// All resolved references in `text`, left to right, non-overlapping.
    pub fn find(&self, text: &str) -> Vec<Reference> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| self.resolve(text, &caps))
            .collect()
    }

    /// Split `text` into plain and reference segments covering it exactly.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for reference in self.find(text) {
            if reference.span.start > cursor {
                segments.push(Segment::Text(&text[cursor..reference.span.start]));
            }
            cursor = reference.span.end;
            segments.push(Segment::Reference(reference));
        }
        if cursor < text.len() {
            segments.push(Segment::Text(&text[cursor..]));
        }
        segments
    }

    fn resolve(&self, text: &str, caps: &Captures<'_>) -> Option<Reference> {
        let whole = caps.get(0)?;
        let book = caps.get(1)?;
        let clauses = caps.get(2)?;

        let Some(slug) = self.index.lookup(book.as_str()) else {
            debug!(book = book.as_str(), "skipping unknown book name");
            return None;
        };

        let end = whole.start() + trim_reference_tail(whole.as_str()).len();
        let chapters = parse_chapter_clauses(&text[clauses.start()..end]);
        if chapters.is_empty() {
            debug!(text = whole.as_str(), "skipping reference without chapters");
            return None;
        }

        Some(Reference {
            book: book.as_str().to_string(),
            book_slug: slug.to_string(),
            chapters,
            full_match: text[whole.start()..end].to_string(),
            span: whole.start()..end,
        })
    }
}

/// Scan `text` for references using a freshly built scanner.
///
/// Prefer [`ReferenceScanner`] when scanning many texts with one index.
pub fn find_references(text: &str, index: &BookIndex) -> Vec<Reference> {
    match ReferenceScanner::new(index) {
        Ok(scanner) => scanner.find(text),
        Err(e) => {
            warn!(error = %e, "could not build reference pattern");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    // =========================================================================
    // parse_chapter_clauses
    // =========================================================================

    #[test]
    fn clauses_split_ranges_verses_and_chapters() {
        let chapters = parse_chapter_clauses("1:1-3, 10; 14:2,4-6, 11");
        assert_eq!(chapters.len(), 2);

        assert_eq!(chapters[0].chapter, 1);
        assert_eq!(chapters[0].ranges, vec![VerseRange::new(1, 3)]);
        assert_eq!(verses(&chapters[0]), vec![10]);

        assert_eq!(chapters[1].chapter, 14);
        assert_eq!(chapters[1].ranges, vec![VerseRange::new(4, 6)]);
        assert_eq!(verses(&chapters[1]), vec![2, 11]);
    }

    #[test]
    fn bare_chapter_is_whole_chapter() {
        let chapters = parse_chapter_clauses("1");
        assert_eq!(chapters, vec![ChapterSelector::whole(1)]);
        assert!(chapters[0].is_whole_chapter());
    }

    #[test]
    fn chapter_with_empty_verse_spec_is_whole_chapter() {
        let chapters = parse_chapter_clauses("3:");
        assert_eq!(chapters, vec![ChapterSelector::whole(3)]);
    }

    #[test]
    fn dot_separator_is_accepted() {
        let chapters = parse_chapter_clauses("3.16");
        assert_eq!(chapters[0].chapter, 3);
        assert_eq!(verses(&chapters[0]), vec![16]);
    }

    #[test]
    fn continuation_clause_inherits_chapter() {
        let chapters = parse_chapter_clauses("3:16; 18-20");
        assert_eq!(chapters.len(), 1);
        assert_eq!(verses(&chapters[0]), vec![16]);
        assert_eq!(chapters[0].ranges, vec![VerseRange::new(18, 20)]);
    }

    #[test]
    fn continuation_without_prior_chapter_is_dropped() {
        let chapters = parse_chapter_clauses("4-6; 2:1");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].chapter, 2);
        assert_eq!(verses(&chapters[0]), vec![1]);
    }

    #[test]
    fn repeated_chapter_merges() {
        let chapters = parse_chapter_clauses("5:1; 6:2; 5:3-4");
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].chapter, 5);
        assert_eq!(verses(&chapters[0]), vec![1]);
        assert_eq!(chapters[0].ranges, vec![VerseRange::new(3, 4)]);
        assert_eq!(chapters[1].chapter, 6);
    }

    #[test]
    fn chapter_order_follows_citation() {
        let chapters = parse_chapter_clauses("9:1; 2:1");
        let numbers: Vec<u32> = chapters.iter().map(|c| c.chapter).collect();
        assert_eq!(numbers, vec![9, 2]);
    }

    #[test]
    fn dash_variants_make_ranges() {
        for raw in ["1:2-5", "1:2\u{2013}5", "1:2\u{2014}5", "1:2 \u{2013} 5"] {
            let chapters = parse_chapter_clauses(raw);
            assert_eq!(chapters[0].ranges, vec![VerseRange::new(2, 5)], "{raw}");
        }
    }

    #[test]
    fn malformed_pieces_are_dropped_individually() {
        let chapters = parse_chapter_clauses("2:1, x, 3-, 5");
        assert_eq!(verses(&chapters[0]), vec![1, 5]);
        assert!(chapters[0].ranges.is_empty());
    }

    #[test]
    fn inverted_range_is_swapped() {
        let chapters = parse_chapter_clauses("2:9-4");
        assert_eq!(chapters[0].ranges, vec![VerseRange::new(4, 9)]);
        assert_eq!(chapters[0].ranges[0].start, 4);
    }

    #[test]
    fn chapter_zero_is_dropped() {
        assert!(parse_chapter_clauses("0:1").is_empty());
    }

    #[test]
    fn empty_clauses_are_skipped() {
        let chapters = parse_chapter_clauses(" ; 3:1 ;; ");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].chapter, 3);
    }

    // =========================================================================
    // Dash handling
    // =========================================================================

    #[test]
    fn normalize_dashes_borrows_when_plain() {
        assert!(matches!(normalize_dashes("1-3"), Cow::Borrowed(_)));
        assert_eq!(normalize_dashes("1\u{2013}3"), "1-3");
        assert_eq!(normalize_dashes("1\u{2014}3\u{2011}4"), "1-3-4");
    }

    #[test]
    fn trim_tail_strips_punctuation() {
        assert_eq!(trim_reference_tail("Jo 3:16, "), "Jo 3:16");
        assert_eq!(trim_reference_tail("Jo 3:16\u{2013} "), "Jo 3:16");
        assert_eq!(trim_reference_tail("Jo 3."), "Jo 3");
        assert_eq!(trim_reference_tail("Jo 3:16"), "Jo 3:16");
    }

    // =========================================================================
    // Display
    // =========================================================================

    #[test]
    fn selector_display_orders_items() {
        let chapters = parse_chapter_clauses("14:11, 4-6, 2");
        assert_eq!(chapters[0].to_string(), "14:2,4-6,11");
        assert_eq!(ChapterSelector::whole(7).to_string(), "7");
        let mut open = ChapterSelector::whole(1);
        open.ranges.push(VerseRange::to_end_of_chapter(3));
        assert_eq!(open.to_string(), "1:3-");
    }

    #[test]
    fn verse_range_serializes_as_pair() {
        let json = serde_json::to_string(&VerseRange::new(4, 6)).unwrap();
        assert_eq!(json, "[4,6]");
        let json = serde_json::to_string(&VerseRange::to_end_of_chapter(4)).unwrap();
        assert_eq!(json, "[4,null]");
        let back: VerseRange = serde_json::from_str("[9,2]").unwrap();
        assert_eq!(back, VerseRange::new(2, 9));
    }

    #[test]
    fn selector_contains() {
        let chapters = parse_chapter_clauses("1:2, 5-7");
        let sel = &chapters[0];
        assert!(sel.contains(2));
        assert!(sel.contains(6));
        assert!(!sel.contains(3));
        assert_eq!(sel.first_verse(), Some(2));
        assert!(ChapterSelector::whole(1).contains(40));
        assert_eq!(ChapterSelector::whole(1).first_verse(), None);
    }

    // =========================================================================
    // Pattern construction
    // =========================================================================

    #[test]
    fn longer_names_are_tried_first() {
        let re = build_reference_regex(["jo", "joão"]).unwrap();
        let caps = re.captures("João 3:16").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "João");
    }

    #[test]
    fn pattern_requires_word_boundary() {
        let re = build_reference_regex(["jo"]).unwrap();
        assert!(re.captures("Rejo 3:16").is_none());
        assert!(re.captures("(Jo 3:16)").is_some());
    }

    #[test]
    fn pattern_escapes_metacharacters() {
        let re = build_reference_regex(["gn.", "c++"]).unwrap();
        assert!(re.is_match("Gn. 1:1"));
        assert!(!re.is_match("Gnx 1:1"));
        assert!(re.is_match("c++ 2"));
    }

    #[test]
    fn pattern_with_no_names_matches_nothing() {
        let re = build_reference_regex(std::iter::empty()).unwrap();
        assert!(!re.is_match("Jo 3:16"));
    }

    #[test]
    fn pattern_chains_semicolon_clauses() {
        let re = build_reference_regex(["jo"]).unwrap();
        let caps = re.captures("ver Jo 3:16; 4:1-2 e mais").unwrap();
        assert_eq!(caps.get(2).unwrap().as_str(), "3:16; 4:1-2 ");
    }

    #[test]
    fn pattern_does_not_cross_lines() {
        let re = build_reference_regex(["jo"]).unwrap();
        let caps = re.captures("Jo 3:16\n2 outros").unwrap();
        assert_eq!(caps.get(2).unwrap().as_str(), "3:16");
    }

    // =========================================================================
    // find_references
    // =========================================================================

    #[test]
    fn finds_reference_in_prose() {
        let index = sample_index();
        let refs = find_references("Como diz João 3:16, Deus amou.", &index);
        assert_eq!(refs.len(), 1);
        let r = &refs[0];
        assert_eq!(r.book, "João");
        assert_eq!(r.book_slug, "joao");
        assert_eq!(r.full_match, "João 3:16");
        assert_eq!(verses(&r.chapters[0]), vec![16]);
    }

    #[test]
    fn alias_and_full_name_resolve_to_same_slug() {
        let index = sample_index();
        let short = find_references("Jo 3:16", &index);
        let long = find_references("João 3:16", &index);
        assert_eq!(short[0].book_slug, "joao");
        assert_eq!(long[0].book_slug, "joao");
        assert_eq!(long[0].book, "João");
        assert_eq!(long[0].full_match, "João 3:16");
    }

    #[test]
    fn matches_are_in_text_order() {
        let index = sample_index();
        let refs = find_references("Gn 1:1 e depois Jo 1:1; também Gênesis 2", &index);
        let slugs: Vec<&str> = refs.iter().map(|r| r.book_slug.as_str()).collect();
        assert_eq!(slugs, vec!["genesis", "joao", "genesis"]);
        assert!(refs.windows(2).all(|w| w[0].span.end <= w[1].span.start));
    }

    #[test]
    fn no_book_names_means_no_references() {
        let index = sample_index();
        assert!(find_references("Nada aqui: 3:16, 4-5.", &index).is_empty());
    }

    #[test]
    fn unknown_book_is_left_alone() {
        let index = BookIndex::from_entries([("Jo", "joao")]);
        let scanner = ReferenceScanner::new(&index).unwrap();
        // Pattern built from a wider list than the index resolves.
        let wider = ReferenceScanner {
            index: &index,
            pattern: build_reference_regex(["jo", "xyz"]).unwrap(),
        };
        assert!(wider.find("Xyz 1:1").is_empty());
        assert_eq!(scanner.find("Jo 1:1").len(), 1);
    }

    #[test]
    fn case_insensitive_book_names() {
        let index = sample_index();
        let refs = find_references("JOÃO 1:1 e gênesis 1", &index);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].book, "JOÃO");
        assert_eq!(refs[1].book_slug, "genesis");
    }

    #[test]
    fn trailing_punctuation_returns_to_text() {
        let index = sample_index();
        let scanner = ReferenceScanner::new(&index).unwrap();
        let text = "Leia Jo 3:16-18, e depois.";
        let segments = scanner.segments(text);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Text("Leia "));
        assert_eq!(segments[1].as_str(), "Jo 3:16-18");
        assert_eq!(segments[2], Segment::Text(", e depois."));
    }

    #[test]
    fn segments_reconstruct_text() {
        let index = sample_index();
        let scanner = ReferenceScanner::new(&index).unwrap();
        let text = "Gn 1:1-3; 2:4, Jo 3:16\u{2013}18 — e 1 Jo 4:8. Fim";
        let rebuilt: String = scanner.segments(text).iter().map(Segment::as_str).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn numbered_book_is_not_shadowed() {
        let index = sample_index();
        let refs = find_references("1 Jo 4:8", &index);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].book_slug, "1-joao");
        assert_eq!(refs[0].full_match, "1 Jo 4:8");
    }

    #[test]
    fn chapter_zero_reference_is_skipped() {
        let index = sample_index();
        assert!(find_references("Jo 0:1", &index).is_empty());
    }

    #[test]
    fn canonical_form() {
        let index = sample_index();
        let refs = find_references("Gn 1:10, 1-3; 2", &index);
        assert_eq!(refs[0].canonical(), "genesis 1:1-3,10; 2");
    }

    #[test]
    fn reference_serializes_camel_case() {
        let index = sample_index();
        let refs = find_references("Jo 3:16", &index);
        let json = serde_json::to_value(&refs[0]).unwrap();
        assert_eq!(json["bookSlug"], "joao");
        assert_eq!(json["fullMatch"], "Jo 3:16");
        assert_eq!(json["chapters"][0]["verses"], serde_json::json!([16]));
    }
}
