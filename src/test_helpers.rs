//! Shared test utilities for the verso test suite.
//!
//! Provides a small book index, selector extractors, and event builders so
//! tests state only the fields they care about.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let index = sample_index();
//! let refs = find_references("Jo 3:16", &index);
//! assert_eq!(verses(&refs[0].chapters[0]), vec![16]);
//!
//! let events = vec![
//!     range_event("A", (0, None), (10, None)),
//!     point_event("B", 5, Some("março")),
//! ];
//! ```

use crate::books::BookIndex;
use crate::reference::ChapterSelector;
use crate::timeline::{PositionalEvent, TimelineEvent};

// =========================================================================
// Book index
// =========================================================================

/// Three books: João (alias Jo), Gênesis (alias Gn) and 1 João (alias 1 Jo).
///
/// "Jo" is deliberately a prefix of "João" and a suffix of "1 Jo" so tests
/// exercise longest-name-first matching.
pub fn sample_index() -> BookIndex {
    BookIndex::from_entries([
        ("João", "joao"),
        ("Jo", "joao"),
        ("Gênesis", "genesis"),
        ("Gn", "genesis"),
        ("1 João", "1-joao"),
        ("1 Jo", "1-joao"),
    ])
}

// =========================================================================
// Selector extractors
// =========================================================================

/// Single verses of a selector, ascending.
pub fn verses(selector: &ChapterSelector) -> Vec<u32> {
    selector.verses.iter().copied().collect()
}

// =========================================================================
// Event builders
// =========================================================================

/// A chronology event at one date.
pub fn point_event(name: &str, year: i32, month: Option<&str>) -> TimelineEvent {
    TimelineEvent {
        year: Some(year),
        month: month.map(str::to_string),
        event: name.to_string(),
        ..TimelineEvent::default()
    }
}

/// A chronology event spanning two dates.
pub fn range_event(
    name: &str,
    (year_start, month_start): (i32, Option<&str>),
    (year_end, month_end): (i32, Option<&str>),
) -> TimelineEvent {
    TimelineEvent {
        year_start: Some(year_start),
        month_start: month_start.map(str::to_string),
        year_end: Some(year_end),
        month_end: month_end.map(str::to_string),
        event: name.to_string(),
        ..TimelineEvent::default()
    }
}

/// A positional event with optional start and range.
pub fn positional(title: &str, start: Option<f64>, range: Option<f64>) -> PositionalEvent {
    PositionalEvent {
        title: title.to_string(),
        start_position: start,
        range,
        ..PositionalEvent::default()
    }
}
