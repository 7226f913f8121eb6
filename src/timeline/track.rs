//! Greedy lane assignment for overlapping intervals.
//!
//! Events are visited in input order and each one takes the lowest lane where
//! it does not overlap any earlier event already on that lane. Two bars closer
//! than the visual margin count as overlapping, so bars on the same lane never
//! touch.
//!
//! Input order is the iteration key. Sorting by start first would give a
//! different (sometimes tighter) packing and different lane numbers for
//! ties, and callers rely on the order they pass in.

use serde::Serialize;
use tracing::debug;

/// Default margin, as a share of the total span.
pub const DEFAULT_MARGIN_RATIO: f64 = 0.02;

/// Closed interval on the layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub start: f64,
    pub end: f64,
}

impl Extent {
    /// Inverted bounds are swapped.
    pub fn new(start: f64, end: f64) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    pub fn point(at: f64) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// Overlap test with a margin: intervals less than `margin` apart overlap.
    pub fn overlaps(&self, other: &Extent, margin: f64) -> bool {
        !(self.end + margin < other.start || other.end + margin < self.start)
    }
}

/// Lane per event (parallel to the input) and the number of lanes used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackLayout {
    pub tracks: Vec<usize>,
    pub track_count: usize,
}

impl TrackLayout {
    pub fn track_of(&self, index: usize) -> Option<usize> {
        self.tracks.get(index).copied()
    }
}

/// Span covered by all extents, or 1 when empty or degenerate.
pub fn total_span(extents: &[Extent]) -> f64 {
    let min = extents.iter().map(|e| e.start).fold(f64::INFINITY, f64::min);
    let max = extents
        .iter()
        .map(|e| e.end)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span.is_finite() && span > 0.0 {
        span
    } else {
        1.0
    }
}

/// Margin for a set of extents: `total_span * ratio`.
pub fn visual_margin(extents: &[Extent], ratio: f64) -> f64 {
    total_span(extents) * ratio
}

/// Assign lanes with the default margin and no overrides.
pub fn assign_tracks<E>(events: &[E], extent_of: impl Fn(&E) -> Extent) -> TrackLayout {
    assign_tracks_with(events, extent_of, |_| None, DEFAULT_MARGIN_RATIO)
}

/// Assign lanes, honoring explicit per-event lane overrides.
///
/// An overridden event goes on its lane unconditionally and occupies it for
/// every later event. Overrides past the last possible lane (`events.len()`
/// lanes at most) are ignored and the event is placed first-fit.
pub fn assign_tracks_with<E>(
    events: &[E],
    extent_of: impl Fn(&E) -> Extent,
    override_of: impl Fn(&E) -> Option<usize>,
    margin_ratio: f64,
) -> TrackLayout {
    let extents: Vec<Extent> = events.iter().map(&extent_of).collect();
    let margin = visual_margin(&extents, margin_ratio);

    let mut tracks: Vec<usize> = Vec::with_capacity(events.len());
    for (i, event) in events.iter().enumerate() {
        let track = match override_of(event) {
            Some(t) if t < events.len() => t,
            other => {
                if let Some(t) = other {
                    debug!(event = i, track = t, "ignoring out-of-range track override");
                }
                first_free_track(&extents[i], &extents[..i], &tracks, margin)
            }
        };
        tracks.push(track);
    }

    let track_count = tracks.iter().max().map_or(0, |t| t.saturating_add(1));
    TrackLayout {
        tracks,
        track_count,
    }
}

/// Lowest lane with no earlier event overlapping `extent`.
fn first_free_track(
    extent: &Extent,
    earlier: &[Extent],
    assigned: &[usize],
    margin: f64,
) -> usize {
    let conflicts = |track: usize| {
        earlier
            .iter()
            .zip(assigned)
            .any(|(other, &t)| t == track && extent.overlaps(other, margin))
    };
    // Some lane in 0..=n is free because at most n lanes are occupied.
    let max_used = assigned.iter().max().map_or(0, |t| t.saturating_add(1));
    (0..=max_used)
        .find(|&track| !conflicts(track))
        .unwrap_or(max_used)
}
