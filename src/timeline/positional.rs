//! Positional timelines: events placed on a relative axis.
//!
//! Each event covers `[startPosition, startPosition + range]`. Events without
//! a `startPosition` are laid end to end: the default start is the sum of the
//! ranges of all events before it in the list, so a list with no positions
//! reads as a sequence.

use super::track::{Extent, TrackLayout, assign_tracks_with};
use crate::config::TimelineConfig;
use serde::{Deserialize, Serialize};

/// A labelled marker inside an event, `position` units after its start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub label: String,
    pub position: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionalEvent {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pins: Vec<Pin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<usize>,
}

/// Extents for every event, computed once for the whole list.
pub fn resolve_extents(events: &[PositionalEvent], default_range: f64) -> Vec<Extent> {
    let mut offset = 0.0;
    events
        .iter()
        .map(|event| {
            let range = event.range.unwrap_or(default_range);
            let start = event.start_position.unwrap_or(offset);
            offset += range;
            Extent::new(start, start + range)
        })
        .collect()
}

/// Absolute pin positions, clamped to the event's extent.
pub fn pin_positions<'a>(event: &'a PositionalEvent, extent: &Extent) -> Vec<(&'a str, f64)> {
    event
        .pins
        .iter()
        .map(|pin| {
            let at = (extent.start + pin.position).clamp(extent.start, extent.end);
            (pin.label.as_str(), at)
        })
        .collect()
}

/// Lay out positional events; returns their extents alongside the lanes.
pub fn layout_positional(
    events: &[PositionalEvent],
    config: &TimelineConfig,
) -> (Vec<Extent>, TrackLayout) {
    let extents = resolve_extents(events, config.default_range);
    let items: Vec<(&PositionalEvent, Extent)> =
        events.iter().zip(extents.iter().copied()).collect();
    let layout = assign_tracks_with(
        &items,
        |(_, extent)| *extent,
        |(event, _)| event.track,
        config.margin_ratio,
    );
    (extents, layout)
}
