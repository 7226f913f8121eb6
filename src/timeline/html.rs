//! Timeline markup.
//!
//! Bars are absolutely positioned: horizontal placement is a percentage of
//! the total span, vertical placement comes from the lane. The container
//! height is derived from the lane count so the page never reflows when the
//! dataset changes.

use super::chronology::TimelineEvent;
use super::positional::{PositionalEvent, pin_positions};
use super::track::{Extent, TrackLayout};
use crate::config::TimelineConfig;
use maud::{Markup, html};

/// One drawable bar.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBar<'a> {
    pub label: &'a str,
    pub description: &'a str,
    pub extent: Extent,
    /// Absolute pin positions.
    pub pins: Vec<(&'a str, f64)>,
}

pub fn chronology_bars<'a>(events: &'a [TimelineEvent], months: &[String]) -> Vec<TimelineBar<'a>> {
    events
        .iter()
        .map(|event| TimelineBar {
            label: &event.event,
            description: &event.description,
            extent: event.extent(months),
            pins: Vec::new(),
        })
        .collect()
}

pub fn positional_bars<'a>(
    events: &'a [PositionalEvent],
    extents: &[Extent],
) -> Vec<TimelineBar<'a>> {
    events
        .iter()
        .zip(extents)
        .map(|(event, extent)| TimelineBar {
            label: &event.title,
            description: &event.description,
            extent: *extent,
            pins: pin_positions(event, extent),
        })
        .collect()
}

/// Axis label: integers without decimals, fractions to two places.
pub fn format_axis(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Render the timeline container with one positioned element per bar.
pub fn render_timeline(
    bars: &[TimelineBar<'_>],
    layout: &TrackLayout,
    config: &TimelineConfig,
) -> Markup {
    let extents: Vec<Extent> = bars.iter().map(|b| b.extent).collect();
    let span = super::track::total_span(&extents);
    let origin = extents
        .iter()
        .map(|e| e.start)
        .fold(f64::INFINITY, f64::min);
    let origin = if origin.is_finite() { origin } else { 0.0 };
    let percent = |at: f64| (at - origin) / span * 100.0;

    let height = config.container_height(layout.track_count);
    let container_style = format!("position: relative; height: {height}px;");
    let ruler_style = format!("height: {}px;", config.ruler_height);

    html! {
        div.timeline style=(container_style) data-tracks=(layout.track_count) {
            div.timeline-ruler style=(ruler_style) {
                span.ruler-start { (format_axis(origin)) }
                span.ruler-end { (format_axis(origin + span)) }
            }
            @for (idx, bar) in bars.iter().enumerate() {
                @let track = layout.track_of(idx).unwrap_or(0);
                @let style = format!(
                    "position: absolute; left: {:.3}%; width: {:.3}%; top: {}px; height: {}px;",
                    percent(bar.extent.start),
                    bar.extent.len() / span * 100.0,
                    config.track_top(track),
                    config.track_height,
                );
                @let is_point = bar.extent.len() == 0.0;
                div.timeline-bar.point[is_point] style=(style) data-track=(track) title=(bar.description) {
                    span.timeline-label { (bar.label) }
                    @for (label, at) in &bar.pins {
                        @let offset = if bar.extent.len() > 0.0 {
                            (at - bar.extent.start) / bar.extent.len() * 100.0
                        } else {
                            0.0
                        };
                        span.timeline-pin style=(format!("left: {offset:.3}%;")) title=(label) {}
                    }
                }
            }
        }
    }
}
