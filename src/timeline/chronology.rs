//! Chronology timelines: events dated by year and month.
//!
//! An event is either a point (`year`, optional `month`) or a range
//! (`yearStart`/`monthStart` through `yearEnd`/`monthEnd`). Dates map onto
//! the layout axis as `year + month_index / 12`, so a bar for "março 30" to
//! "abril 30" spans one twelfth of a unit.

use super::track::{Extent, TrackLayout, assign_tracks_with};
use crate::config::TimelineConfig;
use crate::types::SourceRef;
use serde::{Deserialize, Serialize};

/// Brazilian Portuguese month names, in calendar order.
pub const PT_BR_MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// A dated event as authored in chronology datasets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_start: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_end: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_end: Option<String>,
    pub event: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference: Vec<SourceRef>,
    /// Explicit lane; computed when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<usize>,
}

impl TimelineEvent {
    /// Start date, falling back from the range fields to the point fields.
    pub fn start(&self) -> (i32, Option<&str>) {
        let year = self.year_start.or(self.year).unwrap_or(0);
        let month = self.month_start.as_deref().or(self.month.as_deref());
        (year, month)
    }

    /// End date, falling back to the point fields and then to the start.
    pub fn end(&self) -> (i32, Option<&str>) {
        let (start_year, start_month) = self.start();
        let year = self.year_end.or(self.year).unwrap_or(start_year);
        let month = self
            .month_end
            .as_deref()
            .or(self.month.as_deref())
            .or(if self.year_end.is_none() {
                start_month
            } else {
                None
            });
        (year, month)
    }

    /// Position on the layout axis. Inverted dates are swapped.
    pub fn extent<S: AsRef<str>>(&self, months: &[S]) -> Extent {
        let (start_year, start_month) = self.start();
        let (end_year, end_month) = self.end();
        Extent::new(
            to_scalar(start_year, month_index(start_month, months)),
            to_scalar(end_year, month_index(end_month, months)),
        )
    }
}

/// Zero-based month index; unknown or missing months are 0.
pub fn month_index<S: AsRef<str>>(month: Option<&str>, months: &[S]) -> u32 {
    let Some(month) = month.map(str::trim) else {
        return 0;
    };
    months
        .iter()
        .position(|m| m.as_ref().to_lowercase() == month.to_lowercase())
        .map_or(0, |i| i as u32)
}

/// `year + month_index / 12`.
pub fn to_scalar(year: i32, month_index: u32) -> f64 {
    f64::from(year) + f64::from(month_index) / 12.0
}

/// Lay out chronology events with the configured months and margin.
pub fn layout_chronology(events: &[TimelineEvent], config: &TimelineConfig) -> TrackLayout {
    assign_tracks_with(
        events,
        |e| e.extent(&config.months[..]),
        |e| e.track,
        config.margin_ratio,
    )
}
