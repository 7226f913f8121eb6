//! Timeline layout: lane assignment, dataset shapes and rendering.
//!
//! | Module | Role |
//! |--------|------|
//! | [`track`] | Greedy first-fit lane assignment over closed intervals |
//! | [`chronology`] | Year/month events and their mapping onto the axis |
//! | [`positional`] | Events on a relative axis, with pins |
//! | [`sizing`] | Container height and lane offsets |
//! | [`html`] | Maud markup for a laid-out timeline |

pub mod chronology;
pub mod html;
pub mod positional;
pub mod sizing;
pub mod track;

pub use chronology::{TimelineEvent, layout_chronology};
pub use positional::{PositionalEvent, layout_positional};
pub use track::{Extent, TrackLayout, assign_tracks, assign_tracks_with};
