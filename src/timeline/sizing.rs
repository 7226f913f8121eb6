//! Container geometry derived from the lane count.

use crate::config::TimelineConfig;

/// Total height: ruler plus `track_count` lanes and the gaps between them.
pub fn container_height(track_count: usize, ruler: u32, track: u32, gap: u32) -> u32 {
    let count = u32::try_from(track_count).unwrap_or(u32::MAX);
    let lanes = count.saturating_mul(track);
    let gaps = count.saturating_sub(1).saturating_mul(gap);
    ruler.saturating_add(lanes).saturating_add(gaps)
}

/// Top offset of a lane, below the ruler.
pub fn track_top(track: usize, ruler: u32, height: u32, gap: u32) -> u32 {
    let index = u32::try_from(track).unwrap_or(u32::MAX);
    ruler.saturating_add(index.saturating_mul(height.saturating_add(gap)))
}

impl TimelineConfig {
    pub fn container_height(&self, track_count: usize) -> u32 {
        container_height(
            track_count,
            self.ruler_height,
            self.track_height,
            self.track_gap,
        )
    }

    pub fn track_top(&self, track: usize) -> u32 {
        track_top(track, self.ruler_height, self.track_height, self.track_gap)
    }
}
