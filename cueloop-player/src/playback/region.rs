//! Playback regions
//!
//! A region is the padded window around the active cue. The controller keeps
//! exactly zero or one region alive in the [`RegionEngine`]: it always clears
//! before adding.

use crate::segments::Cue;
use serde::Serialize;

/// Padded playable window, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub start: f64,
    pub end: f64,
}

impl Region {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Region around `cue`: `[max(0, start - padding), min(duration, end + padding)]`
    ///
    /// Both bounds are clamped to `[0, duration]` and `end >= start` always
    /// holds. A bound that failed to parse (`NaN`) collapses onto the other
    /// one, so such a cue yields an empty region instead of the whole file.
    ///
    /// # Examples
    /// ```
    /// use cueloop_player::playback::Region;
    /// use cueloop_player::segments::Cue;
    ///
    /// let region = Region::padded(&Cue::new(0.0, 2.0, "a"), 0.1, 6.0);
    /// assert_eq!(region.start, 0.0);
    /// assert!((region.end - 2.1).abs() < 1e-9);
    /// ```
    pub fn padded(cue: &Cue, padding: f64, duration: f64) -> Self {
        let duration = duration.max(0.0);
        let bound = |t: f64| (!t.is_nan()).then(|| t.clamp(0.0, duration));

        let (start, end) = match (
            bound(cue.start_time - padding),
            bound(cue.end_time + padding),
        ) {
            (Some(start), Some(end)) => (start, end.max(start)),
            (Some(start), None) => (start, start),
            (None, Some(end)) => (end, end),
            (None, None) => (0.0, 0.0),
        };
        Self { start, end }
    }

    /// True if `position` lies within `[start, end]`
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position <= self.end
    }
}

/// Live region owned by a [`RegionEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionHandle {
    /// Engine-assigned id, unique per engine
    pub id: u64,
    pub region: Region,
}

/// Events emitted by a region engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionEvent {
    /// The playhead left this region while playing
    RegionOut(RegionHandle),
}

/// Region tracking capability consumed by the controller
pub trait RegionEngine: Send {
    /// Remove every region
    fn clear_regions(&mut self);

    /// Create a region and return its handle
    fn add_region(&mut self, start: f64, end: f64) -> RegionHandle;

    /// Seek to the region start and play
    fn play_region(&mut self, region: &RegionHandle);
}
