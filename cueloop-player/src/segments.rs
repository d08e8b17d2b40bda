//! Subtitle cue timeline
//!
//! Holds the ordered cue collection and maps a continuous audio position to a
//! discrete cue index.
//!
//! **Ordering:** cues are kept in document order and never re-sorted. Cues
//! may overlap; lookups resolve an overlap to the earliest cue in the
//! collection.

use cueloop_common::timecode::parse_timecode;
use serde::{Deserialize, Serialize};

/// Cue as produced by a subtitle parser, timestamps still in text form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCue {
    /// Start timestamp (`HH:MM:SS,mmm`)
    pub start_time: String,

    /// End timestamp (`HH:MM:SS,mmm`)
    pub end_time: String,

    /// Cue text, lines joined with `\n`
    pub text: String,
}

/// One subtitle entry on the numeric timeline
///
/// Timestamps that failed to parse are `NaN` and never contain any position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    /// Start time (seconds)
    pub start_time: f64,

    /// End time (seconds)
    pub end_time: f64,

    /// Cue text
    pub text: String,
}

impl Cue {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// Convert parser output to the numeric timeline
    pub fn from_raw(raw: &RawCue) -> Self {
        Self {
            start_time: parse_timecode(&raw.start_time),
            end_time: parse_timecode(&raw.end_time),
            text: raw.text.clone(),
        }
    }

    /// True if `position` lies within `[start_time, end_time]` (both inclusive)
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start_time && position <= self.end_time
    }

    /// Text with every non-whitespace character replaced by `-`
    ///
    /// Keeps word lengths and line breaks visible while the words are hidden.
    pub fn masked_text(&self) -> String {
        self.text
            .chars()
            .map(|c| if c.is_whitespace() { c } else { '-' })
            .collect()
    }
}

/// Ordered cue collection
///
/// Replaced wholesale on every subtitle load.
#[derive(Debug, Clone, Default)]
pub struct SegmentIndex {
    cues: Vec<Cue>,
}

impl SegmentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from parser output
    pub fn from_raw(raw: &[RawCue]) -> Self {
        Self {
            cues: raw.iter().map(Cue::from_raw).collect(),
        }
    }

    /// Replace the stored cues entirely
    ///
    /// Choosing the new current segment is left to the caller.
    pub fn load(&mut self, cues: Vec<Cue>) {
        self.cues = cues;
    }

    /// Index of the first cue (in stored order) containing `position`
    ///
    /// Linear scan: overlapping cues resolve to the earliest-inserted match.
    ///
    /// # Examples
    /// ```
    /// use cueloop_player::segments::{Cue, SegmentIndex};
    ///
    /// let mut index = SegmentIndex::new();
    /// index.load(vec![Cue::new(0.0, 2.0, "a"), Cue::new(3.0, 5.0, "b")]);
    ///
    /// assert_eq!(index.find_index_at_time(4.0), Some(1));
    /// assert_eq!(index.find_index_at_time(2.5), None); // gap
    /// ```
    pub fn find_index_at_time(&self, position: f64) -> Option<usize> {
        self.cues.iter().position(|cue| cue.contains(position))
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter()
    }

    /// Latest end time across all cues, ignoring unparsable ones
    pub fn max_end_time(&self) -> Option<f64> {
        self.cues
            .iter()
            .map(|c| c.end_time)
            .filter(|t| t.is_finite())
            .fold(None, |acc, t| Some(acc.map_or(t, |a: f64| a.max(t))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start: &str, end: &str, text: &str) -> RawCue {
        RawCue {
            start_time: start.to_string(),
            end_time: end.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_from_raw_converts_timecodes() {
        let index = SegmentIndex::from_raw(&[
            raw("00:00:01,000", "00:00:02,500", "one"),
            raw("00:01:00,000", "00:01:02,000", "two"),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0).unwrap().start_time, 1.0);
        assert_eq!(index.get(0).unwrap().end_time, 2.5);
        assert_eq!(index.get(1).unwrap().start_time, 60.0);
    }

    #[test]
    fn test_find_index_boundaries_inclusive() {
        let mut index = SegmentIndex::new();
        index.load(vec![Cue::new(0.0, 2.0, "a"), Cue::new(3.0, 5.0, "b")]);

        assert_eq!(index.find_index_at_time(0.0), Some(0));
        assert_eq!(index.find_index_at_time(2.0), Some(0));
        assert_eq!(index.find_index_at_time(3.0), Some(1));
        assert_eq!(index.find_index_at_time(5.0), Some(1));
        assert_eq!(index.find_index_at_time(5.01), None);
    }

    #[test]
    fn test_find_index_overlap_prefers_first_inserted() {
        let mut index = SegmentIndex::new();
        // Stored order wins, even though the second cue starts earlier
        index.load(vec![Cue::new(2.0, 6.0, "late"), Cue::new(1.0, 4.0, "early")]);

        assert_eq!(index.find_index_at_time(3.0), Some(0));
        assert_eq!(index.find_index_at_time(1.5), Some(1));
    }

    #[test]
    fn test_find_index_never_matches_nan_cue() {
        let index = SegmentIndex::from_raw(&[raw("bad", "00:00:05,000", "broken")]);

        assert!(index.get(0).unwrap().start_time.is_nan());
        assert_eq!(index.find_index_at_time(1.0), None);
        assert_eq!(index.find_index_at_time(f64::NAN), None);
    }

    #[test]
    fn test_load_replaces_everything() {
        let mut index = SegmentIndex::new();
        index.load(vec![Cue::new(0.0, 1.0, "a"), Cue::new(1.0, 2.0, "b")]);
        index.load(vec![Cue::new(5.0, 6.0, "c")]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(0).unwrap().text, "c");
        assert!(index.get(1).is_none());
    }

    #[test]
    fn test_empty_index() {
        let index = SegmentIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.find_index_at_time(0.0), None);
        assert_eq!(index.max_end_time(), None);
    }

    #[test]
    fn test_masked_text_keeps_whitespace() {
        let cue = Cue::new(0.0, 1.0, "Hi there\nyou");
        assert_eq!(cue.masked_text(), "-- -----\n---");
    }

    #[test]
    fn test_max_end_time_skips_nan() {
        let index = SegmentIndex::from_raw(&[
            raw("00:00:01,000", "00:00:09,000", "a"),
            raw("00:00:02,000", "oops", "b"),
            raw("00:00:03,000", "00:00:04,000", "c"),
        ]);
        assert_eq!(index.max_end_time(), Some(9.0));
    }
}
