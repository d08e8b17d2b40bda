//! SubRip (SRT) subtitle parser
//!
//! Produces [`RawCue`]s with the timestamps left as text; conversion to the
//! numeric timeline happens when the cues are loaded into a
//! [`SegmentIndex`](crate::segments::SegmentIndex).
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! First caption text
//!
//! 2
//! 00:00:05,500 --> 00:00:08,000
//! Second caption text
//! with multiple lines
//! ```

use crate::error::{Error, Result};
use crate::segments::RawCue;
use std::path::Path;
use tracing::{debug, warn};

const TIMING_ARROW: &str = "-->";

/// Parse SRT text into raw cues, in document order.
///
/// - Blocks are separated by blank lines; the sequence number line is optional
///   and ignored.
/// - A block without a `-->` timing line is skipped with a warning.
/// - Cue settings after the end timestamp (`X1:... Y1:...`) are dropped.
/// - Empty input yields no cues; non-empty input without a single valid block
///   is an error.
pub fn parse_srt(content: &str) -> Result<Vec<RawCue>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut cues = Vec::new();
    let mut skipped = 0usize;

    let mut block: Vec<&str> = Vec::new();
    for line in content.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line);
            continue;
        }
        if block.is_empty() {
            continue;
        }

        match parse_block(&block) {
            Some(cue) => cues.push(cue),
            None => {
                skipped += 1;
                warn!("Skipping SRT block without timing line: {:?}", block.first());
            }
        }
        block.clear();
    }

    if cues.is_empty() && skipped > 0 {
        return Err(Error::Subtitle(format!(
            "no valid cues found ({} blocks skipped)",
            skipped
        )));
    }

    debug!("Parsed {} SRT cues ({} blocks skipped)", cues.len(), skipped);
    Ok(cues)
}

/// Read and parse an SRT file
pub fn load_srt_file(path: &Path) -> Result<Vec<RawCue>> {
    let content = std::fs::read_to_string(path)?;
    parse_srt(&content)
}

fn parse_block(lines: &[&str]) -> Option<RawCue> {
    let timing_pos = lines.iter().position(|l| l.contains(TIMING_ARROW))?;
    let (start, end) = lines[timing_pos].split_once(TIMING_ARROW)?;

    let start_time = start.trim().to_string();
    let end_time = end.split_whitespace().next().unwrap_or("").to_string();

    let text = lines[timing_pos + 1..]
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    Some(RawCue {
        start_time,
        end_time,
        text,
    })
}
