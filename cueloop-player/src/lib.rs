//! # cueloop Segment Player Library (cueloop-player)
//!
//! Reviews an audio recording against its subtitle cues one segment at a time.
//!
//! **Purpose:** Map the audio position to the active cue, keep playback inside
//! a padded region around it, and implement loop / replay / smart-resume
//! transitions driven by keyboard input.
//!
//! **Architecture:** A single session task owns the [`PlaybackController`];
//! transport, region, and keyboard listeners feed it through one channel and
//! presentation code observes read-only snapshots.
//!
//! [`PlaybackController`]: playback::PlaybackController

pub mod clipboard;
pub mod config;
pub mod error;
pub mod input;
pub mod notification;
pub mod playback;
pub mod segments;
pub mod session;
pub mod srt;
pub mod subscription;

pub use error::{Error, Result};
pub use session::{Session, SessionEvent, SessionHandle};
