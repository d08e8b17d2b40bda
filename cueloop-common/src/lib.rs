//! # cueloop Common Library
//!
//! Shared code for the cueloop segment player:
//! - Error types
//! - Configuration file resolution and loading
//! - Event types (CueloopEvent enum) and the EventBus
//! - Subtitle timecode parsing and formatting

pub mod config;
pub mod error;
pub mod events;
pub mod timecode;

pub use error::{Error, Result};
pub use timecode::parse_timecode;
