//! Segment playback engine and its collaborators

pub mod controller;
pub mod headless;
pub mod region;
pub mod state;
pub mod transport;

pub use controller::PlaybackController;
pub use headless::HeadlessPlayhead;
pub use region::{Region, RegionEngine, RegionEvent, RegionHandle};
pub use state::{ActiveCue, PlaybackSnapshot, PlaybackState};
pub use transport::{AudioSource, AudioTransport, TransportEvent};
