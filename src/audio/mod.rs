//! Background Audio Module
//!
//! Optional capability: a single looping track with play/pause and mute
//! controls and a global Escape-to-pause shortcut.

mod backend;
mod controller;

pub use backend::{AudioBackend, PlayOrigin, PlaybackPolicy, PlaybackState, SimulatedAudio};
pub use controller::{AudioController, PlaybackChange, ToggleAffordance};
