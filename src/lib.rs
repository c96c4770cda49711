//! Greeting Card - Envelope Opening Choreography
//!
//! A headless model of an animated greeting card page. The user opens an
//! envelope and the card plays a one-shot, timed sequence of visual state
//! changes, throws confetti, and optionally starts background music.
//!
//! # Architecture
//!
//! - Scene: optional page elements with classes, styles and attributes
//! - Engine: virtual clock, timer queue and a data-driven step runner
//! - Particles: confetti arena with spawn and expiry timestamps
//! - Audio: play/pause/mute controller over a pluggable backend
//!
//! Rendering is left to whoever mirrors the scene and the timeline.

pub mod audio;
pub mod card;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod particles;
#[cfg(feature = "realtime")]
pub mod runtime;
pub mod scene;
pub mod timeline;

pub use card::GreetingCard;
pub use error::{CardError, Result};
