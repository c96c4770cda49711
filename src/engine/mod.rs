//! Choreography Engine Module
//!
//! Core timing machinery of the card:
//! - Virtual clock and timer queue
//! - Choreography scripts as data
//! - One-shot step runner

pub mod choreography;
pub mod scheduler;
pub mod sequencer;

pub use choreography::{opening_script, Step, OPEN, OPEN_FINAL, SLIDE_IN};
pub use scheduler::Scheduler;
pub use sequencer::{Advance, SequenceState, Sequencer, Stage};
