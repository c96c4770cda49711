//! Audio backends
//!
//! The controller talks to the platform through [`AudioBackend`]. The
//! simulated backend keeps a small playback state machine and applies a
//! configurable autoplay policy, standing in for a browser media element.

use std::fmt;
use std::time::Duration;

use log::debug;

use crate::error::{CardError, Result};

/// Why playback was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOrigin {
    /// Started as a side effect of opening the card
    Autoplay,
    /// The user pressed the play control
    User,
}

/// Playback state of the background track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Paused => write!(f, "Paused"),
            PlaybackState::Playing => write!(f, "Playing"),
        }
    }
}

/// Platform audio element
pub trait AudioBackend: fmt::Debug {
    /// Start playback from the current position. May be refused.
    fn play(&mut self, origin: PlayOrigin) -> Result<()>;

    /// Pause playback. Never fails.
    fn pause(&mut self);

    /// Move the playhead back to the start of the track
    fn rewind(&mut self);

    /// Playhead position within the track
    fn position(&self) -> Duration;

    fn is_paused(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn is_muted(&self) -> bool;

    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;

    fn set_looping(&mut self, looping: bool);

    fn is_looping(&self) -> bool;
}

/// How the simulated platform answers play requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPolicy {
    /// Every request succeeds
    #[default]
    Allow,
    /// Autoplay is refused, direct user requests succeed
    BlockAutoplay,
    /// The track cannot be played at all
    Unavailable,
}

/// In-memory audio element
#[derive(Debug, Clone, Default)]
pub struct SimulatedAudio {
    state: PlaybackState,
    position: Duration,
    volume: f32,
    looping: bool,
    muted: bool,
    policy: PlaybackPolicy,
}

impl SimulatedAudio {
    /// Create a paused element at full volume
    ///
    /// # Example
    /// ```
    /// use greeting_card::audio::{AudioBackend, PlayOrigin, PlaybackPolicy, SimulatedAudio};
    ///
    /// let mut audio = SimulatedAudio::new(PlaybackPolicy::BlockAutoplay);
    /// assert!(audio.play(PlayOrigin::Autoplay).is_err());
    /// assert!(audio.play(PlayOrigin::User).is_ok());
    /// assert!(!audio.is_paused());
    /// ```
    pub fn new(policy: PlaybackPolicy) -> Self {
        Self {
            volume: 1.0,
            policy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn policy(&self) -> PlaybackPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: PlaybackPolicy) {
        self.policy = policy;
    }

    /// Jump to a position in the track
    pub fn seek(&mut self, position: Duration) {
        self.position = position;
    }
}

impl AudioBackend for SimulatedAudio {
    fn play(&mut self, origin: PlayOrigin) -> Result<()> {
        match (self.policy, origin) {
            (PlaybackPolicy::Unavailable, _) => Err(CardError::PlaybackUnavailable {
                reason: "no playable source".to_string(),
            }),
            (PlaybackPolicy::BlockAutoplay, PlayOrigin::Autoplay) => {
                Err(CardError::PlaybackBlocked)
            }
            _ => {
                self.state = PlaybackState::Playing;
                debug!("[AUDIO] Play from {:?}", self.position);
                Ok(())
            }
        }
    }

    fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            debug!("[AUDIO] Paused at {:?}", self.position);
        }
        self.state = PlaybackState::Paused;
    }

    fn rewind(&mut self) {
        self.position = Duration::ZERO;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn is_looping(&self) -> bool {
        self.looping
    }
}
