//! Card configuration
//!
//! Every timing, burst size and confetti range lives here so the
//! choreography stays data. All fields default, so a partial JSON file
//! only overrides what it names.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};

/// Default confetti palette (soft pinks and white).
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#ffb3cc", "#ffd1e6", "#ff9db5", "#ffe0ec", "#ffc7d9", "#ffffff",
];

/// Top-level configuration for a greeting card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Choreography delays
    pub timings: Timings,
    /// Confetti burst sizes and particle ranges
    pub confetti: ConfettiConfig,
    /// Background audio settings
    pub audio: AudioConfig,
    /// Seed for confetti randomness; entropy when absent
    pub seed: Option<u64>,
}

/// Delays between choreography steps, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Pause after the flap opens
    pub flap_open_ms: u64,
    /// CSS transition applied to the envelope overlay while fading
    pub overlay_transition: String,
    /// Pause while the overlay fades, before it is hidden
    pub overlay_fade_ms: u64,
    /// Pause between the card sliding in and the hinge opening
    pub hinge_open_ms: u64,
    /// Pause between `open` and `open-final` on the card
    pub open_final_ms: u64,
    /// Interval between background bursts once the card is open
    pub periodic_burst_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            flap_open_ms: 700,
            overlay_transition: "opacity .55s ease".to_string(),
            overlay_fade_ms: 560,
            hinge_open_ms: 950,
            open_final_ms: 650,
            periodic_burst_ms: 9000,
        }
    }
}

impl Timings {
    pub fn flap_open(&self) -> Duration {
        Duration::from_millis(self.flap_open_ms)
    }

    pub fn overlay_fade(&self) -> Duration {
        Duration::from_millis(self.overlay_fade_ms)
    }

    pub fn hinge_open(&self) -> Duration {
        Duration::from_millis(self.hinge_open_ms)
    }

    pub fn open_final(&self) -> Duration {
        Duration::from_millis(self.open_final_ms)
    }

    pub fn periodic_burst(&self) -> Duration {
        Duration::from_millis(self.periodic_burst_ms)
    }

    /// Time from trigger until the last marker lands on the card,
    /// assuming every element is present.
    pub fn sequence_length(&self) -> Duration {
        self.flap_open() + self.overlay_fade() + self.hinge_open() + self.open_final()
    }
}

/// Confetti burst sizes and per-particle ranges
///
/// Ranges are half-open `[min, max)`; a degenerate range yields `min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    /// Burst fired as the card slides in
    pub opening_burst: usize,
    /// Burst fired once the card is fully open
    pub closing_burst: usize,
    /// Burst repeated in the background afterwards
    pub periodic_burst: usize,
    pub width_px: [f32; 2],
    pub height_px: [f32; 2],
    /// Horizontal start position as a percentage of container width
    pub left_pct: [f32; 2],
    pub rotation_deg: [f32; 2],
    /// Fall animation duration in seconds
    pub fall_secs: [f32; 2],
    /// Disposal delay after spawn, independent of the fall animation
    pub lifespan_ms: u64,
    pub palette: Vec<String>,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            opening_burst: 40,
            closing_burst: 20,
            periodic_burst: 12,
            width_px: [6.0, 14.0],
            height_px: [8.0, 18.0],
            left_pct: [0.0, 100.0],
            rotation_deg: [0.0, 360.0],
            fall_secs: [2.2, 3.4],
            lifespan_ms: 3800,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ConfettiConfig {
    pub fn lifespan(&self) -> Duration {
        Duration::from_millis(self.lifespan_ms)
    }
}

/// Background audio settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Set to false to build a card without the audio capability
    pub enabled: bool,
    /// Playback volume in [0, 1]
    pub volume: f32,
    pub looping: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.5,
            looping: true,
        }
    }
}

impl CardConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CardError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges, palette and audio level.
    pub fn validate(&self) -> Result<()> {
        let confetti = &self.confetti;
        let ranges = [
            ("width_px", confetti.width_px),
            ("height_px", confetti.height_px),
            ("left_pct", confetti.left_pct),
            ("rotation_deg", confetti.rotation_deg),
            ("fall_secs", confetti.fall_secs),
        ];
        for (name, [min, max]) in ranges {
            if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
                return Err(invalid(format!(
                    "confetti.{} must be an ordered non-negative range, got [{}, {}]",
                    name, min, max
                )));
            }
        }

        if confetti.palette.is_empty() {
            return Err(invalid("confetti.palette must not be empty".to_string()));
        }
        if confetti.lifespan_ms == 0 {
            return Err(invalid("confetti.lifespan_ms must be positive".to_string()));
        }
        if self.timings.periodic_burst_ms == 0 {
            return Err(invalid(
                "timings.periodic_burst_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(invalid(format!(
                "audio.volume must be within [0, 1], got {}",
                self.audio.volume
            )));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> CardError {
    CardError::InvalidConfig { reason }
}
