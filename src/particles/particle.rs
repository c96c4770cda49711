//! A single piece of confetti

use std::time::Duration;

use serde::Serialize;

/// One confetti particle.
///
/// The record is purely logical; a renderer draws it as a small rotated
/// rectangle that falls from the top of the confetti container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub id: u64,
    pub width_px: f32,
    pub height_px: f32,
    /// Horizontal start position, percent of container width
    pub left_pct: f32,
    pub color: String,
    pub rotation_deg: f32,
    /// Duration of the fall animation
    pub fall_secs: f32,
    pub spawned_at: Duration,
    /// Disposal time, fixed at spawn regardless of the fall animation
    pub expires_at: Duration,
}

impl Particle {
    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at
    }

    /// Inline style a DOM renderer would apply to the particle
    pub fn css(&self) -> String {
        format!(
            "position:absolute;top:-10px;left:{:.2}%;width:{:.2}px;height:{:.2}px;\
             background:{};border-radius:2px;z-index:6;opacity:0.95;\
             transform:rotate({:.1}deg);animation:confettiFall {:.2}s forwards ease-in",
            self.left_pct,
            self.width_px,
            self.height_px,
            self.color,
            self.rotation_deg,
            self.fall_secs
        )
    }
}
