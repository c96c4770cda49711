//! Confetti emitter with a managed particle arena
//!
//! Each burst spawns particles with independently sampled properties and a
//! fixed expiry. The owner reaps expired particles when the expiry comes
//! due; nothing caps how many are alive at once.

use std::time::Duration;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Particle;
use crate::config::ConfettiConfig;

/// Spawns and disposes confetti
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    config: ConfettiConfig,
    rng: StdRng,
    live: Vec<Particle>,
    next_id: u64,
    /// Whether a container exists to hold the confetti
    enabled: bool,
    total_spawned: u64,
}

impl ParticleEmitter {
    /// Create an emitter. `enabled` reflects the confetti capability; a
    /// disabled emitter ignores every burst.
    pub fn new(config: ConfettiConfig, seed: Option<u64>, enabled: bool) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng,
            live: Vec::new(),
            next_id: 0,
            enabled,
            total_spawned: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Spawn `count` particles at time `now`.
    ///
    /// Returns the time at which this burst must be reaped, or `None` when
    /// nothing was spawned.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use greeting_card::config::ConfettiConfig;
    /// use greeting_card::particles::ParticleEmitter;
    ///
    /// let mut emitter = ParticleEmitter::new(ConfettiConfig::default(), Some(1), true);
    /// let reap_at = emitter.emit(40, Duration::ZERO);
    /// assert_eq!(emitter.live_count(), 40);
    /// assert_eq!(reap_at, Some(Duration::from_millis(3800)));
    /// ```
    pub fn emit(&mut self, count: usize, now: Duration) -> Option<Duration> {
        if !self.enabled || count == 0 {
            return None;
        }

        let expires_at = now + self.config.lifespan();
        self.live.reserve(count);
        for _ in 0..count {
            let particle = self.spawn(now, expires_at);
            self.live.push(particle);
        }
        self.total_spawned += count as u64;

        debug!(
            "[CONFETTI] Burst of {} at {:?}, {} live",
            count,
            now,
            self.live.len()
        );
        Some(expires_at)
    }

    /// Remove every particle whose expiry is at or before `now`.
    pub fn reap(&mut self, now: Duration) -> usize {
        let before = self.live.len();
        self.live.retain(|p| !p.is_expired(now));
        let removed = before - self.live.len();
        if removed > 0 {
            debug!("[CONFETTI] Reaped {}, {} live", removed, self.live.len());
        }
        removed
    }

    pub fn live(&self) -> &[Particle] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Particles spawned over the emitter's lifetime
    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    fn spawn(&mut self, now: Duration, expires_at: Duration) -> Particle {
        let id = self.next_id;
        self.next_id += 1;

        let width_px = sample(&mut self.rng, self.config.width_px);
        let height_px = sample(&mut self.rng, self.config.height_px);
        let left_pct = sample(&mut self.rng, self.config.left_pct);
        let color_index = self.rng.random_range(0..self.config.palette.len());
        let rotation_deg = sample(&mut self.rng, self.config.rotation_deg);
        let fall_secs = sample(&mut self.rng, self.config.fall_secs);

        Particle {
            id,
            width_px,
            height_px,
            left_pct,
            color: self.config.palette[color_index].clone(),
            rotation_deg,
            fall_secs,
            spawned_at: now,
            expires_at,
        }
    }
}

/// Uniform sample from `[min, max)`, or `min` for a degenerate range
fn sample(rng: &mut StdRng, [min, max]: [f32; 2]) -> f32 {
    if min >= max {
        return min;
    }
    // float rounding can land exactly on `max`
    let value = rng.random_range(min..max);
    if value < max {
        value
    } else {
        min
    }
}
