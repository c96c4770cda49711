//! Confetti Module
//!
//! Short-lived decorative particles. Motion is left to the renderer; this
//! module only decides what spawns, with which properties, and when it goes.

mod emitter;
mod particle;

pub use emitter::ParticleEmitter;
pub use particle::Particle;
