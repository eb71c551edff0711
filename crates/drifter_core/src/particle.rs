//! Visual-only particles.
//!
//! Particles are never collided with and never persisted. Their lifetime is
//! the one simulated quantity that is scaled by elapsed time.

use crate::math::{Color, Vec2};

/// A short-lived visual effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub pos: Vec2,
    /// Velocity in world units per tick.
    pub vel: Vec2,
    /// Remaining life; the particle expires at or below zero.
    pub life: f32,
    /// Initial life, used for the fade ratio.
    pub max_life: f32,
    /// Display colour.
    pub color: Color,
    /// Display size.
    pub size: f32,
}

impl Particle {
    /// Life lost per unit of elapsed time.
    pub const DECAY_RATE: f32 = 2.0;

    /// Creates a particle at full life.
    #[must_use]
    pub const fn new(pos: Vec2, vel: Vec2, life: f32, color: Color, size: f32) -> Self {
        Self {
            pos,
            vel,
            life,
            max_life: life,
            color,
            size,
        }
    }

    /// Moves the particle one tick and ages it by `dt`.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel;
        self.life -= dt * Self::DECAY_RATE;
    }

    /// True once the particle has no life left.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Remaining life as a fraction of the initial life, in `[0, 1]`.
    #[must_use]
    pub fn fade(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}
