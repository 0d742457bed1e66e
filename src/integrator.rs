//! Damped velocity integration.
//!
//! Every variant of the source effects advances points the same way:
//! accumulate acceleration into velocity, damp it multiplicatively, then move
//! by the damped velocity. The friction factor is a fixed per-field constant
//! in `(0, 1)` (typically 0.7-0.92), applied every frame regardless of
//! acceleration magnitude.

use crate::field::Point;
use glam::Vec2;

/// Advances point state by one frame (`dt` is one frame by definition).
#[derive(Clone, Copy, Debug)]
pub struct Integrator {
    friction: f32,
}

impl Integrator {
    /// `friction` must already be validated to lie in `(0, 1)`;
    /// [`Simulation::build`](crate::simulation::Simulation::build) enforces it.
    pub(crate) fn new(friction: f32) -> Self {
        Self { friction }
    }

    #[inline]
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// `velocity ← (velocity + acceleration) · friction`,
    /// `position ← position + velocity`.
    #[inline]
    pub fn advance(&self, point: &mut Point, acceleration: Vec2) {
        point.velocity = (point.velocity + acceleration) * self.friction;
        point.position += point.velocity;
    }
}
