//! Point emitters for spawn/expire lifecycles.
//!
//! Emitters create new points each frame while the population is under its
//! cap. Spawn position, initial velocity, and size are randomized within
//! configured ranges.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Emitter::Nozzle`] | Fixed emission point with upward spray (fountains, fire) |
//! | [`Emitter::BottomEdge`] | Random position along the bottom edge, rising (bubbles) |

use crate::field::{Point, Viewport};
use glam::Vec2;
use rand::Rng;
use std::ops::Range;

/// Sample a value from a range, tolerating empty and reversed ranges.
pub(crate) fn sample_range<R: Rng>(range: &Range<f32>, rng: &mut R) -> f32 {
    let (lo, hi) = if range.start <= range.end {
        (range.start, range.end)
    } else {
        (range.end, range.start)
    };
    if hi - lo <= f32::EPSILON {
        lo
    } else {
        rng.gen_range(lo..hi)
    }
}

/// Where and how new points enter a spawn/expire field.
#[derive(Clone, Debug)]
pub enum Emitter {
    /// Emit from one fixed position with randomized upward velocity.
    ///
    /// Horizontal velocity is uniform in `[-spread, spread]`; vertical
    /// velocity is `-speed` (upward in y-down coordinates).
    Nozzle {
        /// Emission point in viewport coordinates.
        position: Vec2,
        /// Horizontal velocity half-range.
        spread: f32,
        /// Upward speed range.
        speed: Range<f32>,
        /// Spawn size range.
        size: Range<f32>,
    },

    /// Emit from a random x along the bottom edge, just below the viewport.
    BottomEdge {
        /// How far below the bottom edge points start.
        inset: f32,
        /// Upward speed range.
        speed: Range<f32>,
        /// Horizontal drift velocity half-range.
        drift: f32,
        /// Spawn size range.
        size: Range<f32>,
    },
}

impl Emitter {
    /// Spawn one point. Age starts at zero; the lifecycle assigns lifespan.
    pub fn spawn<R: Rng>(&self, viewport: &Viewport, rng: &mut R) -> Point {
        match self {
            Emitter::Nozzle { position, spread, speed, size } => {
                let mut point = Point::at(*position);
                point.velocity = Vec2::new(
                    if *spread > 0.0 { rng.gen_range(-*spread..*spread) } else { 0.0 },
                    -sample_range(speed, rng),
                );
                point.size = sample_range(size, rng);
                point
            }

            Emitter::BottomEdge { inset, speed, drift, size } => {
                let mut point = Point::at(Vec2::new(
                    rng.gen::<f32>() * viewport.width,
                    viewport.height + inset,
                ));
                point.velocity = Vec2::new(
                    if *drift > 0.0 { rng.gen_range(-*drift..*drift) } else { 0.0 },
                    -sample_range(speed, rng),
                );
                point.size = sample_range(size, rng);
                point
            }
        }
    }
}
