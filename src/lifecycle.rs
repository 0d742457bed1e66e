//! Point lifecycle policies.
//!
//! Three interchangeable strategies govern how a field's population evolves,
//! selected per field by configuration:
//!
//! | Policy | Population | Used by |
//! |--------|-----------|---------|
//! | [`Lifecycle::Recycle`] | Fixed; exits respawn in place | starfields, tunnels |
//! | [`Lifecycle::SpawnExpire`] | Bounded; emitter feeds, age retires | fountains, bubbles |
//! | [`Lifecycle::Band`] | Constant; scroll offset wraps dots edge-to-edge | flowing dotted lines |
//!
//! The lifecycle runs after forces and integration each frame: it is the
//! only component allowed to pull points back in bounds or destroy them.

use crate::emitter::{sample_range, Emitter};
use crate::field::{Point, PointField};
use crate::placement;
use glam::Vec2;
use rand::Rng;
use std::ops::Range;

/// Population policy for one field.
#[derive(Clone, Debug)]
pub enum Lifecycle {
    /// Fixed population: a point leaving the viewport (beyond `overflow`
    /// slack) or finishing its depth cycle is re-placed at a fresh position
    /// honoring the field's minimum gap against all other live points, with
    /// a newly randomized depth.
    Recycle {
        /// Bounds slack before a point counts as escaped.
        overflow: f32,
        /// Depth values are (re)sampled uniformly from this range; reaching
        /// the top of the range completes a cycle.
        depth_range: Range<f32>,
    },

    /// Bounded stream: spawn up to `emission_rate` points per frame while
    /// under `max_points`; every live point ages one frame; points retire
    /// when their age reaches their sampled lifetime or they exit on a
    /// retiring side (top, left, or right; spawning happens at or below
    /// the bottom).
    SpawnExpire {
        emitter: Emitter,
        /// Points spawned per frame (subject to the cap).
        emission_rate: usize,
        /// Hard population cap.
        max_points: usize,
        /// Per-point lifetime in frames, sampled at spawn.
        lifetime: Range<u32>,
        /// Size added per frame (bubbles grow as they rise).
        grow_rate: f32,
    },

    /// Streaming band: dots hold fixed coordinates on an infinite 1D axis;
    /// a field-level offset advances by `speed` per frame and wraps modulo
    /// `width + 2·spacing`. The dot crossing the trailing edge is the same
    /// dot re-entering at the leading edge, so the visible band stays gapless
    /// and the population is constant by construction.
    Band {
        /// Distance between dots along the band.
        spacing: f32,
        /// Scroll speed per frame (sign sets direction).
        speed: f32,
        /// Baseline y of the wave.
        line_y: f32,
        /// Phase offset fed into the wave.
        phase: f32,
        /// Wave period length.
        wavelength: f32,
        /// Wave height.
        amplitude: f32,
    },
}

impl Lifecycle {
    /// Initial band population: one dot per `spacing` across the viewport
    /// plus one off each edge. Empty for the other policies (their points
    /// come from layout or emitters).
    pub(crate) fn band_points(&self, width: f32) -> Vec<Point> {
        let Lifecycle::Band { spacing, line_y, phase, wavelength, amplitude, .. } = self else {
            return Vec::new();
        };
        // One dot per spacing across the window plus one off each edge,
        // never more: population stays inside
        // [width/spacing, width/spacing + 2] for any width.
        let count = (width / spacing).floor() as usize + 2;
        let mut points = Vec::with_capacity(count);
        for i in 0..count {
            let x = -spacing + i as f32 * spacing;
            let target = Vec2::new(x, line_y + ((x + phase) / wavelength).sin() * amplitude);
            let mut point = Point::anchored(target);
            point.band_base = x;
            points.push(point);
        }
        points
    }

    /// Apply this policy for one frame. Runs after integration.
    pub(crate) fn apply<R: Rng>(
        &self,
        field: &mut PointField,
        min_gap: f32,
        tolerance: usize,
        rng: &mut R,
    ) {
        match self {
            Lifecycle::Recycle { overflow, depth_range } => {
                for i in 0..field.points.len() {
                    let escaped = !field
                        .viewport
                        .contains(field.points[i].position, *overflow);
                    let cycled = field.points[i].depth >= depth_range.end;
                    if !(escaped || cycled) {
                        continue;
                    }

                    let others = field.positions_except(i);
                    let position = placement::resample(
                        &others,
                        &field.viewport,
                        min_gap,
                        tolerance,
                        rng,
                    )
                    .unwrap_or_else(|| placement::random_position(&field.viewport, rng));

                    let point = &mut field.points[i];
                    point.position = position;
                    point.velocity = Vec2::ZERO;
                    point.depth = sample_range(depth_range, rng);
                }
            }

            Lifecycle::SpawnExpire { emitter, emission_rate, max_points, lifetime, grow_rate } => {
                let width = field.viewport.width;
                for point in &mut field.points {
                    point.age += 1;
                    point.size += grow_rate;
                }
                field.points.retain(|p| {
                    let expired = p.lifespan > 0 && p.age >= p.lifespan;
                    let above = p.position.y + p.size < 0.0;
                    let out_side =
                        p.position.x < -p.size || p.position.x > width + p.size;
                    !(expired || above || out_side)
                });

                for _ in 0..*emission_rate {
                    if field.points.len() >= *max_points {
                        break;
                    }
                    let mut point = emitter.spawn(&field.viewport, rng);
                    point.lifespan = sample_lifetime(lifetime, rng);
                    field.points.push(point);
                }
            }

            Lifecycle::Band { spacing, speed, line_y, phase, wavelength, amplitude } => {
                let total = field.viewport.width + 2.0 * spacing;
                field.offset = (field.offset + speed).rem_euclid(total);

                for point in &mut field.points {
                    let scrolled = point.band_base + field.offset;
                    let mapped = (scrolled + spacing).rem_euclid(total) - spacing;
                    let target = Vec2::new(
                        mapped,
                        line_y + ((scrolled + phase) / wavelength).sin() * amplitude,
                    );

                    // A target jump of over half the band means the dot just
                    // wrapped edges: re-seat it instantly instead of letting
                    // the spring drag it across the screen.
                    if let Some(previous) = point.rest_target {
                        if (target.x - previous.x).abs() > total / 2.0 {
                            point.position = target;
                            point.velocity = Vec2::ZERO;
                        }
                    }
                    point.rest_target = Some(target);
                }
            }
        }
    }
}

fn sample_lifetime<R: Rng>(range: &Range<u32>, rng: &mut R) -> u32 {
    if range.end <= range.start {
        range.start.max(1)
    } else {
        rng.gen_range(range.start..range.end).max(1)
    }
}
