//! Per-frame force contributions.
//!
//! Forces define how points accelerate. They are applied in order every frame
//! and summed; after all forces run, the integrator folds the total
//! acceleration into velocity and position.
//!
//! # Force Catalog
//!
//! | Category | Forces |
//! |----------|--------|
//! | Restoring | [`Force::SpringToTarget`] |
//! | Pointer | [`Force::PointerRepel`], [`Force::PointerMagnet`], [`Force::PointerWind`] |
//! | Ambient | [`Force::Drift`], [`Force::Jitter`] |
//!
//! Pointer forces contribute nothing while the pointer is absent, and any
//! direction-dependent term at exactly zero distance is skipped rather than
//! divided through, so degenerate geometry never produces NaN.

use crate::field::{Point, Viewport};
use glam::Vec2;
use rand::Rng;

/// A single acceleration contribution, enabled per field by configuration.
#[derive(Clone, Debug)]
pub enum Force {
    /// Elastic pull toward the point's rest target: `k · (target − position)`.
    ///
    /// Points without a rest target are unaffected. Typical stiffness values
    /// run 0.02 (soft wave lines) to 0.3 (snappy grids).
    SpringToTarget {
        /// Spring constant `k`.
        stiffness: f32,
    },

    /// Push away from the pointer with linear falloff.
    ///
    /// Inside `radius` the force is `(radius − d) / radius · strength` along
    /// the pointer→point axis; zero at the rim and beyond. A negative
    /// `strength` attracts instead.
    PointerRepel {
        /// Effect radius in viewport units.
        radius: f32,
        /// Peak force at zero distance. Negative values attract.
        strength: f32,
    },

    /// Bend the point's rest target toward the pointer (magnetic grid).
    ///
    /// Measured against the rest target, not the live position, so a point
    /// mid-flight keeps the same bent home. Composes with
    /// [`Force::SpringToTarget`]: the sum equals a spring toward the bent
    /// target when both use the same stiffness.
    PointerMagnet {
        /// Influence radius around the rest target.
        radius: f32,
        /// Fraction of the target→pointer distance covered at zero range.
        power: f32,
        /// Spring constant applied to the bend.
        stiffness: f32,
    },

    /// Constant ambient acceleration: gravity, wind, current.
    ///
    /// Remember that y grows downward; rising fire uses a negative y drift.
    Drift(Vec2),

    /// Horizontal drift proportional to the pointer's offset from the
    /// viewport center: centered pointer means no wind, edges give `±max`.
    /// Falls back to zero while the pointer is absent.
    PointerWind {
        /// Wind at the viewport edge.
        max: f32,
    },

    /// Small uniform random acceleration in `[-amount, amount]` per axis,
    /// refreshed every frame. Gives fountains their flicker.
    Jitter {
        amount: f32,
    },
}

impl Force {
    /// This force's acceleration contribution for one point this frame.
    pub fn acceleration<R: Rng>(
        &self,
        point: &Point,
        pointer: Option<Vec2>,
        viewport: &Viewport,
        rng: &mut R,
    ) -> Vec2 {
        match self {
            Force::SpringToTarget { stiffness } => match point.rest_target {
                Some(target) => (target - point.position) * *stiffness,
                None => Vec2::ZERO,
            },

            Force::PointerRepel { radius, strength } => {
                let Some(pointer) = pointer else { return Vec2::ZERO };
                let away = point.position - pointer;
                let dist = away.length();
                if dist <= 0.0 || dist >= *radius {
                    return Vec2::ZERO;
                }
                let falloff = (*radius - dist) / *radius;
                (away / dist) * falloff * *strength
            }

            Force::PointerMagnet { radius, power, stiffness } => {
                let (Some(pointer), Some(target)) = (pointer, point.rest_target) else {
                    return Vec2::ZERO;
                };
                let dist = target.distance(pointer);
                if dist >= *radius {
                    return Vec2::ZERO;
                }
                let factor = (1.0 - dist / *radius) * *power;
                (pointer - target) * factor * *stiffness
            }

            Force::Drift(accel) => *accel,

            Force::PointerWind { max } => {
                let Some(pointer) = pointer else { return Vec2::ZERO };
                let half = viewport.width / 2.0;
                if half <= 0.0 {
                    return Vec2::ZERO;
                }
                let normalized = (pointer.x - half) / half;
                Vec2::new(normalized * *max, 0.0)
            }

            Force::Jitter { amount } => {
                if *amount <= 0.0 {
                    return Vec2::ZERO;
                }
                Vec2::new(
                    rng.gen_range(-*amount..*amount),
                    rng.gen_range(-*amount..*amount),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(1)
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_spring_pulls_toward_target() {
        let mut point = Point::anchored(Vec2::new(100.0, 100.0));
        point.position = Vec2::new(110.0, 100.0);

        let force = Force::SpringToTarget { stiffness: 0.1 };
        let a = force.acceleration(&point, None, &viewport(), &mut rng());
        assert!((a.x - (-1.0)).abs() < 1e-6);
        assert_eq!(a.y, 0.0);
    }

    #[test]
    fn test_spring_without_target_is_inert() {
        let point = Point::at(Vec2::new(5.0, 5.0));
        let force = Force::SpringToTarget { stiffness: 0.1 };
        assert_eq!(force.acceleration(&point, None, &viewport(), &mut rng()), Vec2::ZERO);
    }

    #[test]
    fn test_repel_points_away_and_falls_off() {
        let point = Point::at(Vec2::new(110.0, 100.0));
        let force = Force::PointerRepel { radius: 100.0, strength: 2.0 };

        let a = force.acceleration(&point, Some(Vec2::new(100.0, 100.0)), &viewport(), &mut rng());
        assert!(a.x > 0.0, "repulsion must push away from the pointer");
        assert_eq!(a.y, 0.0);
        // Linear falloff: (100 - 10)/100 * 2.0
        assert!((a.x - 1.8).abs() < 1e-5);

        // Outside the radius: nothing.
        let far = force.acceleration(&point, Some(Vec2::new(300.0, 100.0)), &viewport(), &mut rng());
        assert_eq!(far, Vec2::ZERO);
    }

    #[test]
    fn test_negative_strength_attracts() {
        let point = Point::at(Vec2::new(110.0, 100.0));
        let force = Force::PointerRepel { radius: 100.0, strength: -2.0 };
        let a = force.acceleration(&point, Some(Vec2::new(100.0, 100.0)), &viewport(), &mut rng());
        assert!(a.x < 0.0);
    }

    #[test]
    fn test_zero_distance_skips_repulsion() {
        let point = Point::at(Vec2::new(100.0, 100.0));
        let force = Force::PointerRepel { radius: 100.0, strength: 2.0 };
        let a = force.acceleration(&point, Some(Vec2::new(100.0, 100.0)), &viewport(), &mut rng());
        assert_eq!(a, Vec2::ZERO);
        assert!(a.x.is_finite() && a.y.is_finite());
    }

    #[test]
    fn test_pointer_absent_disables_pointer_forces() {
        let point = Point::anchored(Vec2::new(50.0, 50.0));
        for force in [
            Force::PointerRepel { radius: 100.0, strength: 2.0 },
            Force::PointerMagnet { radius: 100.0, power: 0.3, stiffness: 0.3 },
            Force::PointerWind { max: 0.2 },
        ] {
            assert_eq!(force.acceleration(&point, None, &viewport(), &mut rng()), Vec2::ZERO);
        }
    }

    #[test]
    fn test_magnet_bends_toward_pointer() {
        let point = Point::anchored(Vec2::new(100.0, 100.0));
        let force = Force::PointerMagnet { radius: 100.0, power: 0.3, stiffness: 1.0 };
        let a = force.acceleration(&point, Some(Vec2::new(150.0, 100.0)), &viewport(), &mut rng());
        // Half the radius away: factor = 0.5 * 0.3, over 50 units.
        assert!((a.x - 7.5).abs() < 1e-4);
        assert_eq!(a.y, 0.0);
    }

    #[test]
    fn test_wind_scales_with_center_offset() {
        let point = Point::at(Vec2::new(0.0, 0.0));
        let force = Force::PointerWind { max: 0.2 };
        let vp = viewport();

        let center = force.acceleration(&point, Some(vp.center()), &vp, &mut rng());
        assert!(center.x.abs() < 1e-6);

        let right_edge = force.acceleration(&point, Some(Vec2::new(800.0, 0.0)), &vp, &mut rng());
        assert!((right_edge.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let point = Point::at(Vec2::ZERO);
        let force = Force::Jitter { amount: 0.05 };
        let mut r = rng();
        for _ in 0..100 {
            let a = force.acceleration(&point, None, &viewport(), &mut r);
            assert!(a.x.abs() < 0.05 && a.y.abs() < 0.05);
        }
    }
}
