//! Constrained initial placement of points.
//!
//! Scatter placement uses rejection sampling: candidates are drawn uniformly
//! inside the viewport and accepted only if they keep the configured minimum
//! gap to every already-accepted position (with an optional tolerance for
//! allowed close neighbors). Two safeguards keep the loop bounded:
//!
//! - the requested count is halved until it fits the geometric packing bound
//!   `floor(area / gap²)`;
//! - sampling gives up after `count * 100` attempts and returns a shorter
//!   sequence. That is a documented degenerate case for dense configurations,
//!   not an error; callers shrink their population to match.
//!
//! Structured layouts (circle, grid, band) are deterministic and skip the
//! rejection loop entirely.

use crate::field::Viewport;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Attempts allowed when resampling a single recycled point.
const RECYCLE_ATTEMPTS: usize = 100;

/// Initial arrangement of a field's points.
#[derive(Clone, Debug)]
pub enum Layout {
    /// Randomly scattered points honoring the field's minimum gap.
    Scatter {
        /// Desired population. Clamped down to the packing bound at build.
        count: usize,
    },
    /// Evenly spaced points on a circle around the viewport center.
    Circle { radius: f32, count: usize },
    /// A rectangular lattice centered in the viewport.
    Grid { spacing: f32 },
    /// Positions come from the lifecycle's band parameters; nothing to place.
    Band,
    /// Start with no points (emitter-only population).
    Empty,
}

/// Geometric upper bound on how many points can keep `min_gap` separation
/// inside `viewport`: one point per gap-sized cell.
pub fn max_packable(viewport: &Viewport, min_gap: f32) -> usize {
    if min_gap <= 0.0 {
        return usize::MAX;
    }
    (viewport.area() / (min_gap * min_gap)).floor() as usize
}

/// Halve `desired` until it fits the packing bound.
///
/// Keeps expected rejection attempts bounded; e.g. `min_gap = 85` in a
/// 1000x800 viewport packs at most 110 points, so a request for 500 becomes
/// 250, then 125, then 62.
pub fn clamp_count(desired: usize, viewport: &Viewport, min_gap: f32) -> usize {
    let max = max_packable(viewport, min_gap);
    let mut count = desired;
    while count > max {
        count /= 2;
    }
    count
}

/// Whether `candidate` keeps the minimum gap, allowing up to `tolerance`
/// closer-than-gap neighbors.
pub fn is_valid_position(
    candidate: Vec2,
    existing: &[Vec2],
    min_gap: f32,
    tolerance: usize,
) -> bool {
    if min_gap <= 0.0 {
        return true;
    }
    let gap_sq = min_gap * min_gap;
    let mut close = 0;
    for pos in existing {
        if candidate.distance_squared(*pos) < gap_sq {
            close += 1;
            if close > tolerance {
                return false;
            }
        }
    }
    true
}

/// Rejection-sample up to `count` positions inside the viewport.
///
/// Returns fewer positions if the attempt budget (`count * 100`) runs out
/// before the count is reached. Callers must size their population from the
/// returned length, not from `count`.
pub fn place<R: Rng>(
    count: usize,
    viewport: &Viewport,
    min_gap: f32,
    tolerance: usize,
    rng: &mut R,
) -> Vec<Vec2> {
    let mut positions: Vec<Vec2> = Vec::with_capacity(count);
    let max_attempts = count * 100;
    let mut attempts = 0;
    while positions.len() < count && attempts < max_attempts {
        let candidate = random_position(viewport, rng);
        if is_valid_position(candidate, &positions, min_gap, tolerance) {
            positions.push(candidate);
        }
        attempts += 1;
    }
    positions
}

/// Sample one replacement position against the current live positions.
///
/// Used by recycle-in-place lifecycles. Returns `None` when the attempt
/// budget runs out; the caller falls back to an unconstrained position
/// rather than failing.
pub fn resample<R: Rng>(
    existing: &[Vec2],
    viewport: &Viewport,
    min_gap: f32,
    tolerance: usize,
    rng: &mut R,
) -> Option<Vec2> {
    for _ in 0..RECYCLE_ATTEMPTS {
        let candidate = random_position(viewport, rng);
        if is_valid_position(candidate, existing, min_gap, tolerance) {
            return Some(candidate);
        }
    }
    None
}

/// Uniformly random position inside the viewport.
pub fn random_position<R: Rng>(viewport: &Viewport, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.gen::<f32>() * viewport.width,
        rng.gen::<f32>() * viewport.height,
    )
}

impl Layout {
    /// Generate the layout's rest positions. `Band` and `Empty` return no
    /// positions; their points are produced elsewhere.
    pub fn positions<R: Rng>(
        &self,
        viewport: &Viewport,
        min_gap: f32,
        tolerance: usize,
        rng: &mut R,
    ) -> Vec<Vec2> {
        match self {
            Layout::Scatter { count } => {
                let count = clamp_count(*count, viewport, min_gap);
                place(count, viewport, min_gap, tolerance, rng)
            }
            Layout::Circle { radius, count } => {
                let center = viewport.center();
                (0..*count)
                    .map(|i| {
                        let angle = (i as f32 / *count as f32) * TAU;
                        center + Vec2::new(angle.cos(), angle.sin()) * *radius
                    })
                    .collect()
            }
            Layout::Grid { spacing } => {
                let cols = (viewport.width / spacing).floor() as usize + 1;
                let rows = (viewport.height / spacing).floor() as usize + 1;
                let grid_w = (cols - 1) as f32 * spacing;
                let grid_h = (rows - 1) as f32 * spacing;
                let origin = Vec2::new(
                    (viewport.width - grid_w) / 2.0,
                    (viewport.height - grid_h) / 2.0,
                );
                let mut positions = Vec::with_capacity(cols * rows);
                for row in 0..rows {
                    for col in 0..cols {
                        positions.push(
                            origin + Vec2::new(col as f32 * spacing, row as f32 * spacing),
                        );
                    }
                }
                positions
            }
            Layout::Band | Layout::Empty => Vec::new(),
        }
    }

    /// Whether the layout's points are anchored to a rest target.
    pub fn is_anchored(&self) -> bool {
        matches!(self, Layout::Circle { .. } | Layout::Grid { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_pairwise_separation() {
        let vp = Viewport::new(500.0, 500.0);
        let positions = place(40, &vp, 40.0, 0, &mut rng());
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert!(
                    positions[i].distance(positions[j]) >= 40.0,
                    "positions {} and {} violate the gap",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_tolerance_bounds_candidate_against_earlier_points() {
        // Acceptance counts a candidate's sub-gap neighbors among the
        // positions accepted before it; later candidates may still land near
        // an old point, so only the candidate-side count is bounded.
        let vp = Viewport::new(200.0, 200.0);
        let positions = place(60, &vp, 50.0, 1, &mut rng());
        let gap_sq = 50.0f32 * 50.0;
        for (i, a) in positions.iter().enumerate() {
            let close = positions[..i]
                .iter()
                .filter(|b| a.distance_squared(**b) < gap_sq)
                .count();
            assert!(close <= 1, "candidate {} saw {} close prior points", i, close);
        }
    }

    #[test]
    fn test_oversubscribed_request_terminates_short() {
        let vp = Viewport::new(100.0, 100.0);
        // Packing bound is floor(10000/2500) = 4; one more cannot fit.
        let requested = max_packable(&vp, 50.0) + 1;
        let positions = place(requested, &vp, 50.0, 0, &mut rng());
        assert!(positions.len() < requested);
    }

    #[test]
    fn test_clamp_count_halves_to_bound() {
        let vp = Viewport::new(1000.0, 800.0);
        assert_eq!(max_packable(&vp, 85.0), 110);
        assert_eq!(clamp_count(500, &vp, 85.0), 62);
        assert_eq!(clamp_count(100, &vp, 85.0), 100);
    }

    #[test]
    fn test_zero_gap_is_unconstrained() {
        let vp = Viewport::new(50.0, 50.0);
        let positions = place(200, &vp, 0.0, 0, &mut rng());
        assert_eq!(positions.len(), 200);
    }

    #[test]
    fn test_resample_respects_existing() {
        let vp = Viewport::new(300.0, 300.0);
        let existing = place(10, &vp, 60.0, 0, &mut rng());
        let replacement = resample(&existing, &vp, 60.0, 0, &mut rng()).unwrap();
        for pos in &existing {
            assert!(replacement.distance(*pos) >= 60.0);
        }
    }

    #[test]
    fn test_circle_layout_even_spacing() {
        let vp = Viewport::new(400.0, 400.0);
        let positions = Layout::Circle { radius: 100.0, count: 8 }
            .positions(&vp, 0.0, 0, &mut rng());
        assert_eq!(positions.len(), 8);
        let center = vp.center();
        for pos in &positions {
            assert!((pos.distance(center) - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_grid_layout_is_centered() {
        let vp = Viewport::new(105.0, 45.0);
        let positions = Layout::Grid { spacing: 20.0 }.positions(&vp, 0.0, 0, &mut rng());
        // 6 cols x 3 rows
        assert_eq!(positions.len(), 18);
        let min_x = positions.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = positions.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!((min_x - (105.0 - max_x)).abs() < 1e-3);
    }
}
