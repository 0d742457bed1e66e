//! Point and field data model.
//!
//! A [`PointField`] owns the full population of [`Point`]s for one effect
//! plus its [`Viewport`]. The field is rebuilt wholesale on resize since
//! every spatial constraint (gap, bounds, rest layout) is viewport-relative.
//!
//! Points carry only authoritative simulation state. Visual attributes
//! (opacity, size, color) are derived every frame by
//! [`VisualConfig`](crate::visuals::VisualConfig) and never stored here.

use glam::Vec2;

/// Viewport dimensions in canvas/world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Total area, used for the packing upper bound in placement.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a position lies inside the viewport, allowing `overflow`
    /// units of slack on every edge.
    #[inline]
    pub fn contains(&self, position: Vec2, overflow: f32) -> bool {
        position.x >= -overflow
            && position.x <= self.width + overflow
            && position.y >= -overflow
            && position.y <= self.height + overflow
    }
}

/// One simulated point: star, dot, bubble, fire particle, blob vertex, grid ball.
///
/// The meaning of `depth` and `age` varies by field variant: starfields and
/// tunnels use `depth` as a z-scale, spawn/expire fields count frames in
/// `age`, structured grids use neither.
#[derive(Clone, Debug)]
pub struct Point {
    /// Current position in viewport coordinates (y grows downward).
    pub position: Vec2,
    /// Per-frame velocity, mutated by the integrator.
    pub velocity: Vec2,
    /// Home position the point is elastically pulled toward, if any.
    pub rest_target: Option<Vec2>,
    /// Depth scale for starfield/tunnel variants. Monotonic until recycled.
    pub depth: f32,
    /// Frames lived, for spawn/expire variants. Monotonic until retirement.
    pub age: u32,
    /// Frames this point gets to live (0 = unbounded).
    pub lifespan: u32,
    /// Spawn-time size, mutated only by lifecycle growth.
    pub size: f32,
    /// Fixed coordinate on the streaming band's infinite 1D axis.
    pub band_base: f32,
}

impl Point {
    /// A point at rest at `position` with no target, depth, or age.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rest_target: None,
            depth: 0.0,
            age: 0,
            lifespan: 0,
            size: 0.0,
            band_base: 0.0,
        }
    }

    /// A point anchored to a rest target it starts on.
    pub fn anchored(target: Vec2) -> Self {
        Self {
            rest_target: Some(target),
            ..Self::at(target)
        }
    }

    /// Age progress normalized to `[0, 1]`, or 0 for unbounded points.
    #[inline]
    pub fn age_progress(&self) -> f32 {
        if self.lifespan == 0 {
            0.0
        } else {
            (self.age as f32 / self.lifespan as f32).clamp(0.0, 1.0)
        }
    }
}

/// The owned point population for one field, plus band scroll state.
#[derive(Clone, Debug)]
pub struct PointField {
    pub points: Vec<Point>,
    pub viewport: Viewport,
    /// Streaming band scroll offset. Advances (and wraps) per frame for
    /// band-lifecycle fields, unused otherwise.
    pub offset: f32,
}

impl PointField {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            points: Vec::new(),
            viewport,
            offset: 0.0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positions of every point except the one at `skip`, for min-gap checks
    /// when resampling a recycled point against the live population.
    pub fn positions_except(&self, skip: usize) -> Vec<Vec2> {
        self.points
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, p)| p.position)
            .collect()
    }
}
