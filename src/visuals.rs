//! Mapping simulation state to per-point render attributes.
//!
//! Every frame the simulator derives an opacity, size, and color for each
//! point from its depth, age, and distance to the pointer. Opacity factors
//! multiply together and the product is clamped to `[0, 1]`; sizes clamp to
//! their configured endpoints; colors interpolate per channel.
//!
//! ```ignore
//! let visuals = VisualConfig::new()
//!     .master_opacity(0.5)
//!     .depth_opacity(0.2..1.0, 0.5..1.0)
//!     .pointer_opacity(200.0, 1.0, 0.2)
//!     .size(SizeMapping::DepthScale { base: 3.0 });
//! ```

use crate::field::{Point, Viewport};
use glam::{Vec2, Vec3};
use std::ops::Range;

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Bilinear interpolation over four corner values, `u` horizontal and
/// `v` vertical, both clamped.
pub(crate) fn bilerp(tl: f32, tr: f32, bl: f32, br: f32, u: f32, v: f32) -> f32 {
    lerp(lerp(tl, tr, u), lerp(bl, br, u), v)
}

fn lerp_rgb(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Maps a normalized value from `range` onto `[0, 1]`. Degenerate ranges
/// collapse to the low end.
fn unlerp(range: &Range<f32>, value: f32) -> f32 {
    let span = range.end - range.start;
    if span.abs() <= f32::EPSILON {
        0.0
    } else {
        ((value - range.start) / span).clamp(0.0, 1.0)
    }
}

/// How a point's rendered size is derived.
#[derive(Clone, Debug)]
pub enum SizeMapping {
    /// Same size for every point.
    Fixed(f32),
    /// `base · depth`: nearer points draw larger.
    DepthScale { base: f32 },
    /// Interpolate from `start` to `end` over the point's lifetime.
    AgeLerp { start: f32, end: f32 },
    /// Use the size the emitter (or lifecycle growth) gave the point.
    Spawned,
}

/// How a point's color is derived.
#[derive(Clone, Debug)]
pub enum ColorMapping {
    Fixed(Vec3),
    /// Interpolate across `depth_range`: `far` at its low end, `near` at its
    /// high end. Depth grows toward the viewer, matching
    /// [`SizeMapping::DepthScale`].
    DepthLerp { near: Vec3, far: Vec3, depth_range: Range<f32> },
    /// Interpolate from `start` to `end` over the point's lifetime.
    AgeLerp { start: Vec3, end: Vec3 },
    /// Blend four corner colors bilinearly by the point's viewport position.
    BilinearCorners { tl: Vec3, tr: Vec3, bl: Vec3, br: Vec3 },
}

/// Pointer proximity opacity factor.
#[derive(Clone, Debug)]
struct PointerOpacity {
    distance: f32,
    at_zero: f32,
    far: f32,
}

/// Depth range to opacity range mapping.
#[derive(Clone, Debug)]
struct DepthOpacity {
    depth: Range<f32>,
    opacity: Range<f32>,
}

/// Corner opacities blended bilinearly by viewport position.
#[derive(Clone, Debug)]
struct CornerOpacity {
    tl: f32,
    tr: f32,
    bl: f32,
    br: f32,
}

/// Resolved render attributes for one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visual {
    pub opacity: f32,
    pub size: f32,
    pub color: Vec3,
}

/// Attribute mapping configuration, consumed builder-style.
#[derive(Clone, Debug)]
pub struct VisualConfig {
    master_opacity: f32,
    depth_opacity: Option<DepthOpacity>,
    pointer_opacity: Option<PointerOpacity>,
    age_fade: Option<Range<f32>>,
    corner_opacity: Option<CornerOpacity>,
    size: SizeMapping,
    color: ColorMapping,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualConfig {
    pub fn new() -> Self {
        Self {
            master_opacity: 1.0,
            depth_opacity: None,
            pointer_opacity: None,
            age_fade: None,
            corner_opacity: None,
            size: SizeMapping::Fixed(2.0),
            color: ColorMapping::Fixed(Vec3::ONE),
        }
    }

    /// Baseline opacity factor applied to every point.
    pub fn master_opacity(mut self, opacity: f32) -> Self {
        self.master_opacity = opacity;
        self
    }

    /// Map a point's depth across `depth` onto an opacity in `opacity`.
    pub fn depth_opacity(mut self, depth: Range<f32>, opacity: Range<f32>) -> Self {
        self.depth_opacity = Some(DepthOpacity { depth, opacity });
        self
    }

    /// Opacity factor by pointer distance: `at_zero` under the pointer,
    /// `far` at or beyond `distance`, linear between. A factor above 1
    /// brightens; with the pointer absent every point uses `far`.
    pub fn pointer_opacity(mut self, distance: f32, at_zero: f32, far: f32) -> Self {
        self.pointer_opacity = Some(PointerOpacity { distance, at_zero, far });
        self
    }

    /// Fade opacity from `fade.start` to `fade.end` over the point's lifetime.
    pub fn age_fade(mut self, fade: Range<f32>) -> Self {
        self.age_fade = Some(fade);
        self
    }

    /// Opacity blended bilinearly from four corner values by the point's
    /// position within the viewport.
    pub fn corner_opacity(mut self, tl: f32, tr: f32, bl: f32, br: f32) -> Self {
        self.corner_opacity = Some(CornerOpacity { tl, tr, bl, br });
        self
    }

    pub fn size(mut self, size: SizeMapping) -> Self {
        self.size = size;
        self
    }

    pub fn color(mut self, color: ColorMapping) -> Self {
        self.color = color;
        self
    }

    /// Resolve the render attributes for one point.
    pub fn visual_for(&self, point: &Point, pointer: Option<Vec2>, viewport: &Viewport) -> Visual {
        let mut opacity = self.master_opacity;

        if let Some(d) = &self.depth_opacity {
            let t = unlerp(&d.depth, point.depth);
            opacity *= lerp(d.opacity.start, d.opacity.end, t);
        }

        if let Some(p) = &self.pointer_opacity {
            let factor = match pointer {
                Some(pointer) if p.distance > 0.0 => {
                    let t = (point.position.distance(pointer) / p.distance).min(1.0);
                    lerp(p.at_zero, p.far, t)
                }
                _ => p.far,
            };
            opacity *= factor;
        }

        if let Some(fade) = &self.age_fade {
            opacity *= lerp(fade.start, fade.end, point.age_progress());
        }

        if let Some(c) = &self.corner_opacity {
            let u = if viewport.width > 0.0 { point.position.x / viewport.width } else { 0.0 };
            let v = if viewport.height > 0.0 { point.position.y / viewport.height } else { 0.0 };
            opacity *= bilerp(c.tl, c.tr, c.bl, c.br, u, v);
        }

        let size = match &self.size {
            SizeMapping::Fixed(size) => *size,
            SizeMapping::DepthScale { base } => base * point.depth,
            SizeMapping::AgeLerp { start, end } => {
                lerp(*start, *end, point.age_progress()).clamp(start.min(*end), start.max(*end))
            }
            SizeMapping::Spawned => point.size,
        };

        let color = match &self.color {
            ColorMapping::Fixed(color) => *color,
            ColorMapping::DepthLerp { near, far, depth_range } => {
                lerp_rgb(*far, *near, unlerp(depth_range, point.depth))
            }
            ColorMapping::AgeLerp { start, end } => lerp_rgb(*start, *end, point.age_progress()),
            ColorMapping::BilinearCorners { tl, tr, bl, br } => {
                let u = if viewport.width > 0.0 { point.position.x / viewport.width } else { 0.0 };
                let v = if viewport.height > 0.0 { point.position.y / viewport.height } else { 0.0 };
                let top = lerp_rgb(*tl, *tr, u);
                let bottom = lerp_rgb(*bl, *br, u);
                lerp_rgb(top, bottom, v)
            }
        };

        Visual { opacity: opacity.clamp(0.0, 1.0), size: size.max(0.0), color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(400.0, 300.0)
    }

    #[test]
    fn test_opacity_factors_multiply() {
        let config = VisualConfig::new()
            .master_opacity(0.5)
            .depth_opacity(0.0..1.0, 0.5..1.0)
            .pointer_opacity(200.0, 1.0, 0.2);
        let mut point = Point::at(Vec2::new(100.0, 100.0));
        point.depth = 1.0;

        // Pointer on top of the point: 0.5 * 1.0 * 1.0.
        let v = config.visual_for(&point, Some(point.position), &viewport());
        assert!((v.opacity - 0.5).abs() < 1e-6);

        // Pointer absent: far factor applies, 0.5 * 1.0 * 0.2.
        let v = config.visual_for(&point, None, &viewport());
        assert!((v.opacity - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_boost_clamps_at_one() {
        let config = VisualConfig::new().pointer_opacity(150.0, 1.5, 1.0);
        let point = Point::at(Vec2::new(50.0, 50.0));
        let v = config.visual_for(&point, Some(point.position), &viewport());
        assert_eq!(v.opacity, 1.0, "product clamps to [0, 1]");
    }

    #[test]
    fn test_pointer_opacity_linear_falloff() {
        let config = VisualConfig::new().pointer_opacity(200.0, 1.0, 0.2);
        let point = Point::at(Vec2::new(100.0, 100.0));
        // Halfway out: 1.0 + (0.2 - 1.0) * 0.5 = 0.6.
        let v = config.visual_for(&point, Some(Vec2::new(200.0, 100.0)), &viewport());
        assert!((v.opacity - 0.6).abs() < 1e-6);
        // At and beyond the radius: the far value.
        let v = config.visual_for(&point, Some(Vec2::new(350.0, 100.0)), &viewport());
        assert!((v.opacity - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_depth_opacity_maps_range() {
        let config = VisualConfig::new().depth_opacity(0.2..1.0, 0.5..1.0);
        let mut point = Point::at(Vec2::new(10.0, 10.0));
        point.depth = 0.2;
        assert!((config.visual_for(&point, None, &viewport()).opacity - 0.5).abs() < 1e-6);
        point.depth = 1.0;
        assert!((config.visual_for(&point, None, &viewport()).opacity - 1.0).abs() < 1e-6);
        // Below the range clamps, never extrapolates.
        point.depth = 0.0;
        assert!((config.visual_for(&point, None, &viewport()).opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_age_fade() {
        let config = VisualConfig::new().age_fade(1.0..0.0);
        let mut point = Point::at(Vec2::ZERO);
        point.lifespan = 100;
        point.age = 0;
        assert_eq!(config.visual_for(&point, None, &viewport()).opacity, 1.0);
        point.age = 50;
        let v = config.visual_for(&point, None, &viewport());
        assert!((v.opacity - 0.5).abs() < 1e-6);
        point.age = 100;
        assert_eq!(config.visual_for(&point, None, &viewport()).opacity, 0.0);
    }

    #[test]
    fn test_corner_opacity_bilinear() {
        let config = VisualConfig::new().corner_opacity(1.0, 0.0, 0.0, 1.0);
        let vp = viewport();
        let at = |x, y| {
            config
                .visual_for(&Point::at(Vec2::new(x, y)), None, &vp)
                .opacity
        };
        assert!((at(0.0, 0.0) - 1.0).abs() < 1e-6);
        assert!((at(400.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((at(400.0, 300.0) - 1.0).abs() < 1e-6);
        // Center averages all four corners.
        assert!((at(200.0, 150.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_size_mappings() {
        let mut point = Point::at(Vec2::ZERO);
        point.depth = 0.5;
        point.size = 7.0;
        point.lifespan = 10;
        point.age = 5;
        let vp = viewport();

        let v = VisualConfig::new().size(SizeMapping::DepthScale { base: 3.0 });
        assert!((v.visual_for(&point, None, &vp).size - 1.5).abs() < 1e-6);

        let v = VisualConfig::new().size(SizeMapping::AgeLerp { start: 20.0, end: 2.0 });
        assert!((v.visual_for(&point, None, &vp).size - 11.0).abs() < 1e-6);

        let v = VisualConfig::new().size(SizeMapping::Spawned);
        assert_eq!(v.visual_for(&point, None, &vp).size, 7.0);
    }

    #[test]
    fn test_color_depth_lerp_direction() {
        let near = Vec3::new(1.0, 0.8, 0.0);
        let far = Vec3::new(0.13, 0.13, 0.13);
        let config = VisualConfig::new().color(ColorMapping::DepthLerp {
            near,
            far,
            depth_range: 0.0..1.0,
        });
        let mut point = Point::at(Vec2::ZERO);

        // Low depth is far from the viewer and must take the far color.
        point.depth = 0.0;
        let c = config.visual_for(&point, None, &viewport()).color;
        assert!((c - far).abs().max_element() < 1e-6);
        // High depth is closest and must take the near color.
        point.depth = 1.0;
        let c = config.visual_for(&point, None, &viewport()).color;
        assert!((c - near).abs().max_element() < 1e-6);
        point.depth = 0.5;
        let mid = config.visual_for(&point, None, &viewport()).color;
        assert!((mid.x - 0.565).abs() < 1e-3);
        assert!((mid.z - 0.065).abs() < 1e-3);
    }

    #[test]
    fn test_color_bilinear_corners() {
        let config = VisualConfig::new().color(ColorMapping::BilinearCorners {
            tl: Vec3::new(1.0, 0.0, 0.0),
            tr: Vec3::new(0.0, 1.0, 0.0),
            bl: Vec3::new(0.0, 0.0, 1.0),
            br: Vec3::new(1.0, 1.0, 1.0),
        });
        let vp = viewport();
        let corner = config
            .visual_for(&Point::at(Vec2::ZERO), None, &vp)
            .color;
        assert_eq!(corner, Vec3::new(1.0, 0.0, 0.0));
        let center = config
            .visual_for(&Point::at(Vec2::new(200.0, 150.0)), None, &vp)
            .color;
        assert_eq!(center, Vec3::new(0.5, 0.5, 0.5));
    }
}
