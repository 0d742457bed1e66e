//! # pointfield
//!
//! Pointer-driven point field simulations made easy.
//!
//! `pointfield` animates populations of 2D points (starfields, dotted
//! waves, fire fountains, bubbles, soft blobs, magnetic grids, tunnels)
//! under a small set of composable pieces. The simulation is pure data in,
//! data out: feed it pointer events and a viewport, step it once per frame,
//! and draw the snapshot with whatever renderer you have.
//!
//! ## Quick start
//!
//! ```ignore
//! use pointfield::prelude::*;
//!
//! let mut sim = Simulation::new(1280.0, 720.0)
//!     .with_layout(Layout::Scatter { count: 200 })
//!     .with_min_gap(85.0, 0)
//!     .with_force(Force::PointerRepel { radius: 200.0, strength: 1.5 })
//!     .with_friction(0.85)
//!     .build()?;
//!
//! // Per frame:
//! sim.set_pointer(Some(Vec2::new(640.0, 360.0)));
//! let frame = sim.step();
//! for point in &frame.points {
//!     draw_dot(point.position, point.size, point.opacity, point.color);
//! }
//! ```
//!
//! Or start from a ready-made variant and tweak it:
//!
//! ```ignore
//! let mut sim = pointfield::Simulation::starfield(1280.0, 720.0)
//!     .with_seed(7)
//!     .build()?;
//! ```
//!
//! ## Concepts
//!
//! | Piece | What it decides |
//! |-------|-----------------|
//! | [`Layout`](placement::Layout) | Where points start (scatter, circle, grid, band) |
//! | [`Force`](forces::Force) | Per-point acceleration (springs, pointer repulsion, drift) |
//! | [`Integrator`](integrator::Integrator) | How velocity and position advance under friction |
//! | [`Lifecycle`](lifecycle::Lifecycle) | How the population evolves (recycle, spawn/expire, band) |
//! | [`VisualConfig`](visuals::VisualConfig) | Opacity, size, and color derived per frame |
//! | [`Simulation`](simulation::Simulation) | The builder tying it all together |
//!
//! Every step is a fixed timestep; drive the loop at whatever rate suits
//! your display. Seed the RNG with
//! [`with_seed`](simulation::Simulation::with_seed) when you need
//! reproducible runs.

pub mod emitter;
pub mod error;
pub mod field;
pub mod forces;
pub mod input;
pub mod integrator;
pub mod lifecycle;
pub mod placement;
pub mod simulation;
pub mod spatial;
pub mod time;
pub mod visuals;

pub use error::ConfigError;
pub use simulation::{FrameSnapshot, RenderLink, RenderPoint, Simulation, Simulator};

/// Everything needed to configure and run a simulation.
pub mod prelude {
    pub use crate::emitter::Emitter;
    pub use crate::error::ConfigError;
    pub use crate::field::{Point, PointField, Viewport};
    pub use crate::forces::Force;
    pub use crate::input::Pointer;
    pub use crate::lifecycle::Lifecycle;
    pub use crate::placement::Layout;
    pub use crate::simulation::{
        FieldDrive, FrameSnapshot, RenderLink, RenderPoint, Simulation, Simulator,
    };
    pub use crate::time::Time;
    pub use crate::visuals::{ColorMapping, SizeMapping, Visual, VisualConfig};
    pub use glam::{Vec2, Vec3};
}
