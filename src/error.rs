//! Error types for pointfield.
//!
//! Runtime simulation never fails: degenerate conditions (unplaceable points,
//! absent pointer, zero distances) are handled by policy, not by errors. The
//! only fallible operation is building a simulator from an invalid
//! configuration.

use std::fmt;

/// Errors produced when validating a simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Friction factor must lie strictly between 0 and 1.
    FrictionOutOfRange(f32),
    /// Viewport width and height must both be positive.
    EmptyViewport { width: f32, height: f32 },
    /// Minimum placement gap must not be negative.
    NegativeGap(f32),
    /// Streaming band spacing must be positive.
    ZeroSpacing,
    /// Streaming band wavelength must be positive.
    ZeroWavelength,
    /// Spawn/expire lifetime must be at least one frame.
    ZeroLifetime,
    /// Spawn/expire population cap must be at least one.
    ZeroPopulation,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FrictionOutOfRange(v) => {
                write!(f, "Friction factor must be in (0, 1), got {}", v)
            }
            ConfigError::EmptyViewport { width, height } => {
                write!(f, "Viewport must have positive area, got {}x{}", width, height)
            }
            ConfigError::NegativeGap(v) => {
                write!(f, "Minimum gap must not be negative, got {}", v)
            }
            ConfigError::ZeroSpacing => write!(f, "Band spacing must be positive"),
            ConfigError::ZeroWavelength => write!(f, "Band wavelength must be positive"),
            ConfigError::ZeroLifetime => write!(f, "Point lifetime must be at least 1 frame"),
            ConfigError::ZeroPopulation => write!(f, "Population cap must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
