//! Error types for snowfall.
//!
//! Configuration problems are the only hard failures in this crate: they are
//! detected when a simulation is constructed and reported as a rejected
//! initialization. Everything after that is absorbed with fallback values.

use std::fmt;

/// Errors that reject a simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Gamma shape parameter must be a positive finite number.
    NonPositiveShape(f32),
    /// Gamma scale parameter must be a positive finite number.
    NonPositiveScale(f32),
    /// Diameter bounds must satisfy 0 < min <= max.
    DiameterBounds { min: f32, max: f32 },
    /// Spawn height must sit above the ground plane.
    SpawnBelowGround { spawn_height: f32, ground_z: f32 },
    /// Horizontal spawn half-extent must not be negative.
    NegativeDomainWidth(f32),
    /// A configuration field held NaN or infinity.
    NonFinite(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveShape(v) => {
                write!(f, "gamma shape must be positive, got {}", v)
            }
            ConfigError::NonPositiveScale(v) => {
                write!(f, "gamma scale must be positive, got {}", v)
            }
            ConfigError::DiameterBounds { min, max } => {
                write!(f, "diameter bounds must satisfy 0 < min <= max, got [{}, {}]", min, max)
            }
            ConfigError::SpawnBelowGround { spawn_height, ground_z } => {
                write!(
                    f,
                    "spawn height {} must be above the ground plane at {}",
                    spawn_height, ground_z
                )
            }
            ConfigError::NegativeDomainWidth(v) => {
                write!(f, "domain half-width must not be negative, got {}", v)
            }
            ConfigError::NonFinite(field) => {
                write!(f, "configuration field `{}` is not finite", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
