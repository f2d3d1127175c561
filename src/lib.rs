//! # Snowfall
//!
//! Continuous-time falling-snow particle simulation with statistically
//! grounded flake sizes.
//!
//! Flake diameters are drawn from a two-parameter gamma distribution through
//! its quantile function, fed by a low-discrepancy sequence so sizes cover
//! the spectrum evenly instead of clustering. Each diameter maps to a
//! terminal fall speed via an empirical drag power-law, and every tick the
//! pool integrates wind and fall speed, recycling flakes that cross the
//! ground plane. Rendering stays on the host side of the [`VfxBridge`]
//! trait.
//!
//! ## Quick Start
//!
//! ```ignore
//! use snowfall::prelude::*;
//!
//! let config = SnowfallConfig::default()
//!     .with_particle_count(300)
//!     .with_gamma(2.0, 1.0)
//!     .with_wind(Vec2::new(3.0, 0.0));
//!
//! let mut sim = Snowfall::new(config)?;
//!
//! // In your frame loop:
//! sim.advance(delta_time);
//! for flake in sim.particles() {
//!     // flake.position, flake.diameter, flake.speed
//! }
//! ```
//!
//! ## Design
//!
//! | Concern | Where |
//! |---------|-------|
//! | Low-discrepancy sampling | [`sampler::VanDerCorput`] |
//! | Gamma quantile (size model) | [`size::SizeDistribution`] |
//! | Drag power-law (fall speed) | [`velocity::terminal_speed`] |
//! | Pool + tick integration | [`Snowfall`] |
//! | Host rendering boundary | [`VfxBridge`] |
//!
//! The simulation is single-threaded by design: one `advance` per host frame,
//! no internal scheduling, no blocking. Configuration problems reject
//! initialization with a [`ConfigError`]; after that, every numerical fault
//! is absorbed with deterministic fallback values - a degraded flake is
//! always preferable to a halted tick loop.

pub mod bridge;
pub mod config;
mod error;
pub mod particle;
pub mod sampler;
pub mod size;
pub mod simulation;
pub mod velocity;

pub use bridge::{NullBridge, ParamValue, VfxBridge};
pub use config::SnowfallConfig;
pub use error::ConfigError;
pub use glam::{Vec2, Vec3};
pub use particle::{FlakeInstance, Particle};
pub use simulation::{Snowfall, MAX_DELTA_TIME, MIN_DELTA_TIME};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use snowfall::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bridge::{NullBridge, ParamValue, VfxBridge};
    pub use crate::config::SnowfallConfig;
    pub use crate::error::ConfigError;
    pub use crate::particle::{FlakeInstance, Particle};
    pub use crate::simulation::Snowfall;
    pub use crate::{Vec2, Vec3};
}
