//! Simulation configuration.
//!
//! All tunable parameters live in one plain value, set once at construction
//! and read-only for the lifetime of the run. Use method chaining to adjust
//! the defaults:
//!
//! ```ignore
//! let config = SnowfallConfig::default()
//!     .with_particle_count(500)
//!     .with_gamma(2.0, 1.0)
//!     .with_wind(Vec2::new(3.0, 0.0));
//! ```

use glam::Vec2;

use crate::error::ConfigError;

/// Parameters for a snowfall simulation.
///
/// Validated by [`SnowfallConfig::validate`] when a simulation is built;
/// invalid parameters reject initialization rather than surfacing later.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowfallConfig {
    /// Gamma distribution shape parameter (> 0).
    pub shape: f32,
    /// Gamma distribution scale parameter (> 0).
    pub scale: f32,
    /// Soft lower size bound, used for domain sizing and as a rendering hint.
    /// The generator does not hard-clamp to it.
    pub min_diameter: f32,
    /// Soft upper size bound, same caveats as `min_diameter`.
    pub max_diameter: f32,
    /// Number of pool slots. Zero is a valid, empty simulation.
    pub particle_count: u32,
    /// Z coordinate at which new and respawned flakes appear.
    pub spawn_height: f32,
    /// Horizontal half-extent of the square spawn footprint.
    pub domain_width: f32,
    /// Horizontal wind velocity applied uniformly to every flake.
    pub wind: Vec2,
    /// Z threshold that triggers respawn.
    pub ground_z: f32,
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        Self {
            shape: 2.0,
            scale: 1.0,
            min_diameter: 0.1,
            max_diameter: 10.0,
            particle_count: 100,
            spawn_height: 1000.0,
            domain_width: 500.0,
            wind: Vec2::ZERO,
            ground_z: 0.0,
        }
    }
}

impl SnowfallConfig {
    /// Set the gamma distribution parameters.
    pub fn with_gamma(mut self, shape: f32, scale: f32) -> Self {
        self.shape = shape;
        self.scale = scale;
        self
    }

    /// Set the soft diameter bounds.
    pub fn with_diameter_bounds(mut self, min: f32, max: f32) -> Self {
        self.min_diameter = min;
        self.max_diameter = max;
        self
    }

    /// Set the number of pool slots.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the spawn height.
    pub fn with_spawn_height(mut self, z: f32) -> Self {
        self.spawn_height = z;
        self
    }

    /// Set the horizontal spawn half-extent.
    pub fn with_domain_width(mut self, half_extent: f32) -> Self {
        self.domain_width = half_extent;
        self
    }

    /// Set the wind velocity.
    pub fn with_wind(mut self, wind: Vec2) -> Self {
        self.wind = wind;
        self
    }

    /// Set the ground plane.
    pub fn with_ground_z(mut self, z: f32) -> Self {
        self.ground_z = z;
        self
    }

    /// Check every parameter, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (value, name) in [
            (self.shape, "shape"),
            (self.scale, "scale"),
            (self.min_diameter, "min_diameter"),
            (self.max_diameter, "max_diameter"),
            (self.spawn_height, "spawn_height"),
            (self.domain_width, "domain_width"),
            (self.wind.x, "wind.x"),
            (self.wind.y, "wind.y"),
            (self.ground_z, "ground_z"),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        if self.shape <= 0.0 {
            return Err(ConfigError::NonPositiveShape(self.shape));
        }
        if self.scale <= 0.0 {
            return Err(ConfigError::NonPositiveScale(self.scale));
        }
        if self.min_diameter <= 0.0 || self.min_diameter > self.max_diameter {
            return Err(ConfigError::DiameterBounds {
                min: self.min_diameter,
                max: self.max_diameter,
            });
        }
        if self.domain_width < 0.0 {
            return Err(ConfigError::NegativeDomainWidth(self.domain_width));
        }
        if self.spawn_height <= self.ground_z {
            return Err(ConfigError::SpawnBelowGround {
                spawn_height: self.spawn_height,
                ground_z: self.ground_z,
            });
        }
        Ok(())
    }
}
