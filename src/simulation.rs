//! Particle pool and per-tick simulation step.
//!
//! [`Snowfall`] owns everything: the pool, the low-discrepancy sampler, the
//! size distribution, and the bridge to the host's renderer. The host drives
//! it with one [`Snowfall::advance`] call per frame.
//!
//! # Example
//!
//! ```ignore
//! use snowfall::prelude::*;
//!
//! let config = SnowfallConfig::default()
//!     .with_particle_count(200)
//!     .with_wind(Vec2::new(3.0, 0.0));
//!
//! let mut sim = Snowfall::new(config)?;
//! loop {
//!     sim.advance(1.0 / 60.0);
//! }
//! ```

use glam::Vec3;
use log::{debug, trace, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::bridge::{NullBridge, VfxBridge};
use crate::config::SnowfallConfig;
use crate::error::ConfigError;
use crate::particle::{FlakeInstance, Particle};
use crate::sampler::VanDerCorput;
use crate::size::{SizeDistribution, FALLBACK_DIAMETER};
use crate::velocity::terminal_speed;

/// Shortest frame time integrated per tick.
pub const MIN_DELTA_TIME: f32 = 1.0 / 60.0;

/// Longest frame time integrated per tick. Larger host deltas (stalls,
/// debugger pauses) are clamped here so flakes cannot tunnel arbitrarily far
/// past the ground plane in one step.
pub const MAX_DELTA_TIME: f32 = 1.0 / 30.0;

/// A snowfall simulation: fixed-capacity flake pool plus the spawn pipeline.
///
/// The pool is created fully populated, mutated in place every tick, and
/// never resized. Slots are recycled forever; no flake is ever removed.
pub struct Snowfall {
    config: SnowfallConfig,
    size: SizeDistribution,
    sampler: VanDerCorput,
    rng: SmallRng,
    particles: Vec<Particle>,
    snapshot: Vec<FlakeInstance>,
    bridge: Box<dyn VfxBridge>,
    ticks: u64,
}

impl Snowfall {
    /// Build a simulation with no renderer attached.
    ///
    /// Rejects invalid configurations; a rejected simulation never starts.
    pub fn new(config: SnowfallConfig) -> Result<Self, ConfigError> {
        Self::with_bridge(config, Box::new(NullBridge))
    }

    /// Build a simulation publishing to the given bridge.
    ///
    /// Spawn-independent constants (flake count, size bounds, wind) are
    /// mirrored into the bridge once, here.
    pub fn with_bridge(
        config: SnowfallConfig,
        mut bridge: Box<dyn VfxBridge>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = SizeDistribution::new(config.shape, config.scale)?;
        let mut sampler = VanDerCorput::new();
        let mut rng = SmallRng::from_entropy();

        let count = config.particle_count as usize;
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let (diameter, speed) = draw_flake(&mut sampler, &size);
            particles.push(Particle {
                position: Vec3::new(
                    random_in_extent(&mut rng, config.domain_width),
                    random_in_extent(&mut rng, config.domain_width),
                    config.spawn_height,
                ),
                diameter,
                speed,
            });
        }

        bridge.set_parameter("flake_count", config.particle_count.into());
        bridge.set_parameter("min_diameter", config.min_diameter.into());
        bridge.set_parameter("max_diameter", config.max_diameter.into());
        bridge.set_parameter("wind", config.wind.into());

        debug!(
            "snowfall initialized: {} flakes, gamma({}, {}), spawn z {}, ground z {}",
            config.particle_count, config.shape, config.scale, config.spawn_height, config.ground_z
        );

        Ok(Self {
            size,
            sampler,
            rng,
            snapshot: Vec::with_capacity(count),
            particles,
            bridge,
            config,
            ticks: 0,
        })
    }

    /// Advance every flake by one frame.
    ///
    /// A non-positive (or NaN) `delta_time` is a no-op. Positive values are
    /// clamped into [[`MIN_DELTA_TIME`], [`MAX_DELTA_TIME`]] before
    /// integrating. After all slots are updated the full snapshot goes to the
    /// bridge; nothing in this path can fail.
    pub fn advance(&mut self, delta_time: f32) {
        if !(delta_time > 0.0) {
            return;
        }
        let dt = delta_time.clamp(MIN_DELTA_TIME, MAX_DELTA_TIME);
        trace!("tick {}: dt {}", self.ticks, dt);

        let wind = self.config.wind;
        let ground_z = self.config.ground_z;
        let spawn_height = self.config.spawn_height;
        let domain_width = self.config.domain_width;

        let Self {
            particles,
            sampler,
            size,
            rng,
            ..
        } = self;

        for p in particles.iter_mut() {
            // A corrupted slot is re-placed with fallback values; siblings
            // and the tick itself are unaffected.
            if !p.position.is_finite() || !p.speed.is_finite() {
                warn!("non-finite flake state {:?}, re-placing with fallback size", p);
                p.position = Vec3::new(
                    random_in_extent(rng, domain_width),
                    random_in_extent(rng, domain_width),
                    spawn_height,
                );
                p.diameter = FALLBACK_DIAMETER;
                p.speed = terminal_speed(FALLBACK_DIAMETER);
                continue;
            }

            p.position.x += wind.x * dt;
            p.position.y += wind.y * dt;
            p.position.z -= p.speed * dt;

            // Ties count as crossed: a flake exactly on the ground plane
            // respawns this tick, never lingering below for two ticks.
            // Horizontal position is kept so wind drift accumulates
            // independently of recycling.
            if p.position.z <= ground_z {
                let (diameter, speed) = draw_flake(sampler, size);
                p.position.z = spawn_height;
                p.diameter = diameter;
                p.speed = speed;
            }
        }

        self.snapshot.clear();
        self.snapshot.extend(self.particles.iter().map(FlakeInstance::from));
        self.bridge.publish(&self.snapshot);
        self.ticks += 1;
    }

    /// Read access to the pool.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The configuration this simulation was built with.
    #[inline]
    pub fn config(&self) -> &SnowfallConfig {
        &self.config
    }

    /// Completed ticks (no-op calls excluded).
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Draw a diameter and its terminal speed through the spawn pipeline.
///
/// Absorbs every numerical fault: an unusable draw yields the fallback
/// diameter and its derived speed.
fn draw_flake(sampler: &mut VanDerCorput, size: &SizeDistribution) -> (f32, f32) {
    let diameter = size.diameter(sampler.next());
    let speed = terminal_speed(diameter);
    if diameter.is_finite() && speed.is_finite() {
        (diameter, speed)
    } else {
        warn!("unusable flake draw (d {diameter}, v {speed}), substituting fallback");
        (FALLBACK_DIAMETER, terminal_speed(FALLBACK_DIAMETER))
    }
}

/// Uniform coordinate over [-half_extent, half_extent].
fn random_in_extent(rng: &mut SmallRng, half_extent: f32) -> f32 {
    if half_extent > 0.0 {
        rng.gen_range(-half_extent..half_extent)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn quiet_config(count: u32) -> SnowfallConfig {
        SnowfallConfig::default()
            .with_particle_count(count)
            .with_spawn_height(100.0)
            .with_domain_width(50.0)
    }

    #[test]
    fn test_pool_fully_populated_at_start() {
        let sim = Snowfall::new(quiet_config(64)).unwrap();
        assert_eq!(sim.particles().len(), 64);
        for p in sim.particles() {
            assert_eq!(p.position.z, 100.0);
            assert!((-50.0..50.0).contains(&p.position.x));
            assert!((-50.0..50.0).contains(&p.position.y));
            assert!(p.diameter > 0.0);
            assert!(p.speed > 0.0);
        }
    }

    #[test]
    fn test_speed_matches_diameter_invariant() {
        let mut sim = Snowfall::new(quiet_config(32)).unwrap();
        for _ in 0..500 {
            sim.advance(1.0 / 60.0);
            for p in sim.particles() {
                assert_eq!(p.speed, terminal_speed(p.diameter));
            }
        }
    }

    #[test]
    fn test_pool_never_resizes() {
        let mut sim = Snowfall::new(quiet_config(16)).unwrap();
        for _ in 0..1000 {
            sim.advance(1.0 / 30.0);
            assert_eq!(sim.particles().len(), 16);
        }
    }

    #[test]
    fn test_zero_or_negative_delta_is_noop() {
        let mut sim = Snowfall::new(quiet_config(8)).unwrap();
        let before: Vec<_> = sim.particles().to_vec();
        sim.advance(0.0);
        sim.advance(-1.0);
        sim.advance(f32::NAN);
        assert_eq!(sim.particles(), &before[..]);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_extreme_delta_clamps_to_max() {
        let config = quiet_config(8).with_wind(Vec2::new(6.0, -3.0));
        let mut sim = Snowfall::new(config).unwrap();
        let before: Vec<_> = sim.particles().to_vec();

        // A 10-second host stall integrates exactly like the clamp ceiling.
        sim.advance(10.0);
        for (p, prev) in sim.particles().iter().zip(&before) {
            assert!((p.position.x - (prev.position.x + 6.0 * MAX_DELTA_TIME)).abs() < 1e-4);
            assert!((p.position.y - (prev.position.y - 3.0 * MAX_DELTA_TIME)).abs() < 1e-4);
            assert!((p.position.z - (prev.position.z - prev.speed * MAX_DELTA_TIME)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_tiny_delta_clamps_to_min() {
        let mut sim = Snowfall::new(quiet_config(4)).unwrap();
        let before: Vec<_> = sim.particles().to_vec();
        sim.advance(1e-9);
        for (p, prev) in sim.particles().iter().zip(&before) {
            let expected = prev.position.z - prev.speed * MIN_DELTA_TIME;
            assert!((p.position.z - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_corrupted_slot_is_replaced_with_fallback() {
        let mut sim = Snowfall::new(quiet_config(4)).unwrap();
        sim.particles[0].position.z = f32::NAN;
        sim.particles[1].speed = f32::INFINITY;
        sim.advance(1.0 / 60.0);

        for p in sim.particles().iter().take(2) {
            assert!(p.position.is_finite());
            assert_eq!(p.diameter, FALLBACK_DIAMETER);
            assert_eq!(p.speed, terminal_speed(FALLBACK_DIAMETER));
            assert_eq!(p.position.z, 100.0);
        }
        // Sibling slots ticked normally.
        for p in sim.particles().iter().skip(2) {
            assert!(p.position.z < 100.0);
        }
    }

    #[test]
    fn test_zero_domain_width_spawns_on_axis() {
        let config = quiet_config(8).with_domain_width(0.0);
        let sim = Snowfall::new(config).unwrap();
        for p in sim.particles() {
            assert_eq!(p.position.x, 0.0);
            assert_eq!(p.position.y, 0.0);
        }
    }

    #[test]
    fn test_rejected_config_does_not_start() {
        let config = quiet_config(8).with_gamma(-1.0, 1.0);
        assert!(Snowfall::new(config).is_err());
    }
}
