//! Particle records.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One snowflake in the pool.
///
/// `speed` is always the terminal fall speed derived from `diameter`, except
/// inside the single-tick window where a respawn recomputes both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World-space position, mutated every tick.
    pub position: Vec3,
    /// Flake diameter, fixed at spawn and redrawn on respawn.
    pub diameter: f32,
    /// Terminal fall speed for `diameter`.
    pub speed: f32,
}

/// Per-flake snapshot record published to the visual effects bridge.
///
/// Tightly packed and `Pod` so a host renderer can upload the whole snapshot
/// with a single byte cast.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FlakeInstance {
    /// World-space position.
    pub position: Vec3,
    /// Flake diameter, a sizing hint for the renderer.
    pub diameter: f32,
    /// Terminal fall speed, a motion-blur/streak hint for the renderer.
    pub speed: f32,
}

impl From<&Particle> for FlakeInstance {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position,
            diameter: p.diameter,
            speed: p.speed,
        }
    }
}
