//! Visual effects bridge.
//!
//! The simulation does not render. Each tick it hands the full particle
//! snapshot to a [`VfxBridge`] implementation supplied by the host, and at
//! start-up it mirrors a few spawn-independent constants through
//! [`VfxBridge::set_parameter`]. Both calls are best-effort: the core relies
//! on no return value, and an inert bridge degrades visuals, never the tick.
//!
//! # Example
//!
//! ```ignore
//! struct PrintBridge;
//!
//! impl VfxBridge for PrintBridge {
//!     fn set_parameter(&mut self, name: &str, value: ParamValue) {
//!         println!("{name} = {value:?}");
//!     }
//!     fn publish(&mut self, flakes: &[FlakeInstance]) {
//!         println!("{} flakes", flakes.len());
//!     }
//! }
//!
//! let sim = Snowfall::with_bridge(SnowfallConfig::default(), Box::new(PrintBridge))?;
//! ```

use glam::{Vec2, Vec3};

use crate::particle::FlakeInstance;

/// Typed value for a named rendering parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    F32(f32),
    U32(u32),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::F32(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::U32(v)
    }
}

impl From<Vec2> for ParamValue {
    fn from(v: Vec2) -> Self {
        ParamValue::Vec2(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        ParamValue::Vec3(v)
    }
}

/// Host-side rendering boundary.
///
/// Implementations must not block: `publish` is called once per tick on the
/// simulation thread with the complete flake snapshot.
pub trait VfxBridge {
    /// Receive a named constant. Called during simulation construction to
    /// mirror size bounds, flake count and wind into the renderer.
    fn set_parameter(&mut self, name: &str, value: ParamValue);

    /// Receive the per-tick flake snapshot.
    fn publish(&mut self, flakes: &[FlakeInstance]);
}

/// Bridge that discards everything. Used when no renderer is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBridge;

impl VfxBridge for NullBridge {
    fn set_parameter(&mut self, _name: &str, _value: ParamValue) {}

    fn publish(&mut self, _flakes: &[FlakeInstance]) {}
}
