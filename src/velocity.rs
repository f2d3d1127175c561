//! Terminal fall speed from flake diameter.
//!
//! Snow crystals reach a steady fall speed where drag balances gravity, well
//! approximated by a power law of diameter. The constants are empirical fits
//! for diameters measured in centimeters.

/// Power-law coefficient of the drag relation.
pub const DRAG_COEFFICIENT: f32 = 0.84;

/// Power-law exponent of the drag relation.
pub const DRAG_EXPONENT: f32 = 0.36;

/// Terminal fall speed for a flake of the given diameter.
///
/// Pure and infallible. The domain is positive diameters; non-positive size
/// bounds are rejected at configuration validation, not here.
#[inline]
pub fn terminal_speed(diameter: f32) -> f32 {
    DRAG_COEFFICIENT * diameter.powf(DRAG_EXPONENT)
}
