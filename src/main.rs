//! Headless snowfall demo.
//!
//! Runs a fixed-step simulation and prints a short summary.
//!
//! Run with: `cargo run --release -- [flake_count]`

use snowfall::prelude::*;

fn main() {
    env_logger::init();

    let count: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100);

    println!("=== Snowfall Demo ===");
    println!("Flakes: {}", count);

    let config = SnowfallConfig::default()
        .with_particle_count(count)
        .with_wind(Vec2::new(3.0, 1.0));

    let mut sim = match Snowfall::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let dt = 1.0 / 60.0;
    let ticks = 600;
    for _ in 0..ticks {
        sim.advance(dt);
    }

    let flakes = sim.particles();
    if flakes.is_empty() {
        println!("Nothing to simulate.");
        return;
    }

    let n = flakes.len() as f32;
    let mean_diameter: f32 = flakes.iter().map(|p| p.diameter).sum::<f32>() / n;
    let mean_speed: f32 = flakes.iter().map(|p| p.speed).sum::<f32>() / n;
    let lowest = flakes.iter().map(|p| p.position.z).fold(f32::INFINITY, f32::min);
    let highest = flakes.iter().map(|p| p.position.z).fold(f32::NEG_INFINITY, f32::max);

    println!("Ticks:         {}", sim.ticks());
    println!("Mean diameter: {:.3}", mean_diameter);
    println!("Mean speed:    {:.3}", mean_speed);
    println!("Altitude span: {:.1} .. {:.1}", lowest, highest);
}
