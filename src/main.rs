use anyhow::Result;
use clap::Parser;
use log::info;

use grid_traffic::simulation::{SimConfig, SimWorld};

#[derive(Parser)]
#[command(name = "grid_traffic")]
#[command(about = "Headless grid traffic simulation")]
struct Cli {
    /// Grid size; roads run at indices 1..=size-2
    #[arg(long, default_value = "7")]
    grid_size: usize,

    /// Number of cars
    #[arg(long, default_value = "40")]
    cars: usize,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulation ticks to run
    #[arg(long, default_value = "600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.05")]
    delta: f32,

    /// Share of intersections controlled by lights
    #[arg(long, default_value = "0.5")]
    stop_light_ratio: f32,

    /// Print the terminal map every N simulated seconds (0 disables)
    #[arg(long, default_value = "0")]
    map_every: u32,

    /// Pause between printed seconds, in milliseconds
    #[arg(long, default_value = "0")]
    pause_ms: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = SimConfig {
        grid_size: cli.grid_size,
        car_count: cli.cars,
        seed: cli.seed,
        stop_light_ratio: cli.stop_light_ratio,
        ..SimConfig::default()
    };

    run_headless(config, cli.ticks, cli.delta, cli.map_every, cli.pause_ms)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(
    config: SimConfig,
    ticks: u32,
    delta: f32,
    map_every: u32,
    pause_ms: u64,
) -> Result<()> {
    info!("Running grid traffic simulation in headless mode");
    info!("Ticks: {}, Delta: {}s", ticks, delta);

    let mut world = SimWorld::new(config)?;

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = if delta > 0.0 {
        ((1.0 / delta).ceil() as u32).max(1)
    } else {
        1
    };

    if map_every > 0 {
        world.draw_map();
    }

    let mut tick = 0;
    let mut seconds = 0;
    while tick < ticks {
        let ticks_to_run = ticks_per_second.min(ticks - tick);
        for _ in 0..ticks_to_run {
            tick += 1;
            world.step(delta)?;
        }
        seconds += 1;

        info!("{}", world.stats());
        if map_every > 0 && seconds % map_every == 0 {
            world.draw_map();
        }

        if pause_ms > 0 && tick < ticks {
            std::thread::sleep(std::time::Duration::from_millis(pause_ms));
        }
    }

    info!("=== SIMULATION COMPLETE ===");
    info!("{}", world.stats());
    if map_every > 0 {
        world.print_summary();
        world.draw_map();
    }
    Ok(())
}
