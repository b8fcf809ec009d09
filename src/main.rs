use anyhow::Result;
use clap::Parser;

use reroute_sim::simulation::{RunState, SimParams, SimWorld};

#[derive(Parser)]
#[command(name = "reroute_sim")]
#[command(about = "Dynamic reroute simulation over a changing road graph")]
struct Cli {
    /// Number of vehicle movement ticks to run
    #[arg(long, default_value = "20000")]
    ticks: u32,

    /// RNG seed for reproducible environment runs
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Switching penalty in minutes charged against any reroute
    #[arg(long, default_value = "1.0")]
    penalty_weight: f32,

    /// Minimum relative improvement a reroute must offer
    #[arg(long, default_value = "0.2")]
    threshold: f32,

    /// Grid size for the demo world (rows = cols)
    #[arg(long, default_value = "6")]
    grid: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut params = SimParams::default();
    params.seed = cli.seed;
    params.rule.penalty_weight = cli.penalty_weight;
    params.rule.improvement_threshold = cli.threshold;

    // Vehicle ticks per environment tick, from the two intervals
    let env_every = (params.env_tick_secs / params.vehicle_tick_secs).round().max(1.0) as u32;

    let mut world = SimWorld::demo_grid(cli.grid, cli.grid, params)?;
    world.start()?;

    println!("Initial: {}", world.summary());

    for tick in 1..=cli.ticks {
        world.vehicle_tick();
        if tick % env_every == 0 {
            world.environment_tick();
        }
        if tick % 1000 == 0 {
            println!("--- tick {} --- {}", tick, world.summary());
        }
        match world.run_state() {
            RunState::Arrived | RunState::Failed => break,
            _ => {}
        }
    }

    println!("Final: {}", world.summary());
    println!("Journal ({} entries, most recent first):", world.journal().len());
    for entry in world.journal().iter().take(10) {
        println!("  [{:>6.1}min] {:?}: {}", entry.at_minutes, entry.severity, entry.message);
    }

    Ok(())
}
