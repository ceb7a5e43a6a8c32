use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use battery_dash::{logging, Settings, Simulator, SnapshotDir};

#[derive(Parser, Debug)]
#[command(name = "battery-sim")]
#[command(about = "Random-walk simulator writing battery telemetry snapshots")]
struct Args {
    /// Config file (defaults to battery_dash.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write main_page.csv and module_{k}_data.csv into
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Update period in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many cycles
    #[arg(long)]
    cycles: Option<u64>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }
    if let Some(interval_ms) = args.interval_ms {
        settings.sim_interval_ms = interval_ms;
    }
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }

    logging::init_stderr(&settings.log_level)?;

    let dir = SnapshotDir::new(&settings.data_dir);
    let mut simulator = match args.seed {
        Some(seed) => Simulator::seeded(dir, seed),
        None => Simulator::from_entropy(dir),
    };

    println!("Battery Data Simulator");
    println!("Press Ctrl+C to exit");
    info!(
        data_dir = %simulator.dir().root().display(),
        interval_ms = settings.sim_interval_ms,
        seed = ?args.seed,
        "simulator started"
    );

    tokio::select! {
        _ = simulator.run_for(settings.sim_interval(), args.cycles) => {}
        result = tokio::signal::ctrl_c() => result?,
    }

    println!("Exiting...");
    Ok(())
}
