//! Authventure: a text adventure guarding one-time codes.

mod config;
mod console;
mod shell;

use std::path::PathBuf;
use std::process;

use av_device::{DeviceBackend, SimulatedBackend, TopologyFile};
use clap::Parser;
use clap::builder::FalseyValueParser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{PlayConfig, seconds};

const DEMO_DEVICES: &str = include_str!("../demo/devices.json");

#[derive(Parser)]
#[command(
    name = "authventure",
    about = "A text adventure where a robed man reads your one-time codes aloud",
    version
)]
struct Cli {
    /// JSON file describing the simulated devices plugged in
    #[arg(short, long, conflicts_with = "demo")]
    devices: Option<PathBuf>,

    /// Play with the bundled demo device
    #[arg(long)]
    demo: bool,

    /// Seconds between narrated characters
    #[arg(long, env = "AUTHVENTURE_TYPE_DELAY", default_value = "0.01")]
    type_delay: f64,

    /// Keep narration in mixed case
    #[arg(long, env = "AUTHVENTURE_CASE", value_parser = FalseyValueParser::new())]
    no_upper: bool,

    /// Seconds a device waits for a touch
    #[arg(long, default_value = "15")]
    touch_timeout: f64,

    /// Log device activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let config = PlayConfig::default()
        .with_type_delay(seconds(cli.type_delay, "type delay")?)
        .with_uppercase(!cli.no_upper)
        .with_touch_timeout(seconds(cli.touch_timeout, "touch timeout")?);

    let devices = build_backend(&cli, &config)?;
    shell::run(&config, devices)
}

fn build_backend(cli: &Cli, config: &PlayConfig) -> Result<Box<dyn DeviceBackend>, String> {
    let backend = if let Some(path) = &cli.devices {
        debug!(path = %path.display(), "loading devices");
        let file = TopologyFile::load(path).map_err(|e| e.to_string())?;
        SimulatedBackend::from_topology(file).map_err(|e| e.to_string())?
    } else if cli.demo {
        let file = TopologyFile::from_json(DEMO_DEVICES).map_err(|e| e.to_string())?;
        SimulatedBackend::from_topology(file).map_err(|e| e.to_string())?
    } else {
        SimulatedBackend::new()
    };

    Ok(Box::new(backend.with_touch_timeout(config.touch_timeout)))
}
