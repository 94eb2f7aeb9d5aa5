//! Replays a scripted input timeline against a charge accumulator.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use charge_up::{
    ChargeAccumulator, ChargeConfig, ChargeDisplay, InputBinding, ManualClock, ScriptedInput,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// TOML file with the charge configuration.
    #[clap(long, env = "CHARGE_UP_CONFIG")]
    config: Option<PathBuf>,

    /// Host ticks per second.
    #[clap(long, default_value = "10")]
    tick_hz: u32,

    /// Simulated session length in seconds.
    #[clap(long, default_value = "60")]
    duration: f32,

    /// Input timeline: comma-separated `<tick>:<engage|disengage|trigger>`.
    #[clap(long, default_value = "0:engage,300:trigger")]
    script: ScriptedInput,

    /// Release automatically at the maximum, overriding the config file.
    #[clap(long)]
    auto_release: bool,

    /// Print the display every N ticks.
    #[clap(long, default_value = "50")]
    render_every: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .compact()
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.tick_hz > 0, "tick rate must be positive");

    let mut config = match &args.config {
        Some(path) => ChargeConfig::from_toml_file(path)
            .with_context(|| format!("failed to load `{}`", path.display()))?,
        None => ChargeConfig::default(),
    };
    if args.auto_release {
        config.auto_release_at_maximum = true;
    }
    info!(?config, "starting…");

    let clock = ManualClock::new();
    let mut accumulator =
        ChargeAccumulator::new(config, clock.clone()).context("invalid charge configuration")?;
    let display = Arc::new(ChargeDisplay::default());
    accumulator.subscribe(display.clone());
    let mut input = InputBinding::new(args.script);

    let dt = 1.0 / args.tick_hz as f32;
    let ticks = (args.duration * args.tick_hz as f32).ceil() as u64;
    let render_every = args.render_every.max(1);
    for tick in 0..ticks {
        input.update(&mut accumulator);
        accumulator.tick();
        if tick % render_every == 0 {
            println!("t={:.2}s\n{}", tick as f32 * dt, display.render(&accumulator));
        }
        clock.advance(dt);
    }

    info!("done!");
    Ok(())
}
