mod args;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use gbium_core::{Gameboy, RunOutcome, config::Config};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config {
        power_on: args.power_on,
        ..Config::default()
    };
    let mut gb = Gameboy::load_rom_from_file(&args.rom, config)
        .with_context(|| format!("loading {}", args.rom.display()))?;

    if let Some(path) = &args.load_ram {
        let image = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        gb.restore_ram(&image).context("restoring battery RAM")?;
    }

    match args.break_at {
        Some(pc) => match gb.run_until(pc, args.cycles)? {
            RunOutcome::Breakpoint { cycles } => info!(pc, cycles, "breakpoint reached"),
            RunOutcome::CycleLimit => warn!(pc, cycles = args.cycles, "breakpoint not reached"),
        },
        None => {
            for _ in 0..args.cycles {
                gb.step_cycle()?;
            }
        }
    }

    println!("{}", gb.snapshot());
    println!("cycles: {}", gb.cycles());
    for addr in &args.peek {
        println!("[{addr:#06X}] = {:#04X}", gb.peek(*addr));
    }

    if let Some(path) = &args.save_ram {
        match gb.save_ram() {
            Some(image) => {
                fs::write(path, image).with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "battery RAM saved");
            }
            None => warn!("cartridge has no battery RAM to save"),
        }
    }

    Ok(())
}
