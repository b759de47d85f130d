//! ---
//! ssc_section: "04-demo-tooling"
//! ssc_subsection: "binary"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Binary entrypoint for the SimScribe demonstration scenario."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use simscribe_common::{ColourChoice, ExceptionInfo, LoggingConfig, ManualSimClock, Severity};
use simscribe_logger::facade::{LoggerName, SimLogger};
use simscribe_logger::registry;
use simscribe_logger::{sim_debug, sim_info, sim_warning};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "SimScribe demonstration scenario",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Override the colour policy")]
    colour: Option<CliColour>,

    #[arg(long, value_name = "LEVEL", help = "Override the severity threshold")]
    level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliColour {
    Auto,
    Always,
    Never,
}

impl From<CliColour> for ColourChoice {
    fn from(value: CliColour) -> Self {
        match value {
            CliColour::Auto => ColourChoice::Auto,
            CliColour::Always => ColourChoice::Always,
            CliColour::Never => ColourChoice::Never,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/simscribe.dev.toml"));

    let mut config = LoggingConfig::load(&candidates)?;
    if let Some(colour) = cli.colour {
        config.colour = colour.into();
    }
    if let Some(level) = &cli.level {
        config.level = level.parse::<Severity>().map_err(|err| anyhow!(err))?;
    }

    registry::on_init(|| {
        let _ = registry::info(format_args!("logging online"));
    });

    let clock = Arc::new(ManualSimClock::new());
    let top = registry::init("sim", &config, clock.clone())?;
    registry::on_level_change(&top.lock(), |level| {
        eprintln!("top logger level is now {}", level);
    });

    {
        let logger = top.lock();
        logger.header("SimScribe demonstration\nbring-up and fault scenario")?;
        sim_info!(logger, "scenario starting with seed {:#x}", 0xA11CEu32)?;
    }

    clock.advance(3_200_000); // 3.2 ns
    let monitor = SimLogger::build(LoggerName::new().with_module("axi").with_name("monitor"))?;
    sim_info!(monitor, "reset released after {} cycles", 4)?;

    clock.advance(9_300_000);
    sim_debug!(monitor, "beat accepted on channel {}", "AW")?;
    sim_warning!(monitor, "response delayed\nexpected 2 beats, saw 1")?;

    clock.advance(40_000_000);
    let fault = ExceptionInfo::new("ProtocolError", "write response before address phase")
        .with_trace("at axi.monitor.check_order\nat scheduler.tick");
    monitor.exception(fault, format_args!("transaction {:#06x} aborted", 0x2a))?;

    registry::set_top_level(Severity::Debug)?;
    registry::debug(format_args!("threshold lowered for drain phase"))?;

    clock.advance(7_500_000);
    top.lock().divider("scenario complete")?;

    Ok(())
}
