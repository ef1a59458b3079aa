//! Chordnode - Chord ring simulator
//!
//! Builds a ring from the configured scenario and prints how nodes, keys and
//! lookups behave as nodes join and leave.

use anyhow::Result;
use chordnode::config::{Config, ReportFormat};
use chordnode::{logging, scenario};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "chordnode")]
#[command(about = "Simulate a Chord ring: joins, leaves, replicated stores and lookups")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "CHORDNODE_CONFIG")]
    config: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long)]
    init: bool,

    /// Log filter, overrides RUST_LOG and the configured level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Print finger tables with every node listing
    #[arg(long)]
    fingers: bool,

    /// Skip the ring visualization
    #[arg(long)]
    no_visualize: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.init {
        let config = Config::create_default(args.config)?;
        println!(
            "Created default configuration at {}",
            config.config_path().display()
        );
        return Ok(());
    }

    let mut config = Config::load_or_default(args.config)?;
    if let Some(format) = args.format {
        config.report.format = format;
    }
    if args.fingers {
        config.report.fingers = true;
    }
    if args.no_visualize {
        config.report.visualize = false;
    }

    logging::init(&config.logging, args.log_level.as_deref())?;

    info!("Starting chordnode v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Ring: m={}, R={}",
        config.ring.id_bits, config.ring.replication_factor
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let (network, summary) = scenario::run(&config, &mut out)?;
    out.flush()?;

    info!(
        "Done: {} nodes, {} stored, {} rejected",
        network.len(),
        summary.stored,
        summary.rejected
    );

    Ok(())
}
