//! RuidaKit CLI
//!
//! Command-line front end for encoding and sending laser jobs.

use clap::Parser;
use tracing::debug;

use ruidakit::cli::{commands, Cli, Commands};
use ruidakit::{init_logging_with_level, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    init_logging_with_level(level)?;
    debug!("RuidaKit v{} built {}", VERSION, BUILD_DATE);

    if let Commands::Ports = cli.command {
        return commands::show_ports();
    }

    let config = commands::load_config(cli.config.as_deref(), &cli.target)?;
    match cli.command {
        Commands::Send { job, name } => commands::send(&config, &job, name.as_deref()),
        Commands::BedSize => commands::show_bed_size(&config),
        Commands::Model => commands::show_model(&config),
        Commands::Ports => commands::show_ports(),
        Commands::Query { opcode } => commands::raw_query(&config, &opcode),
    }
}
