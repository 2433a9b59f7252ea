//! CLI Module
//!
//! Command-line interface for RuidaKit.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// RuidaKit - job encoder and uploader for Ruida laser controllers
#[derive(Parser, Debug)]
#[command(name = "ruidakit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (.toml or .json); defaults to the platform config dir
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Transport overrides; at most one may be given
#[derive(Args, Debug, Default, Clone)]
#[group(multiple = false)]
pub struct TargetArgs {
    /// Write to a file instead of a controller
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Serial device of the controller
    #[arg(long)]
    pub serial: Option<String>,

    /// Hostname or address of a networked controller
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a JSON job and send it
    #[command(name = "send")]
    Send {
        /// Path to the job description
        job: PathBuf,

        /// Job name uploaded to the controller
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Print the bed size
    #[command(name = "bed-size")]
    BedSize,

    /// Print the controller model and firmware
    #[command(name = "model")]
    Model,

    /// List serial ports a controller could be on
    #[command(name = "ports")]
    Ports,

    /// Send a raw query opcode, given as hex
    #[command(name = "query")]
    Query {
        /// Opcode bytes, e.g. "DA 00 00 26"
        opcode: String,
    },
}
