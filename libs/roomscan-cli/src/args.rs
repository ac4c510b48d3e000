//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use roomscan_capture::Capability;
use roomscan_export::ExportFormat;

/// Capture a room from an AR session and export it as OBJ or JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "roomscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replay a recorded AR session and export the captured room
    Replay(ReplayArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Recorded session (JSON)
    pub recording: PathBuf,

    /// Capture settings (JSON)
    #[arg(short, long, env = "ROOMSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export format, overriding the settings file
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Directory the artifact is written to
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Artifact filename, overriding the format default
    #[arg(long)]
    pub filename: Option<String>,

    /// Capabilities the session cannot run without
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [Capability::MeshDetection, Capability::LocalFloor]
    )]
    pub require: Vec<Capability>,

    /// Capabilities used when available
    #[arg(long, value_delimiter = ',')]
    pub optional: Vec<Capability>,
}
