use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shade",
    about = "Merge many input archives into one shaded output archive",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge input archives into one shaded output
    Merge(MergeArgs),
    /// List the entries of an archive
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Input archives, or directories to search for them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Path of the shaded output archive
    #[arg(short, long)]
    pub output: PathBuf,

    /// TOML file with merge and append rules
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stamp wall-clock mtimes instead of reproducible epoch-zero ones
    #[arg(long)]
    pub wallclock_timestamps: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Archive to list
    pub archive: PathBuf,
}
