use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for ForensiLock.
///
/// With no flags the tool starts the interactive acquisition console in the
/// current directory with the built-in defaults.
#[derive(Parser, Debug)]
#[clap(name = "forensilock", about = "Forensic RAM and disk acquisition with chain of custody reporting")]
pub struct Args {
    /// Verbose logging (also echoes the session log to the terminal)
    #[clap(short, long)]
    pub verbose: bool,

    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Working directory holding the target drive and the evidence locker
    #[clap(short = 'w', long)]
    pub work_dir: Option<PathBuf>,

    /// Run RAM acquisition, disk imaging and report generation without prompting
    #[clap(long, help = "Run all three steps in order without prompting")]
    pub batch: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = "forensilock.yaml")]
        path: PathBuf,
    },
}
