use std::fs::File;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use log::{info, warn, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

use forensilock::bootstrap::bootstrap;
use forensilock::cli::{Args, Commands};
use forensilock::config::{load_or_default, AcquisitionConfig};
use forensilock::constants::{APP_NAME, SESSION_LOG_NAME};
use forensilock::privileges;
use forensilock::session::CaseSession;
use forensilock::shell::Shell;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Handle subcommands
    if let Some(cmd) = &args.command {
        initialize_terminal_logging(args.verbose)?;
        return handle_subcommand(cmd);
    }

    // Nothing is acquired without elevation
    if let Err(e) = privileges::require_elevation() {
        eprintln!("{}", style(format!("{}: ACCESS DENIED", APP_NAME)).red().bold());
        eprintln!("{}", e);
        process::exit(1);
    }

    // Load configuration
    let config = load_config(&args)?;
    let work_dir = config.resolve_work_dir()?;

    // Initialize logging
    initialize_logging(args.verbose, &work_dir.join(SESSION_LOG_NAME))?;
    info!("Starting {} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
    info!("Elevated privileges confirmed");

    // Startup checks
    let session = CaseSession::new();
    let env = bootstrap(&config, session.log())?;

    let mut shell = Shell::new(config, env, session);
    if args.batch {
        if !shell.run_batch()? {
            warn!("Batch run stopped before the report was generated");
            process::exit(1);
        }
    } else {
        shell.run_interactive()?;
    }

    info!("{} session ended", APP_NAME);
    Ok(())
}

/// Route log output to the session log file, echoing to the terminal when verbose.
///
/// The file is truncated so each run starts a fresh log. If it cannot be
/// created the terminal becomes the only output.
fn initialize_logging(verbose: bool, log_path: &Path) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    let file_error = match File::create(log_path) {
        Ok(file) => {
            loggers.push(WriteLogger::new(log_level, Config::default(), file));
            None
        }
        Err(e) => Some(e),
    };

    if verbose || file_error.is_some() {
        loggers.push(TermLogger::new(
            log_level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers).context("Failed to initialize logger")?;

    if let Some(e) = file_error {
        warn!("Could not create session log {}: {}", log_path.display(), e);
    }
    Ok(())
}

/// Terminal-only logging for subcommands, which never touch a case
fn initialize_terminal_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Handle subcommands (init-config)
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            AcquisitionConfig::create_default_config_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
    }
}

/// Load configuration and apply command-line overrides
fn load_config(args: &Args) -> Result<AcquisitionConfig> {
    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(dir) = &args.work_dir {
        config.work_dir = Some(dir.clone());
    }
    Ok(config)
}
