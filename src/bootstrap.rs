//! Environment checks performed once at startup.
//!
//! Resolves the evidence layout, makes sure the evidence locker and the target
//! drive exist, and reports whether a RAM capture tool is available. Failures
//! here are logged, not raised: the actions stay available and fail on their
//! own if the filesystem is unusable.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use humansize::{format_size, BINARY};
use log::debug;

use crate::config::AcquisitionConfig;
use crate::constants::{DISK_ARTIFACT_NAME, MANIFEST_NAME, RAM_ARTIFACT_NAME};
use crate::session::ActionLog;

/// Resolved paths for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub work_dir: PathBuf,
    pub evidence_dir: PathBuf,
    /// Source artifact imaged by the disk action
    pub target_path: PathBuf,
    /// Where the RAM capture tool is expected; it may not exist
    pub capture_tool: PathBuf,
    pub report_path: PathBuf,
}

impl Environment {
    /// Resolve every path from the configuration without touching the filesystem
    pub fn resolve(config: &AcquisitionConfig) -> Result<Self> {
        let work_dir = config.resolve_work_dir()?;
        let evidence_dir = work_dir.join(&config.evidence_dir_name);
        let capture_tool = if config.capture_tool.is_absolute() {
            config.capture_tool.clone()
        } else {
            work_dir.join(&config.capture_tool)
        };

        Ok(Self {
            target_path: work_dir.join(&config.target_file_name),
            report_path: evidence_dir.join(&config.report_name),
            evidence_dir,
            capture_tool,
            work_dir,
        })
    }

    pub fn ram_artifact_path(&self) -> PathBuf {
        self.evidence_dir.join(RAM_ARTIFACT_NAME)
    }

    pub fn disk_artifact_path(&self) -> PathBuf {
        self.evidence_dir.join(DISK_ARTIFACT_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.evidence_dir.join(MANIFEST_NAME)
    }

    pub fn capture_tool_available(&self) -> bool {
        self.capture_tool.is_file()
    }
}

/// Run the startup checks and return the resolved environment.
///
/// Only an unresolvable working directory is an error.
pub fn bootstrap(config: &AcquisitionConfig, log: &dyn ActionLog) -> Result<Environment> {
    log.info("Initializing System Checks...");
    let env = Environment::resolve(config)?;
    debug!("Resolved environment: {:?}", env);

    if let Err(e) = fs::create_dir_all(&env.evidence_dir) {
        log.error(&format!(
            "Failed to create evidence locker {}: {}",
            env.evidence_dir.display(),
            e
        ));
    } else {
        log.info(&format!("Evidence locker: {}", env.evidence_dir.display()));
    }

    if env.capture_tool_available() {
        log.info(&format!("RAM Tool ({}): DETECTED", env.capture_tool.display()));
    } else {
        log.warn(&format!(
            "WARNING: '{}' missing. Simulation Mode Active.",
            env.capture_tool.display()
        ));
    }

    if env.target_path.exists() {
        let size = fs::metadata(&env.target_path).map(|m| m.len()).unwrap_or(0);
        log.info(&format!("Target Drive: DETECTED ({})", format_size(size, BINARY)));
    } else {
        log.warn(&format!(
            "WARNING: Target {} not found. Creating it...",
            env.target_path.display()
        ));
        match create_placeholder(&env.target_path, config.target_placeholder_size) {
            Ok(()) => log.info(&format!(
                "Placeholder drive created ({} of zeros).",
                format_size(config.target_placeholder_size, BINARY)
            )),
            Err(e) => log.error(&format!("Failed to create placeholder drive: {}", e)),
        }
    }

    log.info("SYSTEM ONLINE. WAITING FOR COMMAND...");
    Ok(env)
}

/// Create a zero-filled file of exactly `size` bytes.
///
/// The file is extended rather than written, so filesystems that support it
/// store it sparsely. A failed attempt leaves nothing behind.
pub fn create_placeholder(path: &Path, size: u64) -> io::Result<()> {
    let result = File::create(path).and_then(|file| {
        file.set_len(size)?;
        file.sync_all()
    });

    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}
