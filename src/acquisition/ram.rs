//! RAM acquisition.
//!
//! Runs the external capture tool when one is available. When the tool is
//! missing or fails, a block of random bytes of the configured size is written
//! instead and the result is tagged [`AcquisitionMode::Simulated`].

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use humansize::{format_size, BINARY};
use log::debug;

use crate::acquisition::capture_tool::CaptureTool;
use crate::constants::RANDOM_FILL_CHUNK_SIZE;
use crate::error::AcquisitionError;
use crate::models::{AcquisitionMode, ArtifactMetadata, Digest, RamAcquisition};
use crate::session::ActionLog;
use crate::utils::hash::calculate_sha256_with_block_size;

/// Sizes that drive a RAM acquisition
#[derive(Debug, Clone, Copy)]
pub struct RamOptions {
    pub fallback_size: u64,
    pub hash_block_size: usize,
}

/// Acquire RAM into `output`, falling back to synthetic data.
///
/// Only a tool that starts and exits zero counts as a capture. A tool that
/// cannot be started at all aborts the action rather than silently falling back.
pub fn acquire_ram(
    tool: Option<&dyn CaptureTool>,
    output: &Path,
    options: RamOptions,
    log: &dyn ActionLog,
) -> Result<RamAcquisition, AcquisitionError> {
    log.info("--- STARTING RAM ACQUISITION ---");
    let start = Instant::now();
    let collection_time = Utc::now().to_rfc3339();

    let captured = match tool {
        Some(tool) => {
            log.info(&format!("Attempting Kernel-Level Dump ({})...", tool.name()));
            // A dump left by an earlier run must not pass for this tool's output
            remove_stale_output(output)?;
            let exit = tool.capture(output).map_err(|source| AcquisitionError::ToolLaunch {
                tool: tool.location(),
                source,
            })?;

            if exit.success {
                Some(AcquisitionMode::Captured { tool: tool.location() })
            } else {
                let code = exit.code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string());
                log.warn(&format!("WARNING: {} exited with status {}.", tool.name(), code));
                if !exit.stderr.is_empty() {
                    log.warn(&format!("Tool output: {}", exit.stderr));
                }
                None
            }
        }
        None => {
            log.warn("WARNING: Capture tool missing.");
            None
        }
    };

    let mode = match captured {
        Some(mode) => {
            if !output.exists() {
                log.error("CRITICAL ERROR: Capture tool reported success but wrote no dump.");
                return Err(AcquisitionError::DestinationMissing(output.to_path_buf()));
            }
            log.info("Kernel Dump: SUCCESS");
            mode
        }
        None => {
            log.warn("Switching to Fail-Safe Acquisition Mode (SIMULATED, synthetic data)...");
            write_random_file(output, options.fallback_size).map_err(|e| {
                AcquisitionError::io(format!("Failed to write {}", output.display()), e)
            })?;
            log.info(&format!(
                "Fail-Safe Dump: SUCCESS ({} of random data, NOT a memory capture)",
                format_size(options.fallback_size, BINARY)
            ));
            AcquisitionMode::Simulated
        }
    };

    let elapsed = start.elapsed().as_secs_f64();
    log.info(&format!("Acquisition Complete in {:.2}s", elapsed));

    log.info("Calculating SHA-256 Hash...");
    let digest = calculate_sha256_with_block_size(output, options.hash_block_size)
        .map_err(|e| AcquisitionError::io(format!("Failed to hash {}", output.display()), e))?;
    if digest == Digest::FileNotFound {
        return Err(AcquisitionError::DestinationMissing(output.to_path_buf()));
    }
    log.info(&format!("RAM HASH: {}", digest));

    let file_size = fs::metadata(output)
        .map_err(|e| AcquisitionError::io(format!("Failed to stat {}", output.display()), e))?
        .len();

    Ok(RamAcquisition {
        artifact: ArtifactMetadata {
            path: output.to_path_buf(),
            file_size,
            digest,
            collection_time,
            duration_seconds: elapsed,
        },
        mode,
    })
}

fn remove_stale_output(output: &Path) -> Result<(), AcquisitionError> {
    match fs::remove_file(output) {
        Ok(()) => {
            debug!("Removed previous artifact {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AcquisitionError::io(
            format!("Failed to remove previous {}", output.display()),
            e,
        )),
    }
}

/// Write exactly `size` random bytes to `path`, one chunk at a time.
///
/// The bytes come from the OS generator but carry no cryptographic meaning
/// here. A partial file is removed on failure.
pub fn write_random_file(path: &Path, size: u64) -> io::Result<()> {
    let result = fill_random(path, size);
    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

fn fill_random(path: &Path, size: u64) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut buffer = vec![0u8; RANDOM_FILL_CHUNK_SIZE];
    let mut remaining = size;

    while remaining > 0 {
        let n = remaining.min(buffer.len() as u64) as usize;
        getrandom::fill(&mut buffer[..n])
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        writer.write_all(&buffer[..n])?;
        remaining -= n as u64;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}
