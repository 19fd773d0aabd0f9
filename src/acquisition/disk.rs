use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use humansize::{format_size, BINARY};
use log::debug;

use crate::error::AcquisitionError;
use crate::models::{ArtifactMetadata, Digest, DiskImage};
use crate::session::ActionLog;
use crate::utils::hash::calculate_sha256_with_block_size;

/// Sizes that drive a disk imaging run
#[derive(Debug, Clone, Copy)]
pub struct ImagingOptions {
    pub chunk_size: usize,
    pub hash_block_size: usize,
}

/// Bit-stream copy `source` to `destination`, then hash the copy.
///
/// The digest is computed by re-reading the destination, never from the copy
/// stream. A missing source aborts before anything is created and a failed
/// copy removes its partial output.
pub fn image_disk(
    source: &Path,
    destination: &Path,
    options: ImagingOptions,
    log: &dyn ActionLog,
) -> Result<DiskImage, AcquisitionError> {
    log.info("--- STARTING DISK IMAGING ---");

    if !source.is_file() {
        log.error(&format!("CRITICAL ERROR: Source {} is missing!", source.display()));
        return Err(AcquisitionError::SourceMissing(source.to_path_buf()));
    }

    let start = Instant::now();
    let collection_time = Utc::now().to_rfc3339();
    log.info(&format!(
        "Acquiring Image: {} -> {}",
        source.display(),
        destination.display()
    ));
    log.info("Running Bit-Stream Copy... (Please Wait)");

    let copied = copy_in_chunks(source, destination, options.chunk_size).map_err(|e| {
        AcquisitionError::io(format!("Bit-stream copy to {} failed", destination.display()), e)
    })?;

    if !destination.exists() {
        log.error("CRITICAL ERROR: Failed to create file.");
        return Err(AcquisitionError::DestinationMissing(destination.to_path_buf()));
    }

    let elapsed = start.elapsed().as_secs_f64();
    log.info(&format!(
        "Disk Imaging Complete: {} copied in {:.2}s",
        format_size(copied, BINARY),
        elapsed
    ));

    log.info("Verifying Evidence Integrity (SHA-256)...");
    let digest = calculate_sha256_with_block_size(destination, options.hash_block_size)
        .map_err(|e| AcquisitionError::io(format!("Failed to hash {}", destination.display()), e))?;
    if digest == Digest::FileNotFound {
        return Err(AcquisitionError::DestinationMissing(destination.to_path_buf()));
    }
    log.info(&format!("DISK HASH: {}", digest));

    Ok(DiskImage {
        source: source.to_path_buf(),
        artifact: ArtifactMetadata {
            path: destination.to_path_buf(),
            file_size: copied,
            digest,
            collection_time,
            duration_seconds: elapsed,
        },
    })
}

/// Copy `source` into a freshly created `destination`, `chunk_size` bytes at a time.
///
/// Returns the number of bytes copied. If the copy fails after `destination`
/// was created, the partial file is removed; an existing `destination` is left
/// alone when `source` cannot be opened.
pub fn copy_in_chunks(source: &Path, destination: &Path, chunk_size: usize) -> io::Result<u64> {
    let reader = File::open(source)?;
    let writer = File::create(destination)?;

    match copy_stream(reader, writer, chunk_size) {
        Ok(total) => {
            debug!("Copied {} bytes from {}", total, source.display());
            Ok(total)
        }
        Err(e) => {
            let _ = fs::remove_file(destination);
            Err(e)
        }
    }
}

fn copy_stream(mut reader: File, mut writer: File, chunk_size: usize) -> io::Result<u64> {
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..n])?;
        total += n as u64;
    }

    writer.sync_all()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CaseLog;
    use crate::utils::hash::calculate_sha256;
    use proptest::prelude::*;
    use tempfile::TempDir;

    const SMALL: ImagingOptions = ImagingOptions {
        chunk_size: 4096,
        hash_block_size: 1024,
    };

    #[test]
    fn test_image_matches_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("suspect_drive.img");
        let destination = temp_dir.path().join("evidence_disk.img");
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&source, &data).unwrap();
        let log = CaseLog::new();

        let image = image_disk(&source, &destination, SMALL, &log).unwrap();

        assert_eq!(image.artifact.file_size, data.len() as u64);
        assert_eq!(fs::read(&destination).unwrap(), data);
        assert_eq!(image.artifact.digest, calculate_sha256(&source).unwrap());
        assert_eq!(image.source, source);
        assert!(log.contains("DISK HASH:"));
    }

    #[test]
    fn test_missing_source_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("suspect_drive.img");
        let destination = temp_dir.path().join("evidence_disk.img");
        let log = CaseLog::new();

        let err = image_disk(&source, &destination, SMALL, &log).unwrap_err();

        assert!(matches!(err, AcquisitionError::SourceMissing(_)));
        assert!(!destination.exists());
        assert!(log.contains("CRITICAL ERROR"));
    }

    #[test]
    fn test_failed_copy_reports_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("suspect_drive.img");
        fs::write(&source, b"evidence").unwrap();
        let destination = temp_dir.path().join("missing_dir").join("evidence_disk.img");
        let log = CaseLog::new();

        let err = image_disk(&source, &destination, SMALL, &log).unwrap_err();
        assert!(matches!(err, AcquisitionError::Io { .. }));
        assert!(!destination.exists());
    }

    #[test]
    fn test_unopenable_source_keeps_existing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("vanished.img");
        let destination = temp_dir.path().join("evidence_disk.img");
        fs::write(&destination, b"image from an earlier run").unwrap();

        assert!(copy_in_chunks(&source, &destination, 4096).is_err());
        assert_eq!(fs::read(&destination).unwrap(), b"image from an earlier run");
    }

    #[cfg(unix)]
    #[test]
    fn test_read_failure_removes_partial_destination() {
        let temp_dir = TempDir::new().unwrap();
        // Opening a directory succeeds on unix but reading it fails
        let source = temp_dir.path().join("not_a_file");
        fs::create_dir(&source).unwrap();
        let destination = temp_dir.path().join("evidence_disk.img");

        assert!(copy_in_chunks(&source, &destination, 4096).is_err());
        assert!(!destination.exists());
    }

    #[test]
    fn test_empty_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("empty.img");
        let destination = temp_dir.path().join("copy.img");
        fs::write(&source, b"").unwrap();

        let copied = copy_in_chunks(&source, &destination, 16).unwrap();
        assert_eq!(copied, 0);
        assert_eq!(fs::metadata(&destination).unwrap().len(), 0);
    }

    proptest! {
        #[test]
        fn prop_copy_is_byte_identical(
            data in proptest::collection::vec(any::<u8>(), 0..40_000),
            chunk_size in 1usize..10_000,
        ) {
            let temp_dir = TempDir::new().unwrap();
            let source = temp_dir.path().join("src.img");
            let destination = temp_dir.path().join("dst.img");
            fs::write(&source, &data).unwrap();

            let copied = copy_in_chunks(&source, &destination, chunk_size).unwrap();
            prop_assert_eq!(copied, data.len() as u64);
            prop_assert_eq!(fs::read(&destination).unwrap(), data);
        }
    }
}
