//! Global constants for the ForensiLock suite.
//!
//! Every hardcoded size, file name and label lives here so the defaults in
//! [`crate::config::AcquisitionConfig`] and the tests agree on one value.

// Buffer and artifact size constants
/// Block size used when streaming a file through SHA-256 (1MB)
pub const HASH_BLOCK_SIZE: usize = 1024 * 1024;

/// Chunk size for the bit-stream disk copy (4MB)
pub const COPY_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Size of the synthetic RAM artifact written when no capture tool succeeds (100MB)
pub const RAM_FALLBACK_SIZE: u64 = 100 * 1024 * 1024;

/// Size of the zero-filled placeholder created for a missing target drive (500MB)
pub const TARGET_PLACEHOLDER_SIZE: u64 = 500 * 1024 * 1024;

/// Chunk size used when generating synthetic random data (4MB)
pub const RANDOM_FILL_CHUNK_SIZE: usize = 4 * 1024 * 1024;

// Digest sentinels
/// Displayed in place of a digest that has not been computed yet
pub const DIGEST_PENDING: &str = "PENDING";

/// Returned in place of a digest when the artifact file does not exist
pub const DIGEST_FILE_NOT_FOUND: &str = "FILE_NOT_FOUND_ERROR";

/// Length of a lowercase hex SHA-256 digest
pub const SHA256_HEX_LEN: usize = 64;

// Default file layout
pub const DEFAULT_EVIDENCE_DIR_NAME: &str = "evidence_locker";
pub const DEFAULT_TARGET_FILE_NAME: &str = "suspect_drive.img";
pub const RAM_ARTIFACT_NAME: &str = "evidence_ram.raw";
pub const DISK_ARTIFACT_NAME: &str = "evidence_disk.img";
pub const DEFAULT_REPORT_NAME: &str = "Final_Report.pdf";
pub const MANIFEST_NAME: &str = "evidence_manifest.json";
pub const SESSION_LOG_NAME: &str = "forensilock.log";

/// Static case identifier printed on every report
pub const DEFAULT_CASE_ID: &str = "HACKATHON-2026";

/// Default RAM capture tool, resolved relative to the working directory
#[cfg(target_os = "windows")]
pub const DEFAULT_CAPTURE_TOOL: &str = "winpmem.exe";
#[cfg(not(target_os = "windows"))]
pub const DEFAULT_CAPTURE_TOOL: &str = "avml";

// Report layout
pub const REPORT_TITLE: &str = "FORENSILOCK - CHAIN OF CUSTODY";
pub const APP_NAME: &str = "ForensiLock";
