use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Deserialize};

use crate::constants::{DIGEST_FILE_NOT_FOUND, DIGEST_PENDING};

/// SHA-256 fingerprint of an evidence artifact, or the reason there is none.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Digest {
    /// Not computed yet
    #[default]
    Pending,
    /// The artifact file did not exist when hashing was attempted
    FileNotFound,
    /// Lowercase hex SHA-256
    Sha256(String),
}

impl Digest {
    /// The text shown to the examiner: the hex digest or a sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            Digest::Pending => DIGEST_PENDING,
            Digest::FileNotFound => DIGEST_FILE_NOT_FOUND,
            Digest::Sha256(hex) => hex,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Digest::Sha256(_))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the RAM artifact came to exist.
///
/// A simulated artifact holds synthetic random bytes, not memory contents.
/// Reports and manifests carry this tag so the two can never be conflated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AcquisitionMode {
    Captured { tool: PathBuf },
    Simulated,
}

impl AcquisitionMode {
    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionMode::Captured { .. } => "CAPTURED",
            AcquisitionMode::Simulated => "SIMULATED",
        }
    }

    pub fn description(&self) -> String {
        match self {
            AcquisitionMode::Captured { tool } => {
                format!("CAPTURED by {}", tool.display())
            }
            AcquisitionMode::Simulated => {
                "SIMULATED (synthetic random data, not a memory capture)".to_string()
            }
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, AcquisitionMode::Simulated)
    }
}

/// Metadata recorded for every evidence artifact once it has been written and hashed
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ArtifactMetadata {
    pub path: PathBuf,
    pub file_size: u64,
    pub digest: Digest,
    pub collection_time: String,
    pub duration_seconds: f64,
}

/// Result of a successful RAM acquisition
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RamAcquisition {
    pub artifact: ArtifactMetadata,
    pub mode: AcquisitionMode,
}

/// Result of a successful disk imaging run
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DiskImage {
    pub source: PathBuf,
    pub artifact: ArtifactMetadata,
}
