//! Chain of custody report.
//!
//! The report is a single PDF page listing the case, the host and both
//! digests, plus a JSON manifest with the same facts in machine-readable form.
//! Missing digests render as their sentinel text; generation never fails
//! because evidence is incomplete.

/// PDF layout and writing
pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::AcquisitionError;
use crate::models::{AcquisitionMode, Digest, DiskImage, RamAcquisition};
use crate::session::ActionLog;
use crate::utils::summary::create_evidence_manifest;

/// One evidence line of the report
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvidenceEntry {
    pub digest: Digest,
    pub mode: Option<AcquisitionMode>,
    pub file_size: Option<u64>,
    pub path: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub collection_time: Option<String>,
}

impl EvidenceEntry {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn from_ram(ram: Option<&RamAcquisition>) -> Self {
        match ram {
            Some(ram) => Self {
                digest: ram.artifact.digest.clone(),
                mode: Some(ram.mode.clone()),
                file_size: Some(ram.artifact.file_size),
                path: Some(ram.artifact.path.clone()),
                source: None,
                collection_time: Some(ram.artifact.collection_time.clone()),
            },
            None => Self::pending(),
        }
    }

    pub fn from_disk(disk: Option<&DiskImage>) -> Self {
        match disk {
            Some(disk) => Self {
                digest: disk.artifact.digest.clone(),
                mode: None,
                file_size: Some(disk.artifact.file_size),
                path: Some(disk.artifact.path.clone()),
                source: Some(disk.source.clone()),
                collection_time: Some(disk.artifact.collection_time.clone()),
            },
            None => Self::pending(),
        }
    }
}

/// Everything the report shows, captured at the moment generation is requested
#[derive(Debug, Clone)]
pub struct ReportData {
    pub case_id: String,
    pub generated_at: DateTime<Local>,
    pub hostname: String,
    pub ram: EvidenceEntry,
    pub disk: EvidenceEntry,
}

impl ReportData {
    pub fn new(case_id: &str, ram: Option<&RamAcquisition>, disk: Option<&DiskImage>) -> Self {
        Self {
            case_id: case_id.to_string(),
            generated_at: Local::now(),
            hostname: local_hostname(),
            ram: EvidenceEntry::from_ram(ram),
            disk: EvidenceEntry::from_disk(disk),
        }
    }
}

fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "Unknown-Host".to_string())
}

/// Files written by one report generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub report: PathBuf,
    pub manifest: PathBuf,
}

/// Write the PDF report and the JSON manifest.
pub fn generate_report(
    data: &ReportData,
    report_path: &Path,
    manifest_path: &Path,
    log: &dyn ActionLog,
) -> Result<ReportArtifacts, AcquisitionError> {
    log.info("Generating PDF Report...");
    if !data.ram.digest.is_computed() || !data.disk.digest.is_computed() {
        log.warn("WARNING: Report contains digests that were not computed.");
    }

    pdf::write_report(data, report_path)?;
    log.info(&format!("Report Saved: {}", report_path.display()));

    let manifest = create_evidence_manifest(data)
        .map_err(|e| AcquisitionError::Report(e.to_string()))?;
    fs::write(manifest_path, manifest).map_err(|e| {
        AcquisitionError::io(format!("Failed to write {}", manifest_path.display()), e)
    })?;
    log.info(&format!("Manifest Saved: {}", manifest_path.display()));

    Ok(ReportArtifacts {
        report: report_path.to_path_buf(),
        manifest: manifest_path.to_path_buf(),
    })
}

/// Open `path` with the platform's default viewer. Failure is logged only.
pub fn open_in_viewer(path: &Path, log: &dyn ActionLog) -> bool {
    match open::that(path) {
        Ok(()) => true,
        Err(e) => {
            log.warn(&format!("Could not open PDF automatically: {}", e));
            false
        }
    }
}
