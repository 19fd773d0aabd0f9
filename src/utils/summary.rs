use serde_json::{json, Value};
use uuid::Uuid;
use anyhow::{Result, Context};

use crate::constants::APP_NAME;
use crate::models::Digest;
use crate::report::{EvidenceEntry, ReportData};

/// Create the JSON evidence manifest that accompanies the PDF report.
///
/// Carries the same facts as the report in machine-readable form, plus a
/// fresh collection id so separate generations can be told apart.
///
/// # Example Output
///
/// ```json
/// {
///   "collection_id": "550e8400-e29b-41d4-a716-446655440000",
///   "case_id": "HACKATHON-2026",
///   "hostname": "workstation-01",
///   "generated_at": "2026-01-15T14:30:52.123456+01:00",
///   "ram": { "digest": "...", "status": "sha256", "mode": "SIMULATED", ... },
///   "disk": { "digest": "PENDING", "status": "pending", ... }
/// }
/// ```
pub fn create_evidence_manifest(data: &ReportData) -> Result<String> {
    let manifest = json!({
        "collection_id": Uuid::new_v4().to_string(),
        "case_id": data.case_id,
        "hostname": data.hostname,
        "generated_at": data.generated_at.to_rfc3339(),
        "os": std::env::consts::OS,
        "collector": APP_NAME,
        "collector_version": env!("CARGO_PKG_VERSION"),
        "ram": evidence_json(&data.ram),
        "disk": evidence_json(&data.disk),
    });

    serde_json::to_string_pretty(&manifest).context("Failed to serialize evidence manifest to JSON")
}

fn evidence_json(entry: &EvidenceEntry) -> Value {
    let status = match &entry.digest {
        Digest::Pending => "pending",
        Digest::FileNotFound => "file_not_found",
        Digest::Sha256(_) => "sha256",
    };

    json!({
        "digest": entry.digest.as_str(),
        "status": status,
        "mode": entry.mode.as_ref().map(|m| m.label()),
        "mode_description": entry.mode.as_ref().map(|m| m.description()),
        "file_size": entry.file_size,
        "path": entry.path.as_ref().map(|p| p.display().to_string()),
        "source": entry.source.as_ref().map(|p| p.display().to_string()),
        "collection_time": entry.collection_time,
    })
}
