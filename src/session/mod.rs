//! Case session: the evidence collected so far, the workflow state and the log.
//!
//! A [`CaseSession`] is owned by the interactive thread. Actions run on a
//! worker and hand their [`StepOutcome`] back; only the session applies it,
//! so there is a single writer for every piece of shared state.

mod journal;
mod state;

pub use journal::{ActionLog, CaseLog, LogEntry};
pub use state::{Step, WorkflowError, WorkflowState};

use crate::error::AcquisitionError;
use crate::models::{Digest, DiskImage, RamAcquisition};
use crate::report::{ReportArtifacts, ReportData};

/// What a finished action produced
#[derive(Debug)]
pub enum StepOutcome {
    Ram(Result<RamAcquisition, AcquisitionError>),
    Disk(Result<DiskImage, AcquisitionError>),
    Report(Result<ReportArtifacts, AcquisitionError>),
}

impl StepOutcome {
    pub fn step(&self) -> Step {
        match self {
            StepOutcome::Ram(_) => Step::AcquireRam,
            StepOutcome::Disk(_) => Step::ImageDisk,
            StepOutcome::Report(_) => Step::GenerateReport,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            StepOutcome::Ram(r) => r.is_ok(),
            StepOutcome::Disk(r) => r.is_ok(),
            StepOutcome::Report(r) => r.is_ok(),
        }
    }

    /// A failed outcome for `step`
    pub fn failure(step: Step, error: AcquisitionError) -> Self {
        match step {
            Step::AcquireRam => StepOutcome::Ram(Err(error)),
            Step::ImageDisk => StepOutcome::Disk(Err(error)),
            Step::GenerateReport => StepOutcome::Report(Err(error)),
        }
    }
}

#[derive(Debug)]
pub struct CaseSession {
    state: WorkflowState,
    ram: Option<RamAcquisition>,
    disk: Option<DiskImage>,
    report: Option<ReportArtifacts>,
    log: CaseLog,
}

impl Default for CaseSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseSession {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            ram: None,
            disk: None,
            report: None,
            log: CaseLog::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn ram(&self) -> Option<&RamAcquisition> {
        self.ram.as_ref()
    }

    pub fn disk(&self) -> Option<&DiskImage> {
        self.disk.as_ref()
    }

    pub fn last_report(&self) -> Option<&ReportArtifacts> {
        self.report.as_ref()
    }

    /// RAM digest, `PENDING` until the acquisition succeeds
    pub fn ram_digest(&self) -> Digest {
        self.ram
            .as_ref()
            .map(|r| r.artifact.digest.clone())
            .unwrap_or_default()
    }

    /// Disk digest, `PENDING` until imaging succeeds
    pub fn disk_digest(&self) -> Digest {
        self.disk
            .as_ref()
            .map(|d| d.artifact.digest.clone())
            .unwrap_or_default()
    }

    pub fn log(&self) -> &CaseLog {
        &self.log
    }

    /// Mark `step` as running. Fails if another step is running or `step` is locked.
    pub fn begin(&mut self, step: Step) -> Result<(), WorkflowError> {
        self.state = self.state.begin(step)?;
        Ok(())
    }

    /// Apply a finished action.
    ///
    /// Success records the result and unlocks the next step. Failure is logged
    /// and returns the workflow to where the step started; evidence from
    /// earlier steps is kept.
    pub fn finish(&mut self, outcome: StepOutcome) -> Result<(), WorkflowError> {
        let step = outcome.step();
        if self.state.in_progress() != Some(step) {
            return Err(WorkflowError::NotRunning { step, state: self.state });
        }

        let failure = match outcome {
            StepOutcome::Ram(Ok(ram)) => {
                self.ram = Some(ram);
                None
            }
            StepOutcome::Disk(Ok(disk)) => {
                self.disk = Some(disk);
                None
            }
            StepOutcome::Report(Ok(report)) => {
                self.report = Some(report);
                None
            }
            StepOutcome::Ram(Err(e)) | StepOutcome::Disk(Err(e)) | StepOutcome::Report(Err(e)) => {
                Some(e)
            }
        };

        match failure {
            None => {
                self.state = self.state.complete(step)?;
            }
            Some(e) => {
                self.log.error(&format!("{} failed: {}", step, e));
                self.state = self.state.abort(step)?;
            }
        }
        Ok(())
    }

    /// Snapshot of the evidence for a report generated now
    pub fn report_data(&self, case_id: &str) -> ReportData {
        ReportData::new(case_id, self.ram.as_ref(), self.disk.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcquisitionMode, ArtifactMetadata};
    use std::path::PathBuf;

    fn artifact(name: &str, hex: char) -> ArtifactMetadata {
        ArtifactMetadata {
            path: PathBuf::from(name),
            file_size: 10,
            digest: Digest::Sha256(hex.to_string().repeat(64)),
            collection_time: "2026-10-16T09:00:00+00:00".to_string(),
            duration_seconds: 0.1,
        }
    }

    fn ram_ok() -> StepOutcome {
        StepOutcome::Ram(Ok(RamAcquisition {
            artifact: artifact("evidence_ram.raw", 'a'),
            mode: AcquisitionMode::Simulated,
        }))
    }

    fn disk_ok() -> StepOutcome {
        StepOutcome::Disk(Ok(DiskImage {
            source: PathBuf::from("suspect_drive.img"),
            artifact: artifact("evidence_disk.img", 'b'),
        }))
    }

    #[test]
    fn test_new_session_is_idle_and_pending() {
        let session = CaseSession::new();
        assert_eq!(session.state(), WorkflowState::Idle);
        assert_eq!(session.ram_digest(), Digest::Pending);
        assert_eq!(session.disk_digest(), Digest::Pending);
        assert!(session.log().is_empty());
    }

    #[test]
    fn test_successful_steps_unlock_in_order() {
        let mut session = CaseSession::new();
        assert!(session.begin(Step::ImageDisk).is_err());

        session.begin(Step::AcquireRam).unwrap();
        session.finish(ram_ok()).unwrap();
        assert_eq!(session.state(), WorkflowState::RamDone);
        assert_eq!(session.ram_digest().as_str(), "a".repeat(64));

        session.begin(Step::ImageDisk).unwrap();
        session.finish(disk_ok()).unwrap();
        assert_eq!(session.state(), WorkflowState::DiskDone);

        let data = session.report_data("HACKATHON-2026");
        assert_eq!(data.disk.digest.as_str(), "b".repeat(64));
        assert_eq!(data.ram.mode, Some(AcquisitionMode::Simulated));
    }

    #[test]
    fn test_failure_returns_to_start_and_keeps_evidence() {
        let mut session = CaseSession::new();
        session.begin(Step::AcquireRam).unwrap();
        session.finish(ram_ok()).unwrap();

        session.begin(Step::ImageDisk).unwrap();
        let missing = AcquisitionError::SourceMissing(PathBuf::from("suspect_drive.img"));
        session.finish(StepOutcome::failure(Step::ImageDisk, missing)).unwrap();

        assert_eq!(session.state(), WorkflowState::RamDone);
        assert!(session.ram().is_some());
        assert_eq!(session.disk_digest(), Digest::Pending);
        assert!(session.log().contains("Disk imaging failed"));
    }

    #[test]
    fn test_begin_while_running_is_busy() {
        let mut session = CaseSession::new();
        session.begin(Step::AcquireRam).unwrap();
        assert_eq!(
            session.begin(Step::AcquireRam),
            Err(WorkflowError::Busy { running: Step::AcquireRam })
        );
    }

    #[test]
    fn test_finish_for_wrong_step_is_rejected() {
        let mut session = CaseSession::new();
        session.begin(Step::AcquireRam).unwrap();
        assert!(session.finish(disk_ok()).is_err());
        assert_eq!(session.state(), WorkflowState::RamInProgress);
        assert!(session.disk().is_none());
    }
}
