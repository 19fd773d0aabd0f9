use std::fmt;

use thiserror::Error;

/// The three examiner-triggered actions, in the only order they may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    AcquireRam,
    ImageDisk,
    GenerateReport,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::AcquireRam, Step::ImageDisk, Step::GenerateReport];

    /// Button caption
    pub fn label(&self) -> &'static str {
        match self {
            Step::AcquireRam => "[1] ACQUIRE RAM",
            Step::ImageDisk => "[2] IMAGE DISK",
            Step::GenerateReport => "[3] GENERATE REPORT",
        }
    }

    /// The step this one unlocks on success
    pub fn next(&self) -> Option<Step> {
        match self {
            Step::AcquireRam => Some(Step::ImageDisk),
            Step::ImageDisk => Some(Step::GenerateReport),
            Step::GenerateReport => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::AcquireRam => "RAM acquisition",
            Step::ImageDisk => "Disk imaging",
            Step::GenerateReport => "Report generation",
        };
        f.write_str(name)
    }
}

/// Position of the session in the acquisition workflow.
///
/// `Idle → RamInProgress → RamDone → DiskInProgress → DiskDone →
/// ReportInProgress → ReportDone`. A failed step returns to the state it
/// started from. A report may be regenerated once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    RamInProgress,
    RamDone,
    DiskInProgress,
    DiskDone,
    ReportInProgress,
    ReportDone,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("{running} is still in progress")]
    Busy { running: Step },

    #[error("{step} is locked until the previous step succeeds")]
    Locked { step: Step, state: WorkflowState },

    #[error("{step} was not running (state {state:?})")]
    NotRunning { step: Step, state: WorkflowState },
}

impl WorkflowState {
    /// The step currently running, if any
    pub fn in_progress(self) -> Option<Step> {
        match self {
            WorkflowState::RamInProgress => Some(Step::AcquireRam),
            WorkflowState::DiskInProgress => Some(Step::ImageDisk),
            WorkflowState::ReportInProgress => Some(Step::GenerateReport),
            _ => None,
        }
    }

    pub fn is_available(self, step: Step) -> bool {
        self.begin(step).is_ok()
    }

    pub fn begin(self, step: Step) -> Result<WorkflowState, WorkflowError> {
        if let Some(running) = self.in_progress() {
            return Err(WorkflowError::Busy { running });
        }

        match (self, step) {
            (WorkflowState::Idle, Step::AcquireRam) => Ok(WorkflowState::RamInProgress),
            (WorkflowState::RamDone, Step::ImageDisk) => Ok(WorkflowState::DiskInProgress),
            (WorkflowState::DiskDone | WorkflowState::ReportDone, Step::GenerateReport) => {
                Ok(WorkflowState::ReportInProgress)
            }
            _ => Err(WorkflowError::Locked { step, state: self }),
        }
    }

    pub fn complete(self, step: Step) -> Result<WorkflowState, WorkflowError> {
        match (self, step) {
            (WorkflowState::RamInProgress, Step::AcquireRam) => Ok(WorkflowState::RamDone),
            (WorkflowState::DiskInProgress, Step::ImageDisk) => Ok(WorkflowState::DiskDone),
            (WorkflowState::ReportInProgress, Step::GenerateReport) => Ok(WorkflowState::ReportDone),
            _ => Err(WorkflowError::NotRunning { step, state: self }),
        }
    }

    pub fn abort(self, step: Step) -> Result<WorkflowState, WorkflowError> {
        match (self, step) {
            (WorkflowState::RamInProgress, Step::AcquireRam) => Ok(WorkflowState::Idle),
            (WorkflowState::DiskInProgress, Step::ImageDisk) => Ok(WorkflowState::RamDone),
            (WorkflowState::ReportInProgress, Step::GenerateReport) => Ok(WorkflowState::DiskDone),
            _ => Err(WorkflowError::NotRunning { step, state: self }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = WorkflowState::Idle;
        for step in Step::ALL {
            state = state.begin(step).unwrap();
            assert_eq!(state.in_progress(), Some(step));
            state = state.complete(step).unwrap();
        }
        assert_eq!(state, WorkflowState::ReportDone);
    }

    #[test]
    fn test_only_ram_is_available_at_start() {
        let idle = WorkflowState::Idle;
        assert!(idle.is_available(Step::AcquireRam));
        assert!(!idle.is_available(Step::ImageDisk));
        assert!(!idle.is_available(Step::GenerateReport));

        assert_eq!(
            idle.begin(Step::GenerateReport),
            Err(WorkflowError::Locked { step: Step::GenerateReport, state: idle })
        );
    }

    #[test]
    fn test_report_locked_until_disk_done() {
        assert!(!WorkflowState::RamDone.is_available(Step::GenerateReport));
        assert!(WorkflowState::DiskDone.is_available(Step::GenerateReport));
        assert!(WorkflowState::ReportDone.is_available(Step::GenerateReport));
    }

    #[test]
    fn test_completed_steps_do_not_rerun() {
        assert!(!WorkflowState::RamDone.is_available(Step::AcquireRam));
        assert!(!WorkflowState::DiskDone.is_available(Step::ImageDisk));
        assert!(!WorkflowState::ReportDone.is_available(Step::AcquireRam));
    }

    #[test]
    fn test_nothing_starts_while_busy() {
        let busy = WorkflowState::RamInProgress;
        for step in Step::ALL {
            assert_eq!(busy.begin(step), Err(WorkflowError::Busy { running: Step::AcquireRam }));
        }
    }

    #[test]
    fn test_abort_returns_to_starting_state() {
        assert_eq!(WorkflowState::RamInProgress.abort(Step::AcquireRam), Ok(WorkflowState::Idle));
        assert_eq!(WorkflowState::DiskInProgress.abort(Step::ImageDisk), Ok(WorkflowState::RamDone));
        assert_eq!(
            WorkflowState::ReportInProgress.abort(Step::GenerateReport),
            Ok(WorkflowState::DiskDone)
        );
    }

    #[test]
    fn test_complete_requires_matching_step() {
        assert!(WorkflowState::Idle.complete(Step::AcquireRam).is_err());
        assert!(WorkflowState::RamInProgress.complete(Step::ImageDisk).is_err());
        assert!(WorkflowState::DiskDone.abort(Step::ImageDisk).is_err());
    }

    #[test]
    fn test_next_step_chain() {
        assert_eq!(Step::AcquireRam.next(), Some(Step::ImageDisk));
        assert_eq!(Step::ImageDisk.next(), Some(Step::GenerateReport));
        assert_eq!(Step::GenerateReport.next(), None);
        assert_eq!(Step::ImageDisk.to_string(), "Disk imaging");
    }
}
