//! Runs one action off the interactive thread.
//!
//! The worker owns everything it needs and talks back over a channel: log
//! entries while it runs, then exactly one [`WorkerEvent::Finished`].

use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{debug, Level};

use crate::acquisition::{acquire_ram, image_disk, CaptureTool, ExternalTool, ImagingOptions, RamOptions};
use crate::bootstrap::Environment;
use crate::config::AcquisitionConfig;
use crate::error::AcquisitionError;
use crate::report::{generate_report, open_in_viewer, ReportData};
use crate::session::{ActionLog, LogEntry, Step, StepOutcome};

/// Message from a worker to the interactive thread
#[derive(Debug)]
pub enum WorkerEvent {
    Log(LogEntry),
    Finished(StepOutcome),
}

/// [`ActionLog`] that forwards entries over the worker channel
#[derive(Debug, Clone)]
pub struct ChannelLog {
    sender: Sender<WorkerEvent>,
}

impl ChannelLog {
    pub fn new(sender: Sender<WorkerEvent>) -> Self {
        Self { sender }
    }
}

impl ActionLog for ChannelLog {
    fn record(&self, level: Level, message: String) {
        // The receiver only goes away if the interactive thread is gone
        let _ = self.sender.send(WorkerEvent::Log(LogEntry::new(level, message)));
    }
}

/// Everything one action needs, owned so it can move to a worker thread
#[derive(Debug, Clone)]
pub enum StepJob {
    AcquireRam {
        capture_tool: PathBuf,
        output: PathBuf,
        options: RamOptions,
    },
    ImageDisk {
        source: PathBuf,
        destination: PathBuf,
        options: ImagingOptions,
    },
    GenerateReport {
        data: ReportData,
        report_path: PathBuf,
        manifest_path: PathBuf,
        open_report: bool,
    },
}

impl StepJob {
    pub fn acquire_ram(config: &AcquisitionConfig, env: &Environment) -> Self {
        StepJob::AcquireRam {
            capture_tool: env.capture_tool.clone(),
            output: env.ram_artifact_path(),
            options: RamOptions {
                fallback_size: config.ram_fallback_size,
                hash_block_size: config.hash_block_size,
            },
        }
    }

    pub fn image_disk(config: &AcquisitionConfig, env: &Environment) -> Self {
        StepJob::ImageDisk {
            source: env.target_path.clone(),
            destination: env.disk_artifact_path(),
            options: ImagingOptions {
                chunk_size: config.copy_chunk_size,
                hash_block_size: config.hash_block_size,
            },
        }
    }

    pub fn generate_report(config: &AcquisitionConfig, env: &Environment, data: ReportData) -> Self {
        StepJob::GenerateReport {
            data,
            report_path: env.report_path.clone(),
            manifest_path: env.manifest_path(),
            open_report: config.open_report,
        }
    }

    pub fn step(&self) -> Step {
        match self {
            StepJob::AcquireRam { .. } => Step::AcquireRam,
            StepJob::ImageDisk { .. } => Step::ImageDisk,
            StepJob::GenerateReport { .. } => Step::GenerateReport,
        }
    }
}

/// Run `job` on the current thread
pub fn run_job(job: StepJob, log: &dyn ActionLog) -> StepOutcome {
    match job {
        StepJob::AcquireRam { capture_tool, output, options } => {
            // Re-detect: the tool may have been added or removed since startup
            let tool = ExternalTool::detect(&capture_tool);
            let tool = tool.as_ref().map(|t| t as &dyn CaptureTool);
            StepOutcome::Ram(acquire_ram(tool, &output, options, log))
        }
        StepJob::ImageDisk { source, destination, options } => {
            StepOutcome::Disk(image_disk(&source, &destination, options, log))
        }
        StepJob::GenerateReport { data, report_path, manifest_path, open_report } => {
            let result = generate_report(&data, &report_path, &manifest_path, log);
            if open_report {
                if let Ok(artifacts) = &result {
                    open_in_viewer(&artifacts.report, log);
                }
            }
            StepOutcome::Report(result)
        }
    }
}

/// A running action
pub struct StepHandle {
    step: Step,
    events: Receiver<WorkerEvent>,
    thread: JoinHandle<()>,
}

impl StepHandle {
    pub fn step(&self) -> Step {
        self.step
    }

    /// Block until the action finishes, handing each log entry to `on_log` as it arrives.
    ///
    /// A worker that dies without reporting yields a [`AcquisitionError::WorkerLost`] failure.
    pub fn wait(self, mut on_log: impl FnMut(LogEntry)) -> StepOutcome {
        let mut outcome = None;
        for event in self.events.iter() {
            match event {
                WorkerEvent::Log(entry) => on_log(entry),
                WorkerEvent::Finished(result) => {
                    outcome = Some(result);
                    break;
                }
            }
        }

        if self.thread.join().is_err() {
            debug!("{} worker panicked", self.step);
        }

        outcome.unwrap_or_else(|| StepOutcome::failure(self.step, AcquisitionError::WorkerLost))
    }
}

/// Start `job` on a dedicated named thread
pub fn spawn_step(job: StepJob) -> Result<StepHandle> {
    let step = job.step();
    let (sender, events) = unbounded::<WorkerEvent>();

    let thread = thread::Builder::new()
        .name(format!("forensilock-{:?}", step).to_lowercase())
        .spawn(move || {
            let log = ChannelLog::new(sender.clone());
            let outcome = run_job(job, &log);
            let _ = sender.send(WorkerEvent::Finished(outcome));
        })
        .context(format!("Failed to start worker for {}", step))?;

    Ok(StepHandle { step, events, thread })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CaseSession;
    use std::fs;
    use tempfile::TempDir;

    fn small_config(dir: &TempDir) -> AcquisitionConfig {
        AcquisitionConfig {
            work_dir: Some(dir.path().to_path_buf()),
            ram_fallback_size: 64 * 1024,
            target_placeholder_size: 32 * 1024,
            copy_chunk_size: 4096,
            hash_block_size: 4096,
            capture_tool: PathBuf::from("no-such-capture-tool"),
            open_report: false,
            ..AcquisitionConfig::default()
        }
    }

    #[test]
    fn test_worker_streams_logs_then_finishes() {
        let temp_dir = TempDir::new().unwrap();
        let config = small_config(&temp_dir);
        let env = Environment::resolve(&config).unwrap();
        fs::create_dir_all(&env.evidence_dir).unwrap();

        let handle = spawn_step(StepJob::acquire_ram(&config, &env)).unwrap();
        assert_eq!(handle.step(), Step::AcquireRam);

        let mut messages = Vec::new();
        let outcome = handle.wait(|entry| messages.push(entry.message));

        assert!(outcome.is_success());
        assert!(messages.iter().any(|m| m.contains("Fail-Safe Acquisition Mode")));
        assert!(messages.last().unwrap().starts_with("RAM HASH:"));
    }

    #[test]
    fn test_failed_job_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let config = small_config(&temp_dir);
        let env = Environment::resolve(&config).unwrap();
        fs::create_dir_all(&env.evidence_dir).unwrap();

        // No target drive was created
        let outcome = spawn_step(StepJob::image_disk(&config, &env)).unwrap().wait(|_| {});

        assert_eq!(outcome.step(), Step::ImageDisk);
        assert!(matches!(outcome, StepOutcome::Disk(Err(AcquisitionError::SourceMissing(_)))));
    }

    #[test]
    fn test_report_job_uses_session_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let config = small_config(&temp_dir);
        let env = Environment::resolve(&config).unwrap();
        fs::create_dir_all(&env.evidence_dir).unwrap();
        let session = CaseSession::new();

        let job = StepJob::generate_report(&config, &env, session.report_data(&config.case_id));
        let outcome = run_job(job, session.log());

        match outcome {
            StepOutcome::Report(Ok(artifacts)) => {
                assert_eq!(artifacts.report, env.report_path);
                assert!(artifacts.manifest.exists());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(session.log().contains("Report Saved"));
    }
}
