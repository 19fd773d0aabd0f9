//! Interactive acquisition console.
//!
//! Presents the three actions as a menu, greys out the ones the workflow has
//! not unlocked yet, runs the chosen action on a worker thread behind a
//! spinner and streams its log lines as they arrive.

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::Level;

use crate::bootstrap::Environment;
use crate::config::AcquisitionConfig;
use crate::constants::{APP_NAME, REPORT_TITLE};
use crate::error::AcquisitionError;
use crate::session::{CaseSession, LogEntry, Step, StepOutcome};
use crate::worker::{spawn_step, StepJob};

pub struct Shell {
    config: AcquisitionConfig,
    env: Environment,
    session: CaseSession,
    /// Log entries already written to the terminal
    printed: usize,
}

impl Shell {
    pub fn new(config: AcquisitionConfig, env: Environment, session: CaseSession) -> Self {
        Self {
            config,
            env,
            session,
            printed: 0,
        }
    }

    pub fn session(&self) -> &CaseSession {
        &self.session
    }

    /// Menu loop. Returns when the examiner chooses Exit.
    pub fn run_interactive(&mut self) -> Result<()> {
        let theme = ColorfulTheme::default();
        self.print_banner();
        self.print_new_entries();

        loop {
            self.print_status();
            let state = self.session.state();

            let mut items: Vec<String> = Step::ALL
                .iter()
                .map(|step| {
                    if state.is_available(*step) {
                        step.label().to_string()
                    } else {
                        format!("{} (locked)", step.label())
                    }
                })
                .collect();
            items.push("Exit".to_string());

            let default = Step::ALL
                .iter()
                .position(|step| state.is_available(*step))
                .unwrap_or(Step::ALL.len());

            let selection = Select::with_theme(&theme)
                .with_prompt("Select action")
                .items(&items)
                .default(default)
                .interact()
                .context("Failed to read menu selection")?;

            let Some(step) = Step::ALL.get(selection).copied() else {
                break;
            };

            if !state.is_available(step) {
                println!(
                    "{}",
                    style(format!("{} is locked until the previous step succeeds.", step)).yellow()
                );
                continue;
            }

            let mut next = Some(step);
            while let Some(current) = next.take() {
                if !self.run_step(current)? {
                    break;
                }
                if let Some(prompt) = confirmation_prompt(current) {
                    let proceed = Confirm::with_theme(&theme)
                        .with_prompt(prompt)
                        .default(true)
                        .interact()
                        .context("Failed to read confirmation")?;
                    if proceed {
                        next = current.next();
                    }
                }
            }
        }

        println!("{}", style("Session closed.").cyan());
        Ok(())
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Returns whether all three steps succeeded.
    pub fn run_batch(&mut self) -> Result<bool> {
        self.print_banner();
        self.print_new_entries();

        for step in Step::ALL {
            if !self.run_step(step)? {
                self.print_status();
                return Ok(false);
            }
        }

        self.print_status();
        Ok(true)
    }

    /// Run one step on a worker thread and apply its outcome to the session.
    ///
    /// Returns whether the step succeeded. Action failures are logged, not
    /// returned; only a rejected transition or a broken terminal is an error.
    pub fn run_step(&mut self, step: Step) -> Result<bool> {
        self.session.begin(step)?;

        let job = match step {
            Step::AcquireRam => StepJob::acquire_ram(&self.config, &self.env),
            Step::ImageDisk => StepJob::image_disk(&self.config, &self.env),
            Step::GenerateReport => StepJob::generate_report(
                &self.config,
                &self.env,
                self.session.report_data(&self.config.case_id),
            ),
        };

        let handle = match spawn_step(job) {
            Ok(handle) => handle,
            Err(e) => {
                self.session
                    .finish(StepOutcome::failure(step, AcquisitionError::WorkerLost))?;
                self.print_new_entries();
                return Err(e);
            }
        };

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid spinner template")?,
        );
        spinner.set_message(format!("{} in progress...", step));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let log = self.session.log();
        let outcome = handle.wait(|entry| {
            spinner.println(styled_line(&entry));
            log.push(entry);
        });
        spinner.finish_and_clear();
        self.printed = self.session.log().len();

        let success = outcome.is_success();
        self.session.finish(outcome)?;
        self.print_new_entries();
        Ok(success)
    }

    fn print_banner(&self) {
        println!();
        println!("{}", style(format!("=== {} ===", APP_NAME)).green().bold());
        println!("{}", style(REPORT_TITLE).green());
        println!("Case ID:   {}", self.config.case_id);
        println!("Work dir:  {}", self.env.work_dir.display());
        println!("Evidence:  {}", self.env.evidence_dir.display());
        println!();
    }

    fn print_status(&self) {
        println!();
        println!("{}", style("Evidence Status:").cyan().bold());
        println!("  Workflow:  {:?}", self.session.state());
        println!("  RAM HASH:  {}", self.session.ram_digest());
        if let Some(ram) = self.session.ram() {
            println!("             {}", ram.mode.description());
        }
        println!("  DISK HASH: {}", self.session.disk_digest());
        if let Some(report) = self.session.last_report() {
            println!("  Report:    {}", report.report.display());
        }
        println!();
    }

    fn print_new_entries(&mut self) {
        for entry in self.session.log().entries_since(self.printed) {
            println!("{}", styled_line(&entry));
        }
        self.printed = self.session.log().len();
    }
}

/// Prompt shown after `step` succeeds, if it unlocks another step
fn confirmation_prompt(step: Step) -> Option<&'static str> {
    match step {
        Step::AcquireRam => Some("RAM secured. Proceed to disk imaging?"),
        Step::ImageDisk => Some("Disk secured. Generate report?"),
        Step::GenerateReport => None,
    }
}

fn styled_line(entry: &LogEntry) -> String {
    let line = entry.formatted();
    match entry.level {
        Level::Error => style(line).red().bold().to_string(),
        Level::Warn => style(line).yellow().to_string(),
        _ => style(line).green().to_string(),
    }
}
