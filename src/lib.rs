//! # ForensiLock
//!
//! Evidence acquisition console: captures RAM (or writes a clearly tagged
//! simulated artifact when no capture tool is available), bit-stream images a
//! target drive file, fingerprints both with SHA-256 and writes a chain of
//! custody report.
//!
//! ## Workflow
//!
//! The three actions are strictly ordered. Each unlocks the next on success:
//!
//! ```text
//! Idle -> RamInProgress -> RamDone -> DiskInProgress -> DiskDone -> ReportInProgress -> ReportDone
//! ```
//!
//! A failed action returns to the state it started from and can be retried.
//!
//! ## Usage
//!
//! ```no_run
//! use forensilock::bootstrap::bootstrap;
//! use forensilock::config::AcquisitionConfig;
//! use forensilock::session::{CaseSession, Step};
//! use forensilock::shell::Shell;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = AcquisitionConfig::default();
//! let session = CaseSession::new();
//! let env = bootstrap(&config, session.log())?;
//!
//! let mut shell = Shell::new(config, env, session);
//! for step in Step::ALL {
//!     if !shell.run_step(step)? {
//!         break;
//!     }
//! }
//! println!("RAM HASH:  {}", shell.session().ram_digest());
//! println!("DISK HASH: {}", shell.session().disk_digest());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`acquisition`]: RAM capture with simulated fallback, disk imaging
//! - [`bootstrap`]: startup checks and evidence layout
//! - [`config`]: YAML configuration
//! - [`report`]: PDF report and JSON manifest
//! - [`session`]: case state, workflow state machine, session log
//! - [`shell`]: interactive console
//! - [`worker`]: background execution of one action
//! - [`utils`]: hashing and manifest helpers
//! - [`privileges`]: elevation checks

pub mod acquisition;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod privileges;
pub mod report;
pub mod session;
pub mod shell;
pub mod utils;
pub mod worker;
