//! Utility functions for evidence handling.
//!
//! ## Components
//!
//! - **Hashing**: streaming SHA-256 with the file-not-found sentinel
//! - **Summary**: JSON evidence manifest written next to the report
//!
//! ### Hashing an Artifact
//!
//! ```no_run
//! use forensilock::utils::hash::calculate_sha256;
//! use std::path::Path;
//!
//! # fn example() -> std::io::Result<()> {
//! let digest = calculate_sha256(Path::new("evidence_locker/evidence_disk.img"))?;
//! println!("SHA-256: {}", digest);
//! # Ok(())
//! # }
//! ```

/// Evidence manifest generation
pub mod summary;

/// Cryptographic hash calculation utilities
pub mod hash;
