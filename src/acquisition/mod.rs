//! The two evidence acquisition actions.
//!
//! - **RAM**: external capture tool, or a clearly tagged simulated artifact
//! - **Disk**: chunked bit-stream copy of the target drive
//!
//! Both hash their artifact after it is fully written and report progress
//! through an [`ActionLog`](crate::session::ActionLog).

/// External RAM capture tools
pub mod capture_tool;

/// RAM acquisition with simulated fallback
pub mod ram;

/// Disk imaging by chunked copy
pub mod disk;

pub use capture_tool::{CaptureExit, CaptureTool, ExternalTool};
pub use disk::{image_disk, ImagingOptions};
pub use ram::{acquire_ram, RamOptions};
