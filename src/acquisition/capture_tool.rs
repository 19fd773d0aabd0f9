use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

/// Exit information from a capture tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureExit {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

/// A program that dumps physical memory to the path it is given.
#[cfg_attr(test, mockall::automock)]
pub trait CaptureTool: Send + Sync {
    /// Display name for logs and reports
    fn name(&self) -> String;

    fn location(&self) -> PathBuf;

    /// Run the capture, writing the dump to `output`.
    ///
    /// An `Err` means the tool could not be started at all.
    fn capture(&self, output: &Path) -> io::Result<CaptureExit>;
}

/// Capture tool invoked as a subprocess with the output path as its only argument
#[derive(Debug, Clone)]
pub struct ExternalTool {
    path: PathBuf,
}

impl ExternalTool {
    /// Returns the tool only if `path` is an existing file
    pub fn detect(path: &Path) -> Option<Self> {
        if path.is_file() {
            Some(Self { path: path.to_path_buf() })
        } else {
            debug!("Capture tool not found at {}", path.display());
            None
        }
    }
}

impl CaptureTool for ExternalTool {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    fn capture(&self, output: &Path) -> io::Result<CaptureExit> {
        debug!("Running {} {}", self.path.display(), output.display());
        let result = Command::new(&self.path).arg(output).output()?;

        Ok(CaptureExit {
            success: result.status.success(),
            code: result.status.code(),
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        })
    }
}
