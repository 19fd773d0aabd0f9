use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that terminate a single acquisition action.
///
/// None of these are fatal to the process: the action that raised it is
/// aborted and the examiner can trigger it again.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Source {} is missing", .0.display())]
    SourceMissing(PathBuf),

    #[error("Destination {} was not created", .0.display())]
    DestinationMissing(PathBuf),

    #[error("Failed to launch capture tool {}: {source}", .tool.display())]
    ToolLaunch {
        tool: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Report generation failed: {0}")]
    Report(String),

    #[error("Worker thread ended without reporting a result")]
    WorkerLost,
}

impl AcquisitionError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        AcquisitionError::Io {
            context: context.into(),
            source,
        }
    }
}
