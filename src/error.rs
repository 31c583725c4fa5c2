use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the capture instrument abstraction.
///
/// Import keeps a lenient ingestion policy: malformed fields and short rows
/// are absorbed while parsing, so only failures that prevent any progress at
/// all show up here.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open waveform file {}", .path.display())]
    ImportOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid instrument configuration: {0}")]
    Config(#[from] serde_json::Error),
}
