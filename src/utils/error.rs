use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("malformed record {line:?}: {reason}")]
    Parse { line: String, reason: String },

    #[error("batch persistence failed: {0}")]
    Persistence(String),

    #[error("dispatch interrupted before all batches were submitted")]
    DispatchInterrupted,

    #[error("batch worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("import failed after committing {committed} records: {source}")]
    ImportFailed {
        committed: usize,
        #[source]
        source: Box<ImportError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },
}

impl ImportError {
    /// Number of records durably committed before the failure surfaced, if
    /// this error carries one. A failed import is partially applied, not
    /// rolled back.
    pub fn committed(&self) -> Option<usize> {
        match self {
            ImportError::ImportFailed { committed, .. } => Some(*committed),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
