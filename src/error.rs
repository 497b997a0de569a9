use std::path::PathBuf;

/// Errors from the file and CLI surfaces. The scheduling functions
/// themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found {found:?}); need row, start and end")]
    MissingColumns { found: Vec<String> },

    #[error("no valid tasks found ({skipped} rows skipped)")]
    NoTasks { skipped: usize },

    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("unknown row '{0}'")]
    UnknownRow(String),

    #[error("row '{0}' is not available for scheduling")]
    RowUnavailable(String),

    #[error("task '{0}' is blocked and cannot be moved")]
    TaskBlocked(String),

    #[error("invalid timeline config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
