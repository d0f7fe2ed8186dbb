use thiserror::Error;

/// Error types for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] nexus_data::DataError),

    #[error("Run log error: {0}")]
    RunLog(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
