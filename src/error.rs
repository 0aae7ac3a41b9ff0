use std::error::Error;
use std::fmt;

/// Custom error type for pipeline failures.
///
/// Every variant is fatal: the run is an offline batch computation, so a
/// failed stage propagates to the caller and halts the run.
#[derive(Debug)]
pub enum PipelineError {
    /// Input directory missing, or a required class directory has no images.
    ResourceNotFound(String),
    /// Malformed split ratio, sample cap, or hyperparameter.
    InvalidArgument(String),
    /// A model was queried before `fit` completed.
    InvalidState(&'static str),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::ResourceNotFound(what) => write!(f, "resource not found: {}", what),
            PipelineError::InvalidArgument(what) => write!(f, "invalid argument: {}", what),
            PipelineError::InvalidState(what) => write!(f, "invalid state: {}", what),
        }
    }
}

impl Error for PipelineError {}
