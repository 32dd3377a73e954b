use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No API key is configured and mock mode is off.
    #[error("API key is not configured")]
    NotConfigured,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request to the endpoint failed before a response was received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returned a non-2xx status code.
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response from the endpoint was unexpected. (e.g. no choices in a
    /// chat completion)
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A persistence write failed. Reads never error; they fall back to
    /// defaults.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
