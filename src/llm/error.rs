//! LLM backend error types

use thiserror::Error;

/// Errors that can occur during LLM backend operations
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// API request failed with the given message
    #[error("API error: {message}")]
    ApiError { message: String },

    /// Request timed out after the specified duration (in seconds)
    #[error("Request timed out after {seconds} seconds")]
    TimeoutError { seconds: u64 },

    /// The LLM response could not be parsed into the expected shape
    #[error("Parse error: {message} (context: {context})")]
    ParseError { message: String, context: String },

    /// Generic error for other cases
    #[error("Error: {message}")]
    Other { message: String },
}
