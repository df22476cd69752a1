//! Content Client Traits
//!
//! The generative service is reached through [`ContentClient`]. Every call
//! returns a [`GenerationResult`]; nothing is raised past the client. The
//! [`FailureReason`] carried by a failed result tells the orchestrator whether
//! the failure is an expected per-field miss (absorbed with a fallback) or a
//! transport-level fault (aborts the rest of the run).

use async_trait::async_trait;
use thiserror::Error;

use crate::colors::HexColor;

/// Why a generation call did not produce a value
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The service answered with a non-success status
    #[error("service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (may be empty)
        body: String,
    },

    /// The service answered successfully but with no choices/images
    #[error("service returned no results")]
    NoResults,

    /// The request could not be sent or the response could not be read
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FailureReason {
    /// Whether this failure aborts the remaining pipeline stages
    ///
    /// Status and empty-result failures are expected and absorbed per field.
    /// Transport and decoding faults abort the run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Malformed(_))
    }
}

/// Outcome of one content client call
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum GenerationResult<T> {
    /// The call produced a value
    Ok(T),
    /// The call failed
    Failed(FailureReason),
}

impl<T> GenerationResult<T> {
    /// Whether the call produced a value
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The value, discarding any failure
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Transform the value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GenerationResult<U> {
        match self {
            Self::Ok(value) => GenerationResult::Ok(f(value)),
            Self::Failed(reason) => GenerationResult::Failed(reason),
        }
    }

    /// Convert to a standard `Result`
    ///
    /// # Errors
    ///
    /// Returns the failure reason if the call failed.
    pub fn into_result(self) -> Result<T, FailureReason> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Failed(reason) => Err(reason),
        }
    }
}

impl<T> From<Result<T, FailureReason>> for GenerationResult<T> {
    fn from(result: Result<T, FailureReason>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(reason) => Self::Failed(reason),
        }
    }
}

/// Adapter to the remote generative service
///
/// Implementations hold no per-session state. Text results are returned
/// trimmed but otherwise untouched; word limits and fallbacks are applied by
/// the orchestrator.
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Get the client name (e.g., "OpenAI")
    fn name(&self) -> &str;

    /// Ask for a catchy ad title for the seed text
    async fn request_title(&self, seed: &str) -> GenerationResult<String>;

    /// Ask for ad body copy for the seed text
    async fn request_description(&self, seed: &str) -> GenerationResult<String>;

    /// Ask for a call to action for the seed text
    async fn request_cta(&self, seed: &str) -> GenerationResult<String>;

    /// Ask for one square image built from the generated copy and accent colors
    ///
    /// Returns the URL of the first generated image.
    async fn request_image(
        &self,
        title: &str,
        description: &str,
        colors: &[HexColor; 3],
    ) -> GenerationResult<String>;
}
