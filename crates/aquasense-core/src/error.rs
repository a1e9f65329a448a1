//! Error types for AquaSense operations.
//!
//! This module defines the error variants raised by the questionnaire
//! workflow, the client storage and HTTP adapters, configuration loading and
//! the dashboard widgets. All errors use `thiserror`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Comprehensive error type for AquaSense operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AquaError {
    // Form errors
    /// Field name does not belong to the questionnaire.
    #[error("unknown questionnaire field: {0}")]
    UnknownField(String),

    /// A field expected to hold a number does not.
    #[error("field {0} does not hold a valid number")]
    InvalidNumber(String),

    /// A submission is already in flight for this workflow.
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    // Session errors
    /// No user record in client storage, or one without a usable id.
    #[error("user id not found in client storage")]
    MissingUser,

    /// No authorization token in client storage.
    #[error("authorization token not found in client storage")]
    MissingToken,

    // Client storage errors
    /// Client storage could not be read.
    #[error("storage read error: {0}")]
    StorageRead(String),

    /// Client storage could not be written.
    #[error("storage write error: {0}")]
    StorageWrite(String),

    /// Client storage file exists but is not a JSON object.
    #[error("corrupted storage file: {0}")]
    CorruptedStorage(PathBuf),

    // HTTP errors
    /// The HTTP client could not be constructed.
    #[error("http client build error: {0}")]
    HttpClientBuild(String),

    /// A request could not be sent or its body could not be read.
    #[error("request to {url} failed: {message}")]
    Request {
        /// Target URL.
        url: String,
        /// Underlying transport error.
        message: String,
    },

    /// Endpoint answered with a non-success status.
    #[error("{url} returned status {status}")]
    UnexpectedStatus {
        /// Target URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Endpoint answered with a body that does not match the expected shape.
    #[error("malformed response from {url}: {message}")]
    MalformedResponse {
        /// Target URL.
        url: String,
        /// Parse failure.
        message: String,
    },

    // Config errors
    /// Invalid configuration detected.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Error parsing configuration file.
    #[error("config parse error: {0}")]
    ConfigParseError(String),

    // Widget errors
    /// Daily quota must be a positive, finite number of litres.
    #[error("invalid daily quota: {0}")]
    InvalidQuota(f64),

    // View errors
    /// Rendering a terminal view failed.
    #[error("view error: {0}")]
    View(#[from] aquasense_views::ViewError),

    // IO and serialization errors
    /// Standard IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for AquaSense operations.
pub type Result<T> = std::result::Result<T, AquaError>;

/// Stage of the prediction round trip that failed.
///
/// The user-facing policy is the same for every stage (generic alert, then
/// the dashboard), but callers and logs can tell the stages apart.
#[derive(Debug)]
pub enum SubmissionFailure {
    /// The stored user record could not be read or is not valid JSON.
    UserRecord(AquaError),

    /// `POST /predict` failed or returned an unusable body.
    Prediction(AquaError),

    /// `POST /api/predictions` failed, or no token was stored.
    RemoteStorage(AquaError),

    /// Writing `predictedUsage` to client storage failed.
    LocalStorage(AquaError),
}

impl SubmissionFailure {
    /// Short name of the failing stage.
    pub fn stage(&self) -> &'static str {
        match self {
            SubmissionFailure::UserRecord(_) => "user-record",
            SubmissionFailure::Prediction(_) => "prediction",
            SubmissionFailure::RemoteStorage(_) => "remote-storage",
            SubmissionFailure::LocalStorage(_) => "local-storage",
        }
    }

    /// The underlying error.
    pub fn error(&self) -> &AquaError {
        match self {
            SubmissionFailure::UserRecord(e)
            | SubmissionFailure::Prediction(e)
            | SubmissionFailure::RemoteStorage(e)
            | SubmissionFailure::LocalStorage(e) => e,
        }
    }
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage(), self.error())
    }
}

impl std::error::Error for SubmissionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error())
    }
}
