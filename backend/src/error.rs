//! Error types, one enum per concern.
//!
//! Only [`SubmissionError`] ever reaches an HTTP client. `TransmissionError` is
//! folded into the forwarding sub-result because, by the time it can happen,
//! the ledger already holds the row.

use actix_web::http::StatusCode;
use common::submission::SubmissionStage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("cannot read service account key {path}: {message}")]
    ServiceAccountKey { path: String, message: String },
}

/// Which of the two ledger calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerStep {
    InsertRow,
    WriteRow,
}

impl std::fmt::Display for LedgerStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerStep::InsertRow => f.write_str("row insert"),
            LedgerStep::WriteRow => f.write_str("row write"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("access token request failed: {0}")]
    Auth(String),

    #[error("ledger request failed: {0}")]
    Transport(String),

    #[error("ledger API responded with status {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum TransmissionError {
    #[error("cannot read image {path}: {source}")]
    ReadImage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("chat request failed: {0}")]
    Transport(String),

    #[error("chat API responded with status {status}: {description}")]
    Api { status: u16, description: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot create uploads directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write attachment {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything that makes a submission fail as a whole.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid shift report: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{step} failed: {source}")]
    Ledger {
        step: LedgerStep,
        #[source]
        source: LedgerError,
    },
}

impl SubmissionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SubmissionError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Storage(_) | SubmissionError::Ledger { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The last stage the request reached before failing.
    pub fn reached_stage(&self) -> SubmissionStage {
        match self {
            SubmissionError::Validation(_) => SubmissionStage::Received,
            SubmissionError::Storage(_) => SubmissionStage::Calculated,
            SubmissionError::Ledger {
                step: LedgerStep::InsertRow,
                ..
            } => SubmissionStage::Calculated,
            SubmissionError::Ledger {
                step: LedgerStep::WriteRow,
                ..
            } => SubmissionStage::RowInserted,
        }
    }
}

/// Anything that stops the server from starting or keeps it from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
