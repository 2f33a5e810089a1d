//! Error taxonomy of the prediction pipeline.

use std::path::PathBuf;

use car_structs::CategoricalField;
use ml_model::{ArtifactError, ModelError};

use crate::validator::Violation;

/// Everything that can stop a prediction or a cold start.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// One or more numeric inputs are outside the training range.
    #[error("invalid inputs: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    /// A categorical input was never seen in training.
    #[error("unknown category {value:?} for {column}")]
    UnknownCategory {
        column: CategoricalField,
        value: String,
    },

    /// The source dataset is needed for import but cannot be opened.
    #[error("source dataset unavailable at {path}: {source}")]
    DataSourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source dataset does not match the expected layout.
    #[error("source dataset at {path} is malformed: {reason}")]
    DatasetFormat { path: PathBuf, reason: String },

    /// The record store could not be reached or rejected a query.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    /// The persisted artifact exists but does not decode.
    #[error("model artifact at {path} is corrupt: {source}")]
    ArtifactCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact could not be read or written.
    #[error("model artifact I/O failed: {0}")]
    ArtifactIo(#[source] ArtifactError),

    /// Fitting the model failed.
    #[error("model training failed: {0}")]
    Training(#[source] ModelError),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Whether the caller can fix the request and try again.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnknownCategory { .. })
    }
}

impl From<ModelError> for PipelineError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownCategory { column, value } => Self::UnknownCategory { column, value },
            other => Self::Training(other),
        }
    }
}

impl From<ArtifactError> for PipelineError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Corrupt { path, source } => Self::ArtifactCorrupt { path, source },
            other => Self::ArtifactIo(other),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
