use std::path::PathBuf;

use car_structs::CategoricalField;

/// Errors raised while encoding, fitting or scoring.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A categorical value was not seen when the encoders were fitted.
    #[error("unknown category {value:?} for column {column}")]
    UnknownCategory {
        column: CategoricalField,
        value: String,
    },

    /// There are no rows to fit on.
    #[error("training table is empty")]
    EmptyTrainingTable,

    /// The forest was configured without trees.
    #[error("forest must contain at least one tree")]
    NoTrees,
}

/// Errors raised while persisting or restoring a [`crate::TrainedArtifact`].
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// I/O error while reading or writing the artifact.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact exists but does not decode.
    #[error("artifact at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}
