//! The persisted bundle of a fitted forest and its encoders.

use std::io::Write;
use std::path::Path;

use car_structs::CarFeatures;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{ArtifactError, EncoderSet, ForestConfig, ModelError, RandomForest, TrainingOutput};

/// A fitted regressor together with the encoders it was trained with.
///
/// The two only make sense as a unit and are saved and loaded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedArtifact {
    pub model: RandomForest,
    pub encoders: EncoderSet,
    pub config: ForestConfig,
    pub metrics: TrainingOutput,
    pub trained_at: DateTime<Utc>,
}

impl TrainedArtifact {
    #[must_use]
    pub fn new(
        model: RandomForest,
        encoders: EncoderSet,
        config: ForestConfig,
        metrics: TrainingOutput,
    ) -> Self {
        Self {
            model,
            encoders,
            config,
            metrics,
            trained_at: Utc::now(),
        }
    }

    /// Predicts the price of one car.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownCategory`] if a categorical value is
    /// outside the fitted vocabulary.
    pub fn predict(&self, features: &CarFeatures) -> Result<f64, ModelError> {
        let row = self.encoders.transform(features)?;
        Ok(self.model.predict(&row))
    }

    /// Writes the artifact to `path`.
    ///
    /// The JSON is written to a temporary file in the same directory and then
    /// renamed over `path`, so readers never see a partial artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or I/O fails.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        info!(path = %path.display(), "Saving model artifact");

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let json = serde_json::to_vec(self).map_err(ArtifactError::Serialization)?;

        let io_error = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
        file.write_all(&json).map_err(io_error)?;
        file.persist(path).map_err(|err| io_error(err.error))?;

        debug!(path = %path.display(), size = json.len(), "Model artifact saved");

        Ok(())
    }

    /// Reads an artifact previously written with [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] if the file cannot be read and
    /// [`ArtifactError::Corrupt`] if it does not decode.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        info!(path = %path.display(), "Loading model artifact");

        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let artifact: Self =
            serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            path = %path.display(),
            trees = artifact.model.trees().len(),
            trained_at = %artifact.trained_at,
            "Model artifact loaded"
        );

        Ok(artifact)
    }
}
