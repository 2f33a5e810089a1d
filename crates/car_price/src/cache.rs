//! Lazily built, process-wide model artifact.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ml_model::{ForestConfig, TrainedArtifact};
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::PipelineError;
use crate::loader::DataLoader;

/// Holds the artifact once it has been loaded or trained.
///
/// A persisted artifact at `path` always wins over the record store, even if
/// the store has changed since it was trained. Delete the file to retrain.
#[derive(Debug)]
pub struct ModelCache {
    path: PathBuf,
    config: ForestConfig,
    artifact: OnceCell<Arc<TrainedArtifact>>,
}

impl ModelCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, ForestConfig::default())
    }

    /// Uses `config` when the artifact has to be trained.
    #[must_use]
    pub fn with_config(path: impl Into<PathBuf>, config: ForestConfig) -> Self {
        Self {
            path: path.into(),
            config,
            artifact: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an artifact file exists at the well-known location.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.path.exists()
    }

    /// The artifact, if this process has already loaded or built it.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<TrainedArtifact>> {
        self.artifact.get().cloned()
    }

    /// Returns the artifact, loading or training it on first use.
    ///
    /// Concurrent first callers wait on a single build and all receive the
    /// same artifact.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactCorrupt` if the persisted file does not decode, or any
    /// loader, training or I/O error when a build is needed.
    pub async fn load_or_build(
        &self,
        loader: &DataLoader,
    ) -> Result<Arc<TrainedArtifact>, PipelineError> {
        self.artifact
            .get_or_try_init(|| self.load_or_train(loader))
            .await
            .cloned()
    }

    /// Deletes the persisted artifact so the next process retrains.
    ///
    /// Returns whether a file was removed. An artifact already held in memory
    /// is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactIo` if the file exists but cannot be removed.
    pub fn remove_persisted(&self) -> Result<bool, PipelineError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Removed persisted model artifact");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ml_model::ArtifactError::Io {
                path: self.path.clone(),
                source,
            }
            .into()),
        }
    }

    async fn load_or_train(&self, loader: &DataLoader) -> Result<Arc<TrainedArtifact>, PipelineError> {
        let path = self.path.clone();

        if self.is_persisted() {
            let artifact = tokio::task::spawn_blocking(move || TrainedArtifact::load(&path)).await??;
            return Ok(Arc::new(artifact));
        }

        info!(path = %path.display(), "No persisted model artifact, training a new one");
        let table = loader.load_training_table().await?;
        let config = self.config.clone();

        let artifact = tokio::task::spawn_blocking(move || -> Result<_, PipelineError> {
            let artifact = ml_model::train(&table, &config)?;
            artifact.save(&path)?;
            Ok(artifact)
        })
        .await??;

        Ok(Arc::new(artifact))
    }
}
