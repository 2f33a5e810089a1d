//! Shared state of a running pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use ml_model::{ForestConfig, TrainedArtifact};
use sqlx::SqlitePool;
use tracing::info;

use crate::cache::ModelCache;
use crate::error::PipelineError;
use crate::loader::DataLoader;

/// Record store, data loader and model cache of one process.
///
/// Build one per process and share it behind an `Arc`.
#[derive(Debug)]
pub struct PipelineContext {
    pool: SqlitePool,
    loader: DataLoader,
    cache: ModelCache,
}

impl PipelineContext {
    #[must_use]
    pub fn new(
        pool: SqlitePool,
        dataset_path: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
    ) -> Self {
        Self::with_forest_config(pool, dataset_path, model_path, ForestConfig::default())
    }

    #[must_use]
    pub fn with_forest_config(
        pool: SqlitePool,
        dataset_path: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
        forest: ForestConfig,
    ) -> Self {
        Self {
            loader: DataLoader::new(pool.clone(), dataset_path),
            cache: ModelCache::with_config(model_path, forest),
            pool,
        }
    }

    /// Opens the record store named by `config` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the database cannot be opened or migrated.
    pub async fn connect(config: &Config) -> Result<Self, PipelineError> {
        info!(database_url = %config.database_url, "Connecting to record store");
        let pool = database::create_pool(&config.database_url).await?;
        database::run_migrations(&pool)
            .await
            .map_err(sqlx::Error::from)?;

        Ok(Self::new(pool, &config.dataset_path, &config.model_path))
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[must_use]
    pub const fn loader(&self) -> &DataLoader {
        &self.loader
    }

    #[must_use]
    pub const fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Returns the model, importing and training on first use if needed.
    ///
    /// Calling this at startup takes the cold-start cost before the first request.
    ///
    /// # Errors
    ///
    /// See [`ModelCache::load_or_build`].
    pub async fn artifact(&self) -> Result<Arc<TrainedArtifact>, PipelineError> {
        self.cache.load_or_build(&self.loader).await
    }
}
