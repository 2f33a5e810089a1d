use std::path::PathBuf;

/// Default `SQLite` database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://car_price.db";

/// Default location of the source dataset.
pub const DEFAULT_DATASET_PATH: &str = "CarPrice_Assignment.csv";

/// Default location of the persisted model artifact.
pub const DEFAULT_MODEL_PATH: &str = "car_price_model.json";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Source CSV used to populate an empty car table
    pub dataset_path: PathBuf,

    /// Well-known location of the trained artifact
    pub model_path: PathBuf,
}

impl Config {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub fn new(
        database_url: impl Into<String>,
        dataset_path: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            database_url: database_url.into(),
            dataset_path: dataset_path.into(),
            model_path: model_path.into(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `DATABASE_URL`: `SQLite` connection string (default: `sqlite://car_price.db`)
    /// - `CAR_DATASET_PATH`: Source dataset CSV (default: `CarPrice_Assignment.csv`)
    /// - `MODEL_PATH`: Persisted model artifact (default: `car_price_model.json`)
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let dataset_path = lookup("CAR_DATASET_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH), PathBuf::from);
        let model_path = lookup("MODEL_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH), PathBuf::from);

        Self {
            database_url,
            dataset_path,
            model_path,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL, DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("MODEL_PATH", "/tmp/model.json"),
        ]);
        let config = Config::from_lookup(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.json"));
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
    }
}
