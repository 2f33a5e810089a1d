//! Car Price Predictor
//!
//! Estimates the market price of a car from its specification using a
//! random forest trained on historical sales. The first use imports the
//! source dataset into the record store and trains the model; later uses
//! load the persisted model and record every prediction.

pub mod cache;
pub mod commands;
pub mod context;
pub mod error;
pub mod loader;
pub mod predictor;
pub mod validator;

pub use cache::ModelCache;
pub use context::PipelineContext;
pub use error::PipelineError;
pub use loader::{DataLoader, DatasetImport, read_dataset};
pub use predictor::{Owner, PredictionOutcome, Predictor};
pub use validator::{Bound, FieldBounds, VALIDATION_BOUNDS, Violation, ViolationKind, validate};

#[cfg(test)]
pub(crate) mod test_support {
    use car_structs::CarFeatures;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    /// A migrated in-memory store. One connection, so every query sees the same database.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        database::run_migrations(&pool).await.unwrap();
        pool
    }

    pub fn sample_car() -> CarFeatures {
        CarFeatures {
            symboling: 0.0,
            fuel_type: "gas".to_string(),
            aspiration: "std".to_string(),
            doors: "four".to_string(),
            body: "sedan".to_string(),
            drive_wheel: "fwd".to_string(),
            engine_location: "front".to_string(),
            wheel_base: 100.0,
            car_length: 175.0,
            car_width: 65.0,
            car_height: 55.0,
            curb_weight: 2500.0,
            engine_type: "ohc".to_string(),
            cylinders: "four".to_string(),
            engine_size: 120.0,
            fuel_system: "mpfi".to_string(),
            bore_ratio: 3.2,
            stroke: 3.4,
            compression: 9.0,
            horsepower: 100.0,
            peak_rpm: 5000.0,
            city_mpg: 25.0,
            highway_mpg: 30.0,
        }
    }
}
