//! Training logic for the price model.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    EncodedTable, EncoderSet, ForestConfig, ModelError, RandomForest, TrainedArtifact,
    TrainingTable, train_test_split,
};

/// Share of rows held out to measure the fitted model.
pub const TEST_FRACTION: f64 = 0.2;

/// Output from training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingOutput {
    /// Rows the forest was fitted on.
    pub train_rows: usize,
    /// Rows held out for evaluation.
    pub test_rows: usize,
    /// Mean absolute error on the held-out rows, absent when nothing was held out.
    pub mean_absolute_error: Option<f64>,
}

/// Fits encoders and a random forest on `table`.
///
/// The held-out error is reported but never gates acceptance: the fitted
/// model is always returned.
///
/// # Errors
///
/// Returns an error if the table is empty or the config asks for no trees.
pub fn train(table: &TrainingTable, config: &ForestConfig) -> Result<TrainedArtifact, ModelError> {
    if table.is_empty() {
        return Err(ModelError::EmptyTrainingTable);
    }

    let encoders = EncoderSet::fit(table.rows());
    let encoded = EncodedTable::encode(table, &encoders)?;

    let (train_indices, test_indices) = train_test_split(encoded.len(), TEST_FRACTION, config.seed);
    let model = RandomForest::fit(&encoded.select(&train_indices), config)?;

    let mean_absolute_error = (!test_indices.is_empty()).then(|| {
        mean_absolute_error(
            test_indices
                .iter()
                .map(|&i| (encoded.target(i), model.predict(encoded.row(i)))),
        )
    });

    let output = TrainingOutput {
        train_rows: train_indices.len(),
        test_rows: test_indices.len(),
        mean_absolute_error,
    };

    info!(
        trees = config.n_estimators,
        seed = config.seed,
        train_rows = output.train_rows,
        test_rows = output.test_rows,
        mae = mean_absolute_error.map(|mae| format!("${mae:.2}")),
        "Model trained"
    );

    Ok(TrainedArtifact::new(model, encoders, config.clone(), output))
}

/// Mean absolute error over `(actual, predicted)` pairs; `0.0` for no pairs.
pub fn mean_absolute_error(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (total, count) = pairs
        .into_iter()
        .fold((0.0, 0_usize), |(total, count), (actual, predicted)| {
            (total + (actual - predicted).abs(), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
