//! Random forest regression.

use car_structs::FEATURE_COUNT;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{EncodedTable, ModelError, RegressionTree};

/// Hyperparameters of the random forest.
///
/// Held fixed and stored with every trained artifact so a retrain on the same
/// table reproduces the same model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees.
    pub n_estimators: usize,
    /// Seed for bootstrap sampling and the train/test split.
    pub seed: u64,
    /// Maximum tree depth; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum rows required to split a node.
    pub min_samples_split: usize,
    /// Minimum rows in each child of a split.
    pub min_samples_leaf: usize,
    /// Whether each tree sees a bootstrap resample instead of every row.
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
        }
    }
}

impl ForestConfig {
    #[must_use]
    pub const fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// An ensemble of regression trees whose prediction is the mean of its trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fits a forest on `data`.
    ///
    /// Trees are grown in parallel; each draws its bootstrap sample from its
    /// own seed, so the result does not depend on scheduling.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is empty or the config asks for no trees.
    pub fn fit(data: &EncodedTable, config: &ForestConfig) -> Result<Self, ModelError> {
        if data.is_empty() {
            return Err(ModelError::EmptyTrainingTable);
        }
        if config.n_estimators == 0 {
            return Err(ModelError::NoTrees);
        }

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        let seeds: Vec<u64> = (0..config.n_estimators).map(|_| rng.next_u64()).collect();

        let trees: Vec<RegressionTree> = seeds
            .par_iter()
            .map(|&seed| {
                let mut sample = bootstrap_sample(data.len(), seed, config.bootstrap);
                RegressionTree::fit(data, &mut sample, config)
            })
            .collect();

        debug!(
            trees = trees.len(),
            rows = data.len(),
            leaves = trees.iter().map(RegressionTree::leaf_count).sum::<usize>(),
            "Forest fitted"
        );

        Ok(Self { trees })
    }

    /// Predicts the target for one encoded row.
    #[must_use]
    pub fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        total / self.trees.len() as f64
    }

    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

/// Draws `rows` indices with replacement, or returns every index when
/// bootstrapping is off.
fn bootstrap_sample(rows: usize, seed: u64, bootstrap: bool) -> Vec<usize> {
    if !bootstrap {
        return (0..rows).collect();
    }

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..rows).map(|_| rng.gen_range(0..rows)).collect()
}
