//! Training tables, raw and encoded.

use car_structs::{CarFeatures, FEATURE_COUNT};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{EncoderSet, ModelError};

/// Cars and their prices, column-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingTable {
    rows: Vec<CarFeatures>,
    prices: Vec<f64>,
}

impl TrainingTable {
    /// Creates a new empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            prices: Vec::new(),
        }
    }

    /// Appends one car and its price.
    pub fn push(&mut self, features: CarFeatures, price: f64) {
        self.rows.push(features);
        self.prices.push(price);
    }

    #[must_use]
    pub fn rows(&self) -> &[CarFeatures] {
        &self.rows
    }

    #[must_use]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<(CarFeatures, f64)> for TrainingTable {
    fn from_iter<I: IntoIterator<Item = (CarFeatures, f64)>>(iter: I) -> Self {
        let (rows, prices) = iter.into_iter().unzip();
        Self { rows, prices }
    }
}

/// A training table after categorical encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedTable {
    rows: Vec<[f64; FEATURE_COUNT]>,
    targets: Vec<f64>,
}

impl EncodedTable {
    /// Creates an encoded table from already numeric rows.
    ///
    /// # Panics
    ///
    /// Panics if `rows` and `targets` differ in length.
    #[cfg(test)]
    pub(crate) fn from_parts(rows: Vec<[f64; FEATURE_COUNT]>, targets: Vec<f64>) -> Self {
        assert_eq!(rows.len(), targets.len(), "rows and targets must align");
        Self { rows, targets }
    }

    /// Encodes every row of `table` with `encoders`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownCategory`] if a row holds a value the
    /// encoders were not fitted on.
    pub fn encode(table: &TrainingTable, encoders: &EncoderSet) -> Result<Self, ModelError> {
        let rows = table
            .rows()
            .iter()
            .map(|row| encoders.transform(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rows,
            targets: table.prices().to_vec(),
        })
    }

    /// Returns a new table holding the given rows, in the given order.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i]).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }

    #[must_use]
    pub fn row(&self, index: usize) -> &[f64; FEATURE_COUNT] {
        &self.rows[index]
    }

    #[must_use]
    pub fn target(&self, index: usize) -> f64 {
        self.targets[index]
    }

    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Shuffles row indices with `seed` and splits off `test_fraction` of them.
///
/// Returns `(train, test)`. The test share is rounded up; if that would leave
/// no training rows, everything goes to training and the test set is empty.
#[must_use]
pub fn train_test_split(rows: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let test_len = (rows as f64 * test_fraction).ceil() as usize;
    if test_len == 0 || test_len >= rows {
        return (indices, Vec::new());
    }

    let (test, train) = indices.split_at(test_len);
    (train.to_vec(), test.to_vec())
}
