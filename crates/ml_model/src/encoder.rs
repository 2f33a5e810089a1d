//! Label encoding of categorical columns.

use std::collections::BTreeSet;

use car_structs::{
    CATEGORICAL_COUNT, CarFeatures, CategoricalField, FEATURE_COLUMNS, FEATURE_COUNT,
    FeatureColumn,
};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Maps the distinct values of one column to dense integer codes.
///
/// Codes follow the lexical order of the values seen during fitting, so the
/// same training column always yields the same mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fits an encoder on the observed values of a column.
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let classes: BTreeSet<&str> = values.into_iter().collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    /// Returns the code of `value`, or `None` if it was never observed.
    #[must_use]
    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
    }

    /// Returns the value behind `code`.
    #[must_use]
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// The fitted vocabulary in code order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One fitted [`LabelEncoder`] per categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSet {
    encoders: [LabelEncoder; CATEGORICAL_COUNT],
}

impl EncoderSet {
    /// Fits every categorical encoder on the given rows.
    #[must_use]
    pub fn fit(rows: &[CarFeatures]) -> Self {
        let encoders = CategoricalField::ALL
            .map(|field| LabelEncoder::fit(rows.iter().map(|row| row.categorical(field))));
        Self { encoders }
    }

    /// The encoder of one field.
    #[must_use]
    pub const fn encoder(&self, field: CategoricalField) -> &LabelEncoder {
        &self.encoders[field.index()]
    }

    /// The sorted vocabulary of one field.
    #[must_use]
    pub fn vocabulary(&self, field: CategoricalField) -> &[String] {
        self.encoder(field).classes()
    }

    /// Encodes a single categorical value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownCategory`] if the value was not seen during fitting.
    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<usize, ModelError> {
        self.encoder(field)
            .encode(value)
            .ok_or_else(|| ModelError::UnknownCategory {
                column: field,
                value: value.to_string(),
            })
    }

    /// Builds the model input row for one car.
    ///
    /// Categorical columns are replaced by their codes, numeric columns pass
    /// through unchanged. The layout follows [`FEATURE_COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownCategory`] for the first categorical value
    /// outside the fitted vocabulary.
    pub fn transform(&self, features: &CarFeatures) -> Result<[f64; FEATURE_COUNT], ModelError> {
        let mut row = [0.0; FEATURE_COUNT];

        for (slot, column) in row.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = match column {
                FeatureColumn::Numeric(field) => features.numeric(field),
                FeatureColumn::Categorical(field) => {
                    self.encode(field, features.categorical(field))? as f64
                }
            };
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use car_structs::NumericField;

    use super::*;
    use crate::dataset::test_support::sample_car;

    #[test]
    fn test_label_encoder_uses_lexical_order() {
        let encoder = LabelEncoder::fit(["rwd", "fwd", "4wd", "fwd"]);

        assert_eq!(encoder.classes(), ["4wd", "fwd", "rwd"]);
        assert_eq!(encoder.encode("4wd"), Some(0));
        assert_eq!(encoder.encode("rwd"), Some(2));
        assert_eq!(encoder.encode("awd"), None);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let encoder = LabelEncoder::fit(["two", "four", "six", "eight", "twelve"]);

        for value in encoder.classes() {
            let code = encoder.encode(value).unwrap();
            assert_eq!(encoder.decode(code), Some(value.as_str()));
        }
        assert_eq!(encoder.decode(encoder.len()), None);
    }

    #[test]
    fn test_unknown_category_names_column_and_value() {
        let encoders = EncoderSet::fit(&[sample_car()]);
        let car = sample_car().with_categorical(CategoricalField::FuelType, "nuclear");

        let err = encoders.transform(&car).unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnknownCategory { column: CategoricalField::FuelType, ref value }
                if value == "nuclear"
        ));
    }

    #[test]
    fn test_every_field_rejects_unseen_values() {
        let encoders = EncoderSet::fit(&[sample_car()]);

        for field in CategoricalField::ALL {
            let car = sample_car().with_categorical(field, "unseen");
            match encoders.transform(&car) {
                Err(ModelError::UnknownCategory { column, value }) => {
                    assert_eq!(column, field);
                    assert_eq!(value, "unseen");
                }
                other => panic!("expected unknown category for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_transform_passes_numeric_columns_through() {
        let diesel = sample_car().with_categorical(CategoricalField::FuelType, "diesel");
        let encoders = EncoderSet::fit(&[sample_car(), diesel.clone()]);

        let row = encoders.transform(&diesel).unwrap();

        assert!((row[0] - diesel.numeric(NumericField::Symboling)).abs() < f64::EPSILON);
        // diesel < gas lexically
        assert!(row[1].abs() < f64::EPSILON);
        assert!((row[19] - diesel.horsepower).abs() < f64::EPSILON);
        assert_eq!(encoders.vocabulary(CategoricalField::FuelType), ["diesel", "gas"]);
    }
}
