//! Range checks on numeric inputs.
//!
//! Bounds are the extremes observed in the training dataset. Categorical
//! inputs are not checked here; an unseen value surfaces later as an unknown
//! category from the encoders.

use std::fmt;

use car_structs::{CarFeatures, NUMERIC_COUNT, NumericField};

/// One end of an inclusive range, remembering how the dataset wrote it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Int(i64),
    Real(f64),
}

impl Bound {
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Real(value) => value,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            // Debug keeps the trailing `.0` of whole floats, e.g. `7.0`.
            Self::Real(value) => write!(f, "{value:?}"),
        }
    }
}

/// Inclusive range of one numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub field: NumericField,
    pub min: Bound,
    pub max: Bound,
}

impl FieldBounds {
    const fn new(field: NumericField, min: Bound, max: Bound) -> Self {
        Self { field, min, max }
    }

    /// Whether `value` lies within `[min, max]`. `NaN` never does.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min.value()..=self.max.value()).contains(&value)
    }

    /// Fields bounded by integers only take whole numbers.
    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(self.min, Bound::Int(_))
    }

    fn check(&self, value: f64) -> Option<ViolationKind> {
        if !self.contains(value) {
            Some(ViolationKind::OutOfRange)
        } else if self.is_integral() && value.fract() != 0.0 {
            Some(ViolationKind::NotWhole)
        } else {
            None
        }
    }
}

/// Accepted range of every numeric field.
pub const VALIDATION_BOUNDS: [FieldBounds; NUMERIC_COUNT] = [
    FieldBounds::new(NumericField::Symboling, Bound::Int(-2), Bound::Int(3)),
    FieldBounds::new(NumericField::WheelBase, Bound::Real(86.6), Bound::Real(120.9)),
    FieldBounds::new(NumericField::CarLength, Bound::Real(141.1), Bound::Real(208.1)),
    FieldBounds::new(NumericField::CarWidth, Bound::Real(60.3), Bound::Real(72.3)),
    FieldBounds::new(NumericField::CarHeight, Bound::Real(47.8), Bound::Real(59.8)),
    FieldBounds::new(NumericField::CurbWeight, Bound::Int(1488), Bound::Int(4066)),
    FieldBounds::new(NumericField::EngineSize, Bound::Int(61), Bound::Int(326)),
    FieldBounds::new(NumericField::BoreRatio, Bound::Real(2.54), Bound::Real(3.94)),
    FieldBounds::new(NumericField::Stroke, Bound::Real(2.07), Bound::Real(4.17)),
    FieldBounds::new(NumericField::Compression, Bound::Real(7.0), Bound::Real(23.0)),
    FieldBounds::new(NumericField::Horsepower, Bound::Int(48), Bound::Int(288)),
    FieldBounds::new(NumericField::PeakRpm, Bound::Int(4150), Bound::Int(6600)),
    FieldBounds::new(NumericField::CityMpg, Bound::Int(13), Bound::Int(49)),
    FieldBounds::new(NumericField::HighwayMpg, Bound::Int(16), Bound::Int(54)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    OutOfRange,
    /// A fractional value for a field counted in whole units.
    NotWhole,
}

/// A numeric input the model does not accept.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: NumericField,
    pub value: f64,
    pub kind: ViolationKind,
    pub min: Bound,
    pub max: Bound,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.field.display_name();
        match self.kind {
            ViolationKind::OutOfRange => {
                write!(f, "{name} must be between {} and {}", self.min, self.max)
            }
            ViolationKind::NotWhole => write!(f, "{name} must be a whole number"),
        }
    }
}

/// Checks every numeric field and returns all violations; empty means valid.
#[must_use]
pub fn validate(features: &CarFeatures) -> Vec<Violation> {
    VALIDATION_BOUNDS
        .iter()
        .filter_map(|bounds| {
            let value = features.numeric(bounds.field);
            bounds.check(value).map(|kind| Violation {
                field: bounds.field,
                value,
                kind,
                min: bounds.min,
                max: bounds.max,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_car as sedan;

    const EPSILON: f64 = 1e-3;

    #[test]
    fn test_typical_sedan_is_valid() {
        assert!(validate(&sedan()).is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        for bounds in VALIDATION_BOUNDS {
            for edge in [bounds.min.value(), bounds.max.value()] {
                let car = sedan().with_numeric(bounds.field, edge);
                assert!(validate(&car).is_empty(), "{} at {edge}", bounds.field);
            }
        }
    }

    #[test]
    fn test_just_outside_is_rejected_naming_field() {
        for bounds in VALIDATION_BOUNDS {
            for value in [bounds.min.value() - EPSILON, bounds.max.value() + EPSILON] {
                let violations = validate(&sedan().with_numeric(bounds.field, value));

                assert_eq!(violations.len(), 1, "{} at {value}", bounds.field);
                assert_eq!(violations[0].field, bounds.field);
                assert!(
                    violations[0]
                        .to_string()
                        .starts_with(bounds.field.display_name())
                );
            }
        }
    }

    #[test]
    fn test_all_violations_reported_together() {
        let car = sedan()
            .with_numeric(NumericField::Horsepower, 500.0)
            .with_numeric(NumericField::Symboling, -3.0)
            .with_numeric(NumericField::Stroke, f64::NAN);

        let fields: Vec<_> = validate(&car).iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                NumericField::Symboling,
                NumericField::Stroke,
                NumericField::Horsepower
            ]
        );
    }

    #[test]
    fn test_messages_match_dataset_notation() {
        let horsepower = validate(&sedan().with_numeric(NumericField::Horsepower, 500.0));
        assert_eq!(horsepower[0].to_string(), "Horsepower must be between 48 and 288");

        let compression = validate(&sedan().with_numeric(NumericField::Compression, 30.0));
        assert_eq!(compression[0].to_string(), "Compression must be between 7.0 and 23.0");

        let rpm = validate(&sedan().with_numeric(NumericField::PeakRpm, 9000.0));
        assert_eq!(rpm[0].to_string(), "Peak Rpm must be between 4150 and 6600");

        let wheel_base = validate(&sedan().with_numeric(NumericField::WheelBase, 50.0));
        assert_eq!(wheel_base[0].to_string(), "Wheel Base must be between 86.6 and 120.9");
    }

    #[test]
    fn test_every_field_has_bounds_in_order() {
        let fields: Vec<_> = VALIDATION_BOUNDS.iter().map(|bounds| bounds.field).collect();
        assert_eq!(fields, NumericField::ALL);
    }

    #[test]
    fn test_fractional_whole_unit_fields_are_rejected() {
        let car = sedan()
            .with_numeric(NumericField::Symboling, 0.5)
            .with_numeric(NumericField::Horsepower, 100.5);

        let violations = validate(&car);

        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::NotWhole));
        assert_eq!(violations[0].to_string(), "Symboling must be a whole number");
        assert_eq!(violations[1].to_string(), "Horsepower must be a whole number");
    }

    #[test]
    fn test_fractional_measurements_are_accepted() {
        let car = sedan()
            .with_numeric(NumericField::WheelBase, 100.55)
            .with_numeric(NumericField::Compression, 9.25);

        assert!(validate(&car).is_empty());
    }
}
