use serde::{Deserialize, Serialize};

/// A categorical car attribute.
///
/// The set is closed: the model is trained on exactly these nine string columns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoricalField {
    FuelType,
    Aspiration,
    Doors,
    Body,
    DriveWheel,
    EngineLocation,
    EngineType,
    Cylinders,
    FuelSystem,
}

/// Number of categorical fields.
pub const CATEGORICAL_COUNT: usize = 9;

impl CategoricalField {
    /// All categorical fields, in encoder order.
    pub const ALL: [Self; CATEGORICAL_COUNT] = [
        Self::FuelType,
        Self::Aspiration,
        Self::Doors,
        Self::Body,
        Self::DriveWheel,
        Self::EngineLocation,
        Self::EngineType,
        Self::Cylinders,
        Self::FuelSystem,
    ];

    /// Position of this field in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human readable label, e.g. `Fuel Type`.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::FuelType => "Fuel Type",
            Self::Aspiration => "Aspiration",
            Self::Doors => "Doors",
            Self::Body => "Body",
            Self::DriveWheel => "Drive Wheel",
            Self::EngineLocation => "Engine Location",
            Self::EngineType => "Engine Type",
            Self::Cylinders => "Cylinders",
            Self::FuelSystem => "Fuel System",
        }
    }
}

/// A numeric car attribute that is range-checked before prediction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NumericField {
    Symboling,
    WheelBase,
    CarLength,
    CarWidth,
    CarHeight,
    CurbWeight,
    EngineSize,
    BoreRatio,
    Stroke,
    Compression,
    Horsepower,
    PeakRpm,
    CityMpg,
    HighwayMpg,
}

/// Number of numeric fields.
pub const NUMERIC_COUNT: usize = 14;

impl NumericField {
    /// All numeric fields, in validation order.
    pub const ALL: [Self; NUMERIC_COUNT] = [
        Self::Symboling,
        Self::WheelBase,
        Self::CarLength,
        Self::CarWidth,
        Self::CarHeight,
        Self::CurbWeight,
        Self::EngineSize,
        Self::BoreRatio,
        Self::Stroke,
        Self::Compression,
        Self::Horsepower,
        Self::PeakRpm,
        Self::CityMpg,
        Self::HighwayMpg,
    ];

    /// Human readable label used in validation messages, e.g. `Peak Rpm`.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Symboling => "Symboling",
            Self::WheelBase => "Wheel Base",
            Self::CarLength => "Car Length",
            Self::CarWidth => "Car Width",
            Self::CarHeight => "Car Height",
            Self::CurbWeight => "Curb Weight",
            Self::EngineSize => "Engine Size",
            Self::BoreRatio => "Bore Ratio",
            Self::Stroke => "Stroke",
            Self::Compression => "Compression",
            Self::Horsepower => "Horsepower",
            Self::PeakRpm => "Peak Rpm",
            Self::CityMpg => "City Mpg",
            Self::HighwayMpg => "Highway Mpg",
        }
    }
}

/// One input column of the regression model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    Numeric(NumericField),
    Categorical(CategoricalField),
}

/// Number of model input columns.
pub const FEATURE_COUNT: usize = NUMERIC_COUNT + CATEGORICAL_COUNT;

/// Model input columns in training-table order.
///
/// Feature vectors are laid out in this order both at training and at inference time.
pub const FEATURE_COLUMNS: [FeatureColumn; FEATURE_COUNT] = [
    FeatureColumn::Numeric(NumericField::Symboling),
    FeatureColumn::Categorical(CategoricalField::FuelType),
    FeatureColumn::Categorical(CategoricalField::Aspiration),
    FeatureColumn::Categorical(CategoricalField::Doors),
    FeatureColumn::Categorical(CategoricalField::Body),
    FeatureColumn::Categorical(CategoricalField::DriveWheel),
    FeatureColumn::Categorical(CategoricalField::EngineLocation),
    FeatureColumn::Numeric(NumericField::WheelBase),
    FeatureColumn::Numeric(NumericField::CarLength),
    FeatureColumn::Numeric(NumericField::CarWidth),
    FeatureColumn::Numeric(NumericField::CarHeight),
    FeatureColumn::Numeric(NumericField::CurbWeight),
    FeatureColumn::Categorical(CategoricalField::EngineType),
    FeatureColumn::Categorical(CategoricalField::Cylinders),
    FeatureColumn::Numeric(NumericField::EngineSize),
    FeatureColumn::Categorical(CategoricalField::FuelSystem),
    FeatureColumn::Numeric(NumericField::BoreRatio),
    FeatureColumn::Numeric(NumericField::Stroke),
    FeatureColumn::Numeric(NumericField::Compression),
    FeatureColumn::Numeric(NumericField::Horsepower),
    FeatureColumn::Numeric(NumericField::PeakRpm),
    FeatureColumn::Numeric(NumericField::CityMpg),
    FeatureColumn::Numeric(NumericField::HighwayMpg),
];
