use serde::{Deserialize, Serialize};

use crate::{CategoricalField, NumericField};

/// The specification of one car, without its price.
///
/// This is both a prediction request and a training row. Numeric values are
/// carried as `f64` regardless of whether the dataset stores them as integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarFeatures {
    pub symboling: f64,
    pub fuel_type: String,
    pub aspiration: String,
    pub doors: String,
    pub body: String,
    pub drive_wheel: String,
    pub engine_location: String,
    pub wheel_base: f64,
    pub car_length: f64,
    pub car_width: f64,
    pub car_height: f64,
    pub curb_weight: f64,
    pub engine_type: String,
    pub cylinders: String,
    pub engine_size: f64,
    pub fuel_system: String,
    pub bore_ratio: f64,
    pub stroke: f64,
    pub compression: f64,
    pub horsepower: f64,
    pub peak_rpm: f64,
    pub city_mpg: f64,
    pub highway_mpg: f64,
}

impl CarFeatures {
    /// Returns the value of a categorical field.
    #[must_use]
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::FuelType => &self.fuel_type,
            CategoricalField::Aspiration => &self.aspiration,
            CategoricalField::Doors => &self.doors,
            CategoricalField::Body => &self.body,
            CategoricalField::DriveWheel => &self.drive_wheel,
            CategoricalField::EngineLocation => &self.engine_location,
            CategoricalField::EngineType => &self.engine_type,
            CategoricalField::Cylinders => &self.cylinders,
            CategoricalField::FuelSystem => &self.fuel_system,
        }
    }

    /// Returns the value of a numeric field.
    #[must_use]
    pub const fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Symboling => self.symboling,
            NumericField::WheelBase => self.wheel_base,
            NumericField::CarLength => self.car_length,
            NumericField::CarWidth => self.car_width,
            NumericField::CarHeight => self.car_height,
            NumericField::CurbWeight => self.curb_weight,
            NumericField::EngineSize => self.engine_size,
            NumericField::BoreRatio => self.bore_ratio,
            NumericField::Stroke => self.stroke,
            NumericField::Compression => self.compression,
            NumericField::Horsepower => self.horsepower,
            NumericField::PeakRpm => self.peak_rpm,
            NumericField::CityMpg => self.city_mpg,
            NumericField::HighwayMpg => self.highway_mpg,
        }
    }

    fn numeric_mut(&mut self, field: NumericField) -> &mut f64 {
        match field {
            NumericField::Symboling => &mut self.symboling,
            NumericField::WheelBase => &mut self.wheel_base,
            NumericField::CarLength => &mut self.car_length,
            NumericField::CarWidth => &mut self.car_width,
            NumericField::CarHeight => &mut self.car_height,
            NumericField::CurbWeight => &mut self.curb_weight,
            NumericField::EngineSize => &mut self.engine_size,
            NumericField::BoreRatio => &mut self.bore_ratio,
            NumericField::Stroke => &mut self.stroke,
            NumericField::Compression => &mut self.compression,
            NumericField::Horsepower => &mut self.horsepower,
            NumericField::PeakRpm => &mut self.peak_rpm,
            NumericField::CityMpg => &mut self.city_mpg,
            NumericField::HighwayMpg => &mut self.highway_mpg,
        }
    }

    fn categorical_mut(&mut self, field: CategoricalField) -> &mut String {
        match field {
            CategoricalField::FuelType => &mut self.fuel_type,
            CategoricalField::Aspiration => &mut self.aspiration,
            CategoricalField::Doors => &mut self.doors,
            CategoricalField::Body => &mut self.body,
            CategoricalField::DriveWheel => &mut self.drive_wheel,
            CategoricalField::EngineLocation => &mut self.engine_location,
            CategoricalField::EngineType => &mut self.engine_type,
            CategoricalField::Cylinders => &mut self.cylinders,
            CategoricalField::FuelSystem => &mut self.fuel_system,
        }
    }

    /// Returns a copy with one numeric field replaced.
    #[must_use]
    pub fn with_numeric(mut self, field: NumericField, value: f64) -> Self {
        *self.numeric_mut(field) = value;
        self
    }

    /// Returns a copy with one categorical field replaced.
    #[must_use]
    pub fn with_categorical(mut self, field: CategoricalField, value: impl Into<String>) -> Self {
        *self.categorical_mut(field) = value.into();
        self
    }
}
