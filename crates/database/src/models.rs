//! Database model types.

use car_structs::CarFeatures;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

/// One historical car stored in the database.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CarRecord {
    pub id: i64,
    pub symboling: i64,
    pub car_name: String,
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
    pub curb_weight: i64,
    pub engine_type: String,
    pub cylinders: String,
    pub engine_size: i64,
    pub fuel_system: String,
    pub bore_ratio: f64,
    pub stroke: f64,
    pub compression: f64,
    pub horsepower: i64,
    pub peak_rpm: i64,
    pub city_mpg: i64,
    pub highway_mpg: i64,
    pub price: f64,
}

impl CarRecord {
    /// Returns the model input columns of this car (everything but name and price).
    #[must_use]
    pub fn features(&self) -> CarFeatures {
        CarFeatures {
            symboling: self.symboling as f64,
            fuel_type: self.fuel_type.clone(),
            aspiration: self.aspiration.clone(),
            doors: self.doors.clone(),
            body: self.body.clone(),
            drive_wheel: self.drive_wheel.clone(),
            engine_location: self.engine_location.clone(),
            wheel_base: self.wheel_base,
            car_length: self.car_length,
            car_width: self.car_width,
            car_height: self.car_height,
            curb_weight: self.curb_weight as f64,
            engine_type: self.engine_type.clone(),
            cylinders: self.cylinders.clone(),
            engine_size: self.engine_size as f64,
            fuel_system: self.fuel_system.clone(),
            bore_ratio: self.bore_ratio,
            stroke: self.stroke,
            compression: self.compression,
            horsepower: self.horsepower as f64,
            peak_rpm: self.peak_rpm as f64,
            city_mpg: self.city_mpg as f64,
            highway_mpg: self.highway_mpg as f64,
        }
    }
}

/// Input for creating a new car record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub symboling: i64,
    pub car_name: String,
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
    pub curb_weight: i64,
    pub engine_type: String,
    pub cylinders: String,
    pub engine_size: i64,
    pub fuel_system: String,
    pub bore_ratio: f64,
    pub stroke: f64,
    pub compression: f64,
    pub horsepower: i64,
    pub peak_rpm: i64,
    pub city_mpg: i64,
    pub highway_mpg: i64,
    pub price: f64,
}

/// A user owning predictions.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One stored inference event.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_data: Json<CarFeatures>,
    pub predicted_price: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new prediction record.
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub user_id: Uuid,
    pub car_data: CarFeatures,
    pub predicted_price: f64,
}
