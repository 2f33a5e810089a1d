//! One-time import of the source dataset into the record store.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use database::{CarRepository, NewCar};
use ml_model::TrainingTable;
use serde::Deserialize;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::PipelineError;

/// Columns the source dataset must carry. Extra columns such as `car_ID` are ignored.
pub const REQUIRED_HEADERS: [&str; 25] = [
    "symboling",
    "CarName",
    "fueltype",
    "aspiration",
    "doornumber",
    "carbody",
    "drivewheel",
    "enginelocation",
    "wheelbase",
    "carlength",
    "carwidth",
    "carheight",
    "curbweight",
    "enginetype",
    "cylindernumber",
    "enginesize",
    "fuelsystem",
    "boreratio",
    "stroke",
    "compressionratio",
    "horsepower",
    "peakrpm",
    "citympg",
    "highwaympg",
    "price",
];

/// One dataset line. Empty or unparsable cells decode as `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatasetRow {
    #[serde(deserialize_with = "csv::invalid_option")]
    symboling: Option<i64>,
    #[serde(rename = "CarName", deserialize_with = "csv::invalid_option")]
    car_name: Option<String>,
    #[serde(rename = "fueltype", deserialize_with = "csv::invalid_option")]
    fuel_type: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    aspiration: Option<String>,
    #[serde(rename = "doornumber", deserialize_with = "csv::invalid_option")]
    doors: Option<String>,
    #[serde(rename = "carbody", deserialize_with = "csv::invalid_option")]
    body: Option<String>,
    #[serde(rename = "drivewheel", deserialize_with = "csv::invalid_option")]
    drive_wheel: Option<String>,
    #[serde(rename = "enginelocation", deserialize_with = "csv::invalid_option")]
    engine_location: Option<String>,
    #[serde(rename = "wheelbase", deserialize_with = "csv::invalid_option")]
    wheel_base: Option<f64>,
    #[serde(rename = "carlength", deserialize_with = "csv::invalid_option")]
    car_length: Option<f64>,
    #[serde(rename = "carwidth", deserialize_with = "csv::invalid_option")]
    car_width: Option<f64>,
    #[serde(rename = "carheight", deserialize_with = "csv::invalid_option")]
    car_height: Option<f64>,
    #[serde(rename = "curbweight", deserialize_with = "csv::invalid_option")]
    curb_weight: Option<i64>,
    #[serde(rename = "enginetype", deserialize_with = "csv::invalid_option")]
    engine_type: Option<String>,
    #[serde(rename = "cylindernumber", deserialize_with = "csv::invalid_option")]
    cylinders: Option<String>,
    #[serde(rename = "enginesize", deserialize_with = "csv::invalid_option")]
    engine_size: Option<i64>,
    #[serde(rename = "fuelsystem", deserialize_with = "csv::invalid_option")]
    fuel_system: Option<String>,
    #[serde(rename = "boreratio", deserialize_with = "csv::invalid_option")]
    bore_ratio: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    stroke: Option<f64>,
    #[serde(rename = "compressionratio", deserialize_with = "csv::invalid_option")]
    compression: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    horsepower: Option<i64>,
    #[serde(rename = "peakrpm", deserialize_with = "csv::invalid_option")]
    peak_rpm: Option<i64>,
    #[serde(rename = "citympg", deserialize_with = "csv::invalid_option")]
    city_mpg: Option<i64>,
    #[serde(rename = "highwaympg", deserialize_with = "csv::invalid_option")]
    highway_mpg: Option<i64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    price: Option<f64>,
}

/// `NaN` and infinities parse as floats but count as missing values.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite())
}

impl DatasetRow {
    /// Returns the car when every column is present and the price is positive.
    fn into_new_car(self) -> Option<NewCar> {
        let car = NewCar {
            symboling: self.symboling?,
            car_name: self.car_name?,
            fuel_type: self.fuel_type?,
            aspiration: self.aspiration?,
            doors: self.doors?,
            body: self.body?,
            drive_wheel: self.drive_wheel?,
            engine_location: self.engine_location?,
            wheel_base: finite(self.wheel_base)?,
            car_length: finite(self.car_length)?,
            car_width: finite(self.car_width)?,
            car_height: finite(self.car_height)?,
            curb_weight: self.curb_weight?,
            engine_type: self.engine_type?,
            cylinders: self.cylinders?,
            engine_size: self.engine_size?,
            fuel_system: self.fuel_system?,
            bore_ratio: finite(self.bore_ratio)?,
            stroke: finite(self.stroke)?,
            compression: finite(self.compression)?,
            horsepower: self.horsepower?,
            peak_rpm: self.peak_rpm?,
            city_mpg: self.city_mpg?,
            highway_mpg: self.highway_mpg?,
            price: finite(self.price)?,
        };

        (car.price > 0.0).then_some(car)
    }
}

/// Cleaned contents of the source dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetImport {
    /// Distinct complete rows, in file order
    pub cars: Vec<NewCar>,
    /// Data lines read from the file
    pub rows_read: usize,
    /// Rows dropped for a missing or unparsable value
    pub incomplete: usize,
    /// Rows dropped as exact repeats of an earlier row
    pub duplicates: usize,
}

/// Reads and cleans the source dataset.
///
/// Rows with any missing value are dropped, then exact duplicates (every
/// imported column equal) keep only their first occurrence.
///
/// # Errors
///
/// Returns `DataSourceUnavailable` if the file cannot be opened and
/// `DatasetFormat` if a required column is missing or the file is not valid CSV.
pub fn read_dataset(path: &Path) -> Result<DatasetImport, PipelineError> {
    let file = std::fs::File::open(path).map_err(|source| PipelineError::DataSourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let format_error = |reason: String| PipelineError::DatasetFormat {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| format_error(e.to_string()))?;
    if let Some(missing) = REQUIRED_HEADERS
        .iter()
        .find(|required| !headers.iter().any(|header| header == **required))
    {
        return Err(format_error(format!("missing column `{missing}`")));
    }

    let mut import = DatasetImport::default();
    let mut seen = HashSet::new();

    for row in reader.deserialize::<DatasetRow>() {
        let row = row.map_err(|e| format_error(e.to_string()))?;
        import.rows_read += 1;

        let Some(car) = row.into_new_car() else {
            import.incomplete += 1;
            continue;
        };

        // Debug output of f64 round-trips, so equal keys mean equal rows.
        if seen.insert(format!("{car:?}")) {
            import.cars.push(car);
        } else {
            import.duplicates += 1;
        }
    }

    Ok(import)
}

/// Populates the car table on first use and serves it as a training table.
#[derive(Debug)]
pub struct DataLoader {
    pool: SqlitePool,
    dataset_path: PathBuf,
    import_lock: Mutex<()>,
}

impl DataLoader {
    #[must_use]
    pub fn new(pool: SqlitePool, dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            dataset_path: dataset_path.into(),
            import_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Imports the source dataset if the car table is empty.
    ///
    /// Returns the number of rows inserted, 0 when the table was already
    /// populated. Concurrent callers import at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is needed but unreadable, or the store fails.
    pub async fn ensure_imported(&self) -> Result<u64, PipelineError> {
        if CarRepository::count(&self.pool).await? > 0 {
            debug!("Car table already populated, skipping import");
            return Ok(0);
        }

        let _guard = self.import_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let existing = CarRepository::count(&mut *tx).await?;
        if existing > 0 {
            debug!(existing, "Car table populated by a concurrent import");
            return Ok(0);
        }

        info!(path = %self.dataset_path.display(), "Importing source dataset");
        let import = read_dataset(&self.dataset_path)?;
        let inserted = CarRepository::insert_many(&mut tx, &import.cars).await?;
        tx.commit().await?;

        info!(
            rows_read = import.rows_read,
            incomplete = import.incomplete,
            duplicates = import.duplicates,
            inserted,
            "Imported source dataset"
        );

        Ok(inserted)
    }

    /// Returns every stored car as `(features, price)`, importing first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the import fails or the store cannot be read.
    pub async fn load_training_table(&self) -> Result<TrainingTable, PipelineError> {
        self.ensure_imported().await?;

        let cars = CarRepository::list_all(&self.pool).await?;
        debug!(rows = cars.len(), "Loaded training table");

        Ok(cars.iter().map(|car| (car.features(), car.price)).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const HEADER: &str = "car_ID,symboling,CarName,fueltype,aspiration,doornumber,carbody,\
        drivewheel,enginelocation,wheelbase,carlength,carwidth,carheight,curbweight,enginetype,\
        cylindernumber,enginesize,fuelsystem,boreratio,stroke,compressionratio,horsepower,\
        peakrpm,citympg,highwaympg,price";

    const ROW_A: &str = "1,3,alfa-romero giulia,gas,std,two,convertible,rwd,front,88.6,168.8,\
        64.1,48.8,2548,dohc,four,130,mpfi,3.47,2.68,9.0,111,5000,21,27,13495";
    const ROW_B: &str = "2,2,audi 100 ls,gas,std,four,sedan,fwd,front,99.8,176.6,66.2,54.3,\
        2337,ohc,four,109,mpfi,3.19,3.4,10.0,102,5500,24,30,13950";

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn test_reads_complete_rows() {
        let file = csv_file(&[HEADER, ROW_A, ROW_B]);

        let import = read_dataset(file.path()).unwrap();

        assert_eq!(import.rows_read, 2);
        assert_eq!(import.cars.len(), 2);
        assert_eq!(import.cars[0].car_name, "alfa-romero giulia");
        assert_eq!(import.cars[0].horsepower, 111);
        assert!((import.cars[1].price - 13950.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drops_duplicates_keeping_first() {
        let renumbered = ROW_A.replacen("1,", "3,", 1);
        let file = csv_file(&[HEADER, ROW_A, ROW_B, &renumbered]);

        let import = read_dataset(file.path()).unwrap();

        assert_eq!(import.cars.len(), 2);
        assert_eq!(import.duplicates, 1);
    }

    #[test]
    fn test_drops_rows_with_missing_values() {
        let missing_stroke = ROW_B.replace(",3.4,", ",,");
        let bad_number = ROW_B.replace(",102,", ",fast,");
        let file = csv_file(&[HEADER, ROW_A, &missing_stroke, &bad_number]);

        let import = read_dataset(file.path()).unwrap();

        assert_eq!(import.cars.len(), 1);
        assert_eq!(import.incomplete, 2);
    }

    #[test]
    fn test_non_finite_numbers_count_as_missing() {
        let nan_stroke = ROW_B.replace(",3.4,", ",NaN,");
        let infinite_price = ROW_B.replace(",13950", ",inf");
        let negative_infinity = ROW_A.replace(",88.6,", ",-infinity,");
        let file = csv_file(&[HEADER, ROW_A, &nan_stroke, &infinite_price, &negative_infinity]);

        let import = read_dataset(file.path()).unwrap();

        assert_eq!(import.cars.len(), 1);
        assert_eq!(import.incomplete, 3);
        assert!(import.cars.iter().all(|car| car.stroke.is_finite() && car.price.is_finite()));
    }

    #[tokio::test]
    async fn test_import_skips_non_finite_rows() {
        let nan_stroke = ROW_B.replace(",3.4,", ",NaN,");
        let file = csv_file(&[HEADER, ROW_A, &nan_stroke]);
        let loader = DataLoader::new(crate::test_support::memory_pool().await, file.path());

        let inserted = loader.ensure_imported().await.unwrap();
        let table = loader.load_training_table().await.unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_column_is_format_error() {
        let header = HEADER.replace(",price", "");
        let file = csv_file(&[&header]);

        let err = read_dataset(file.path()).unwrap_err();

        assert!(matches!(err, PipelineError::DatasetFormat { ref reason, .. } if reason.contains("price")));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_dataset(&dir.path().join("absent.csv")).unwrap_err();

        assert!(matches!(err, PipelineError::DataSourceUnavailable { .. }));
    }
}
