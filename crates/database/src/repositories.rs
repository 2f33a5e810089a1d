//! Repository functions for database operations.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::models::{CarRecord, NewCar, NewPrediction, PredictionRecord, User};

const CAR_COLUMNS: &str = "id, symboling, car_name, fuel_type, aspiration, doors, body, \
    drive_wheel, engine_location, wheel_base, car_length, car_width, car_height, curb_weight, \
    engine_type, cylinders, engine_size, fuel_system, bore_ratio, stroke, compression, \
    horsepower, peak_rpm, city_mpg, highway_mpg, price";

/// Repository for car operations.
pub struct CarRepository;

impl CarRepository {
    /// Counts stored cars.
    ///
    /// Accepts a pool or a connection so the count can run inside a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cars")
            .fetch_one(executor)
            .await
    }

    /// Inserts multiple car records on one connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn insert_many(
        conn: &mut SqliteConnection,
        cars: &[NewCar],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;

        for car in cars {
            let result = sqlx::query(
                r"
                INSERT INTO cars (
                    symboling, car_name, fuel_type, aspiration, doors, body, drive_wheel,
                    engine_location, wheel_base, car_length, car_width, car_height, curb_weight,
                    engine_type, cylinders, engine_size, fuel_system, bore_ratio, stroke,
                    compression, horsepower, peak_rpm, city_mpg, highway_mpg, price
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(car.symboling)
            .bind(&car.car_name)
            .bind(&car.fuel_type)
            .bind(&car.aspiration)
            .bind(&car.doors)
            .bind(&car.body)
            .bind(&car.drive_wheel)
            .bind(&car.engine_location)
            .bind(car.wheel_base)
            .bind(car.car_length)
            .bind(car.car_width)
            .bind(car.car_height)
            .bind(car.curb_weight)
            .bind(&car.engine_type)
            .bind(&car.cylinders)
            .bind(car.engine_size)
            .bind(&car.fuel_system)
            .bind(car.bore_ratio)
            .bind(car.stroke)
            .bind(car.compression)
            .bind(car.horsepower)
            .bind(car.peak_rpm)
            .bind(car.city_mpg)
            .bind(car.highway_mpg)
            .bind(car.price)
            .execute(&mut *conn)
            .await?;

            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Lists all cars in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<CarRecord>, sqlx::Error> {
        let sql = format!("SELECT {CAR_COLUMNS} FROM cars ORDER BY id");
        sqlx::query_as::<_, CarRecord>(&sql).fetch_all(pool).await
    }
}

/// Repository for user operations.
pub struct UserRepository;

impl UserRepository {
    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r"
            SELECT id, username, email, created_at
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Returns the user with this username, creating it first if absent.
    ///
    /// Concurrent first use of the same username creates exactly one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, or `RowNotFound` if the
    /// email already belongs to a different username.
    pub async fn find_or_create(
        pool: &SqlitePool,
        username: &str,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, email, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Self::find_by_username(pool, username)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}

/// Repository for prediction history operations.
pub struct PredictionRepository;

impl PredictionRepository {
    /// Creates a new prediction record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        pool: &SqlitePool,
        input: NewPrediction,
    ) -> Result<PredictionRecord, sqlx::Error> {
        sqlx::query_as::<_, PredictionRecord>(
            r"
            INSERT INTO predictions (id, user_id, car_data, predicted_price, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_id, car_data, predicted_price, created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(Json(input.car_data))
        .bind(input.predicted_price)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// Lists the most recent predictions of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_by_user(
        pool: &SqlitePool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<PredictionRecord>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRecord>(
            r"
            SELECT id, user_id, car_data, predicted_price, created_at
            FROM predictions
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ?
            ",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Counts all stored predictions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM predictions")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use car_structs::CarFeatures;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::run_migrations;

    async fn memory_pool() -> SqlitePool {
        // A single connection keeps every query on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn new_car(name: &str, price: f64) -> NewCar {
        NewCar {
            symboling: 1,
            car_name: name.to_string(),
            fuel_type: "gas".to_string(),
            aspiration: "std".to_string(),
            doors: "four".to_string(),
            body: "sedan".to_string(),
            drive_wheel: "fwd".to_string(),
            engine_location: "front".to_string(),
            wheel_base: 99.8,
            car_length: 176.6,
            car_width: 66.2,
            car_height: 54.3,
            curb_weight: 2337,
            engine_type: "ohc".to_string(),
            cylinders: "four".to_string(),
            engine_size: 109,
            fuel_system: "mpfi".to_string(),
            bore_ratio: 3.19,
            stroke: 3.4,
            compression: 10.0,
            horsepower: 102,
            peak_rpm: 5500,
            city_mpg: 24,
            highway_mpg: 30,
            price,
        }
    }

    fn features() -> CarFeatures {
        CarRecord {
            id: 0,
            symboling: 0,
            car_name: String::new(),
            fuel_type: "gas".to_string(),
            aspiration: "std".to_string(),
            doors: "two".to_string(),
            body: "hatchback".to_string(),
            drive_wheel: "fwd".to_string(),
            engine_location: "front".to_string(),
            wheel_base: 94.5,
            car_length: 165.3,
            car_width: 63.8,
            car_height: 54.5,
            curb_weight: 1918,
            engine_type: "ohc".to_string(),
            cylinders: "four".to_string(),
            engine_size: 92,
            fuel_system: "2bbl".to_string(),
            bore_ratio: 2.97,
            stroke: 3.23,
            compression: 9.4,
            horsepower: 69,
            peak_rpm: 5200,
            city_mpg: 31,
            highway_mpg: 37,
            price: 6849.0,
        }
        .features()
    }

    #[tokio::test]
    async fn test_insert_and_list_cars() {
        let pool = memory_pool().await;
        assert_eq!(CarRepository::count(&pool).await.unwrap(), 0);

        let mut tx = pool.begin().await.unwrap();
        let inserted = CarRepository::insert_many(
            &mut tx,
            &[new_car("audi 100 ls", 13950.0), new_car("audi 100ls", 17450.0)],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(CarRepository::count(&pool).await.unwrap(), 2);

        let cars = CarRepository::list_all(&pool).await.unwrap();
        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0].car_name, "audi 100 ls");
        assert!((cars[1].price - 17450.0).abs() < f64::EPSILON);
        assert!((cars[0].features().curb_weight - 2337.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_rolled_back_insert_leaves_table_empty() {
        let pool = memory_pool().await;

        let mut tx = pool.begin().await.unwrap();
        CarRepository::insert_many(&mut tx, &[new_car("bmw 320i", 16430.0)])
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(CarRepository::count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_or_create_user_is_idempotent() {
        let pool = memory_pool().await;

        let first = UserRepository::find_or_create(&pool, "demo", "demo@example.com")
            .await
            .unwrap();
        let second = UserRepository::find_or_create(&pool, "demo", "demo@example.com")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.email, "demo@example.com");
        assert_eq!(first.created_at, second.created_at);
        assert!((Utc::now() - first.created_at).num_seconds() < 60);

        let missing = UserRepository::find_by_username(&pool, "nobody")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_email_taken_by_other_user_is_not_found() {
        let pool = memory_pool().await;
        UserRepository::find_or_create(&pool, "demo", "demo@example.com")
            .await
            .unwrap();

        let result = UserRepository::find_or_create(&pool, "other", "demo@example.com").await;
        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
    }

    #[tokio::test]
    async fn test_prediction_round_trip() {
        let pool = memory_pool().await;
        let user = UserRepository::find_or_create(&pool, "demo", "demo@example.com")
            .await
            .unwrap();

        let created = PredictionRepository::create(
            &pool,
            NewPrediction {
                user_id: user.id,
                car_data: features(),
                predicted_price: 7100.5,
            },
        )
        .await
        .unwrap();

        assert_eq!(created.user_id, user.id);
        assert_eq!(created.car_data.0, features());

        let history = PredictionRepository::list_by_user(&pool, user.id, 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, created.id);
        assert!((history[0].predicted_price - 7100.5).abs() < f64::EPSILON);
        assert_eq!(PredictionRepository::count(&pool).await.unwrap(), 1);
    }
}
