//! Single-car price estimation with history recording.

use std::sync::Arc;

use car_structs::CarFeatures;
use database::{NewPrediction, PredictionRecord, PredictionRepository, UserRepository};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::validator;

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_EMAIL: &str = "demo@example.com";

/// The user predictions are recorded for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub username: String,
    pub email: String,
}

impl Owner {
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// An owner whose email is derived from the username.
    #[must_use]
    pub fn named(username: &str) -> Self {
        Self::new(username, format!("{username}@example.com"))
    }

    #[must_use]
    pub fn demo() -> Self {
        Self::new(DEMO_USERNAME, DEMO_EMAIL)
    }
}

impl Default for Owner {
    fn default() -> Self {
        Self::demo()
    }
}

/// Result of a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    /// Unrounded model output
    pub price: f64,
    /// Price rounded to cents
    pub display_price: f64,
    /// Whether the prediction was written to the history
    pub persisted: bool,
    pub prediction_id: Option<Uuid>,
    pub input: CarFeatures,
}

fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Validates, encodes and scores cars, recording each prediction.
#[derive(Debug, Clone)]
pub struct Predictor {
    context: Arc<PipelineContext>,
    owner: Owner,
}

impl Predictor {
    /// A predictor recording under the demo user.
    #[must_use]
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self {
            context,
            owner: Owner::demo(),
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    #[must_use]
    pub const fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Estimates the price of `input`.
    ///
    /// A failure to record the prediction does not fail the request; the
    /// outcome then reports `persisted: false`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` or `UnknownCategory` for bad input, and any cold
    /// start error if the model is not available yet.
    pub async fn predict(&self, input: CarFeatures) -> Result<PredictionOutcome, PipelineError> {
        debug!(stage = "received", "Prediction request");

        let violations = validator::validate(&input);
        if !violations.is_empty() {
            info!(violations = violations.len(), "Prediction rejected: inputs out of range");
            return Err(PipelineError::Validation(violations));
        }
        debug!(stage = "validated", "Prediction request");

        let artifact = self.context.artifact().await?;

        let row = artifact.encoders.transform(&input).map_err(|err| {
            info!(error = %err, "Prediction rejected: unknown category");
            PipelineError::from(err)
        })?;
        debug!(stage = "encoded", "Prediction request");

        let price = artifact.model.predict(&row);
        debug!(stage = "scored", price, "Prediction request");

        let prediction_id = match self.record(&input, price).await {
            Ok(record) => {
                debug!(stage = "recorded", id = %record.id, "Prediction request");
                Some(record.id)
            }
            Err(err) => {
                warn!(error = %err, "Failed to record prediction, returning unsaved result");
                None
            }
        };

        Ok(PredictionOutcome {
            price,
            display_price: round_to_cents(price),
            persisted: prediction_id.is_some(),
            prediction_id,
            input,
        })
    }

    /// Recent predictions of this predictor's owner, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the history cannot be read.
    pub async fn history(&self, limit: i64) -> Result<Vec<PredictionRecord>, PipelineError> {
        let pool = self.context.pool();
        let Some(user) = UserRepository::find_by_username(pool, &self.owner.username).await? else {
            return Ok(Vec::new());
        };

        Ok(PredictionRepository::list_by_user(pool, user.id, limit).await?)
    }

    async fn record(&self, input: &CarFeatures, price: f64) -> Result<PredictionRecord, sqlx::Error> {
        let pool = self.context.pool();
        let user = UserRepository::find_or_create(pool, &self.owner.username, &self.owner.email).await?;

        PredictionRepository::create(
            pool,
            NewPrediction {
                user_id: user.id,
                car_data: input.clone(),
                predicted_price: price,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_named_derives_email() {
        assert_eq!(Owner::named("alice").email, "alice@example.com");
        assert_eq!(Owner::default(), Owner::new("demo", "demo@example.com"));
    }

    #[test]
    fn test_round_to_cents() {
        assert!((round_to_cents(13_495.126) - 13_495.13).abs() < 1e-9);
        assert!((round_to_cents(5_151.0) - 5_151.0).abs() < 1e-9);
    }
}
