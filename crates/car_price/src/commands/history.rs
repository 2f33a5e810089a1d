//! History command - lists recent predictions of a user.

use std::sync::Arc;

use anyhow::Result;

use crate::context::PipelineContext;
use crate::predictor::{Owner, Predictor};

/// Runs the history command.
///
/// # Errors
///
/// Returns an error if the history cannot be read.
pub async fn run(context: Arc<PipelineContext>, owner: Owner, limit: i64) -> Result<()> {
    let predictor = Predictor::new(context).with_owner(owner);
    let records = predictor.history(limit).await?;

    if records.is_empty() {
        println!("No predictions recorded for {}", predictor.owner().username);
        return Ok(());
    }

    for record in records {
        let car = &record.car_data;
        println!(
            "{}  ${:>10.2}  {} {} {}hp  ({})",
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.predicted_price,
            car.body,
            car.fuel_type,
            car.horsepower,
            record.id
        );
    }

    Ok(())
}
