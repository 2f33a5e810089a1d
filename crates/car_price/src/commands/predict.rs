//! Predict command - estimates the price of one car described in JSON.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use car_structs::CarFeatures;

use crate::context::PipelineContext;
use crate::predictor::{Owner, Predictor};

/// Runs the predict command.
///
/// `input` is a JSON object with every car feature, or `-` for stdin.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the car is rejected or
/// the model is unavailable.
pub async fn run(context: Arc<PipelineContext>, input: &Path, owner: Owner, json: bool) -> Result<()> {
    let car = read_car(input)?;

    let predictor = Predictor::new(context).with_owner(owner);
    let outcome = predictor.predict(car).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("Estimated price: ${:.2}", outcome.display_price);
    match outcome.prediction_id {
        Some(id) => println!("Recorded as {id} for {}", predictor.owner().username),
        None => println!("Prediction was not recorded"),
    }

    Ok(())
}

fn read_car(input: &Path) -> Result<CarFeatures> {
    let text = if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read car from stdin")?;
        text
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&text).context("Input is not a complete car description")
}
