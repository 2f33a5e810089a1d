//! Options command - lists accepted inputs.

use anyhow::Result;
use car_structs::CategoricalField;

use crate::context::PipelineContext;
use crate::validator::VALIDATION_BOUNDS;

/// Prints the categories the model knows and the numeric ranges it accepts.
///
/// # Errors
///
/// Returns an error if the model is unavailable.
pub async fn run(context: &PipelineContext) -> Result<()> {
    let artifact = context.artifact().await?;

    println!("Categories:");
    for field in CategoricalField::ALL {
        let values = artifact.encoders.vocabulary(field).join(", ");
        println!("  {:<16} {values}", field.as_ref());
    }

    println!("Ranges:");
    for bounds in VALIDATION_BOUNDS {
        println!("  {:<16} {} to {}", bounds.field.as_ref(), bounds.min, bounds.max);
    }

    Ok(())
}
