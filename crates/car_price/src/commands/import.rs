//! Import command - loads the source dataset into an empty car table.

use anyhow::Result;
use tracing::info;

use crate::context::PipelineContext;

/// Runs the import command.
///
/// # Errors
///
/// Returns an error if the dataset is unreadable or the store fails.
pub async fn run(context: &PipelineContext) -> Result<()> {
    let dataset = context.loader().dataset_path();
    info!(dataset = %dataset.display(), "Checking car table");

    let inserted = context.loader().ensure_imported().await?;
    if inserted == 0 {
        println!("Car table already populated, nothing imported");
    } else {
        println!("Imported {inserted} cars from {}", dataset.display());
    }

    Ok(())
}
