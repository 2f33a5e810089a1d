//! Train command - loads or builds the model artifact.

use anyhow::Result;
use tracing::info;

use crate::context::PipelineContext;

/// Runs the train command.
///
/// With `force`, an existing artifact is deleted first so the model is
/// retrained from the current record store.
///
/// # Errors
///
/// Returns an error if the artifact cannot be removed, loaded or trained.
pub async fn run(context: &PipelineContext, force: bool) -> Result<()> {
    let cache = context.cache();

    if force && cache.remove_persisted()? {
        info!("Discarded previous model artifact");
    }

    let artifact = context.artifact().await?;
    let metrics = &artifact.metrics;

    println!("Model: {}", cache.path().display());
    println!("  trees:      {}", artifact.model.trees().len());
    println!("  trained at: {}", artifact.trained_at);
    println!("  train rows: {}", metrics.train_rows);
    println!("  test rows:  {}", metrics.test_rows);
    match metrics.mean_absolute_error {
        Some(mae) => println!("  test MAE:   ${mae:.2}"),
        None => println!("  test MAE:   n/a"),
    }

    Ok(())
}
