use super::types::{CleanDataset, INSTALLS, PRICE, REVENUE};
use crate::error::Result;
use polars::prelude::*;

/// Adds (or overwrites) `Revenue = Price × Installs` on every record.
///
/// # Errors
///
/// Only fails if the table engine does.
pub fn compute_revenue(dataset: CleanDataset) -> Result<CleanDataset> {
    let df = dataset
        .into_frame()
        .lazy()
        .with_column(
            (col(PRICE) * col(INSTALLS).cast(DataType::Float64)).alias(REVENUE),
        )
        .collect()?;

    log::info!("Computed revenue for {} records", df.height());
    Ok(CleanDataset::from_cleaned(df))
}
