use super::types::Dataset;
use crate::error::{EdaError, Result, ResultExt as _};
use polars::prelude::*;
use std::path::Path;

/// Tokens read as a missing value in any column.
pub const NULL_TOKENS: [&str; 7] = ["", "NaN", "nan", "NA", "N/A", "null", "NULL"];

/// Loads the app CSV with every column as text.
///
/// Nothing is coerced here; Clean decides what each value means.
///
/// # Errors
///
/// Returns [`EdaError::Load`] when the file is missing, unreadable, or lacks a
/// required column.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.is_file() {
        return Err(EdaError::Load(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    let null_values = NULL_TOKENS.iter().map(|s| (*s).into()).collect();
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_null_values(Some(NullValues::AllColumns(null_values)))
        .finish()
        .and_then(LazyFrame::collect)
        .map_err(|e| EdaError::Load(format!("failed to read {}: {e}", path.display())))?;

    log::info!(
        "Loaded {} records with {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Dataset::new(df).map_err(|e| match e {
        EdaError::Load(msg) => EdaError::Load(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Writes a frame as CSV, Parquet or JSON, picked by the file extension.
///
/// # Errors
///
/// Fails on an unknown extension or when the file cannot be written.
pub fn save_df(df: &mut DataFrame, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::create(path).context("Failed to create CSV file")?;
            CsvWriter::new(file)
                .include_header(true)
                .finish(df)
                .context("Failed to write CSV file")?;
        }
        "parquet" => {
            let file = std::fs::File::create(path).context("Failed to create Parquet file")?;
            ParquetWriter::new(file)
                .finish(df)
                .context("Failed to write Parquet file")?;
        }
        "json" => {
            let file = std::fs::File::create(path).context("Failed to create JSON file")?;
            JsonWriter::new(file)
                .with_json_format(JsonFormat::Json)
                .finish(df)
                .context("Failed to write JSON file")?;
        }
        _ => {
            return Err(EdaError::Other(format!(
                "Unsupported output format: '{ext}' ({})",
                path.display()
            )));
        }
    }

    log::debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
