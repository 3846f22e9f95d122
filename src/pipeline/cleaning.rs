use super::types::{
    APP, CleanDataset, CleanReport, Dataset, INSTALLS, PRICE, ParsePolicy, RATING, RECORD_INDEX,
    REVENUE, REVIEWS, scratch_column,
};
use crate::error::{ParseError, Result};
use polars::prelude::*;

/// Removes records identical to an earlier record across every column.
///
/// Keeps the first occurrence and the original order, so running it twice is the
/// same as running it once. Returns the deduplicated dataset and how many records
/// were dropped.
///
/// # Errors
///
/// Only fails if the table engine does.
pub fn deduplicate(dataset: Dataset) -> Result<(Dataset, usize)> {
    let before = dataset.height();
    let df = dataset
        .into_frame()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;

    let removed = before - df.height();
    log::info!("Deduplicate: removed {removed} duplicate records, {} remain", df.height());
    Ok((Dataset::new(df)?, removed))
}

/// Turns a deduplicated dataset into a [`CleanDataset`].
///
/// 1. Drops every record with a missing value in any column.
/// 2. Keeps only records whose Rating is already a number.
/// 3. Coerces Reviews, Installs and Price, in that order.
///
/// Columns other than those four pass through unchanged, except an incoming
/// Revenue column: Revenue is derived, so it is dropped here and only
/// [`compute_revenue`](super::revenue::compute_revenue) adds it back.
///
/// # Errors
///
/// With [`ParsePolicy::Fail`], the first value that cannot be coerced is returned
/// as [`EdaError::Parse`](crate::error::EdaError::Parse). With
/// [`ParsePolicy::Skip`] those records are dropped and listed in the report.
pub fn clean(dataset: Dataset, policy: ParsePolicy) -> Result<(CleanDataset, CleanReport)> {
    let rows_before = dataset.height();

    let mut df = dataset.into_frame();
    if df.column(REVENUE).is_ok() {
        log::debug!("Clean: dropping incoming {REVENUE} column");
        df = df.drop(REVENUE)?;
    }
    let record_index = scratch_column(&df, RECORD_INDEX);

    let df = df
        .lazy()
        .with_row_index(record_index.as_str(), Some(1))
        .drop_nulls(None)
        .collect()?;
    let rows_with_nulls = rows_before - df.height();
    log::info!("Clean: dropped {rows_with_nulls} records with missing values");

    let (mut df, invalid_ratings) = keep_numeric_ratings(&df)?;
    log::info!("Clean: dropped {invalid_ratings} records with a non-numeric rating");

    let coercion = Coercion {
        records: record_numbers(&df, &record_index)?,
        apps: map_text(&df, APP, |v| v.unwrap_or_default().to_owned())?,
        policy,
    };
    let mut parse_errors = Vec::new();
    let reviews = coercion.run(&df, REVIEWS, parse_reviews, &mut parse_errors)?;
    let installs = coercion.run(&df, INSTALLS, parse_installs, &mut parse_errors)?;
    let price = coercion.run(&df, PRICE, parse_price, &mut parse_errors)?;

    let keep: Vec<bool> = reviews
        .iter()
        .zip(&installs)
        .zip(&price)
        .map(|((r, i), p)| r.is_some() && i.is_some() && p.is_some())
        .collect();

    df.with_column(Series::new(REVIEWS.into(), reviews))?;
    df.with_column(Series::new(INSTALLS.into(), installs))?;
    df.with_column(Series::new(PRICE.into(), price))?;

    let df = df
        .filter(&BooleanChunked::from_slice("keep".into(), &keep))?
        .drop(&record_index)?;

    for err in &parse_errors {
        log::warn!("Skipped record: {err}");
    }

    let report = CleanReport {
        rows_before,
        rows_with_nulls,
        invalid_ratings,
        parse_errors,
        rows_after: df.height(),
    };
    log::info!("{}", report.summary());

    Ok((CleanDataset::from_cleaned(df), report))
}

/// Filters out records whose Rating is not a number and stores the rest as `Float64`.
fn keep_numeric_ratings(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let ratings = map_text(df, RATING, |v| v.and_then(parse_rating))?;
    let keep: Vec<bool> = ratings.iter().map(Option::is_some).collect();
    let invalid = keep.iter().filter(|k| !**k).count();

    let mut kept = df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?;
    let ratings: Vec<f64> = ratings.into_iter().flatten().collect();
    kept.with_column(Series::new(RATING.into(), ratings))?;
    Ok((kept, invalid))
}

/// Applies `f` to every value of a column, read as text.
fn map_text<T>(
    df: &DataFrame,
    column: &str,
    f: impl FnMut(Option<&str>) -> T,
) -> Result<Vec<T>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series.str()?.into_iter().map(f).collect())
}

fn record_numbers(df: &DataFrame, record_index: &str) -> Result<Vec<u64>> {
    let series = df
        .column(record_index)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    Ok(series.u64()?.into_iter().map(Option::unwrap_or_default).collect())
}

struct Coercion {
    records: Vec<u64>,
    apps: Vec<String>,
    policy: ParsePolicy,
}

impl Coercion {
    /// Parses one column. Failed values become `None` under `Skip` and end the
    /// run under `Fail`.
    fn run<T>(
        &self,
        df: &DataFrame,
        column: &str,
        parse: fn(&str) -> std::result::Result<T, &'static str>,
        errors: &mut Vec<ParseError>,
    ) -> Result<Vec<Option<T>>> {
        let raw = map_text(df, column, |v| v.map(str::to_owned))?;
        let mut parsed = Vec::with_capacity(raw.len());

        for (idx, value) in raw.into_iter().enumerate() {
            let value = value.unwrap_or_default();
            match parse(&value) {
                Ok(v) => parsed.push(Some(v)),
                Err(reason) => {
                    let err = ParseError::new(
                        column,
                        value,
                        self.records.get(idx).copied().unwrap_or_default(),
                        self.apps.get(idx).cloned().unwrap_or_default(),
                        reason,
                    );
                    if self.policy == ParsePolicy::Fail {
                        return Err(err.into());
                    }
                    errors.push(err);
                    parsed.push(None);
                }
            }
        }

        Ok(parsed)
    }
}

/// A Rating counts as numeric if it parses as a finite float.
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"1234"` → 1234.
///
/// # Errors
///
/// Rejects anything that is not a non-negative whole number.
pub fn parse_reviews(raw: &str) -> std::result::Result<i64, &'static str> {
    parse_count(raw.trim())
}

/// `"10,000+"` → 10000, `"0+"` → 0.
///
/// # Errors
///
/// Rejects anything that is not a non-negative whole number once the trailing `+`
/// and the thousands separators are gone.
pub fn parse_installs(raw: &str) -> std::result::Result<i64, &'static str> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('+').unwrap_or(trimmed);
    let digits: String = trimmed.chars().filter(|c| *c != ',').collect();
    parse_count(&digits)
}

/// `"$4.99"` → 4.99, `"0"` → 0.0.
///
/// # Errors
///
/// Rejects anything that is not a finite non-negative number once the leading `$`
/// is gone.
pub fn parse_price(raw: &str) -> std::result::Result<f64, &'static str> {
    let trimmed = raw.trim();
    let amount = trimmed.strip_prefix('$').unwrap_or(trimmed);
    if amount.is_empty() {
        return Err("empty value");
    }
    let price = amount.parse::<f64>().map_err(|_| "not a number")?;
    if !price.is_finite() {
        return Err("not a finite number");
    }
    if price < 0.0 {
        return Err("negative price");
    }
    Ok(price)
}

fn parse_count(text: &str) -> std::result::Result<i64, &'static str> {
    if text.is_empty() {
        return Err("empty value");
    }
    let count = text.parse::<i64>().map_err(|_| "not a whole number")?;
    if count < 0 {
        return Err("negative count");
    }
    Ok(count)
}
