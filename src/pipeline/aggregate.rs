//! Read-only views over a [`CleanDataset`].
//!
//! Ranked views sort by their value, best first, and break ties by the group
//! name ascending. An empty dataset yields an empty view.

use super::types::{
    CATEGORY, CategoryCount, CategoryRating, CleanDataset, GENRES, GenreRevenue, INSTALLS,
    InstallTier, RATING, REVENUE, Record, f64_at, i64_at, records_from_frame, scratch_column,
    text_at,
};
use crate::error::{EdaError, Result};
use polars::prelude::*;

const APPS: &str = "apps";
const MEAN_RATING: &str = "mean_rating";
const ROW: &str = "__row";

/// Sorts by `value` descending, then by `name` ascending.
fn ranked(lf: LazyFrame, value: &str, name: &str) -> LazyFrame {
    lf.sort_by_exprs(
        [col(value), col(name)],
        SortMultipleOptions::default()
            .with_order_descending_multi([true, false])
            .with_maintain_order(true),
    )
}

/// Number of apps per Category, most frequent first.
///
/// # Errors
///
/// Only fails if the table engine does.
pub fn category_counts(dataset: &CleanDataset) -> Result<Vec<CategoryCount>> {
    let counts = dataset
        .frame()
        .clone()
        .lazy()
        .group_by_stable([col(CATEGORY)])
        .agg([len().alias(APPS)]);
    let df = ranked(counts, APPS, CATEGORY).collect()?;

    let categories = df.column(CATEGORY)?.as_materialized_series().str()?;
    column_u64(&df, APPS)?
        .into_iter()
        .enumerate()
        .map(|(idx, apps)| {
            Ok(CategoryCount {
                category: text_at(categories, idx, CATEGORY)?,
                apps,
            })
        })
        .collect()
}

/// Mean Rating per Category, highest first.
///
/// # Errors
///
/// Only fails if the table engine does.
pub fn average_rating_by_category(dataset: &CleanDataset) -> Result<Vec<CategoryRating>> {
    let means = dataset
        .frame()
        .clone()
        .lazy()
        .group_by_stable([col(CATEGORY)])
        .agg([col(RATING).mean().alias(MEAN_RATING), len().alias(APPS)]);
    let df = ranked(means, MEAN_RATING, CATEGORY).collect()?;

    let categories = df.column(CATEGORY)?.as_materialized_series().str()?;
    let means = df.column(MEAN_RATING)?.as_materialized_series().f64()?;
    column_u64(&df, APPS)?
        .into_iter()
        .enumerate()
        .map(|(idx, apps)| {
            Ok(CategoryRating {
                category: text_at(categories, idx, CATEGORY)?,
                mean_rating: f64_at(means, idx, MEAN_RATING)?,
                apps,
            })
        })
        .collect()
}

/// Mean Rating of the apps at each Installs value, smallest tier first.
///
/// # Errors
///
/// Only fails if the table engine does.
pub fn rating_by_installs(dataset: &CleanDataset) -> Result<Vec<InstallTier>> {
    let df = dataset
        .frame()
        .clone()
        .lazy()
        .group_by_stable([col(INSTALLS)])
        .agg([len().alias(APPS), col(RATING).mean().alias(MEAN_RATING)])
        .sort_by_exprs([col(INSTALLS)], SortMultipleOptions::default())
        .collect()?;

    let installs = df.column(INSTALLS)?.as_materialized_series().i64()?;
    let means = df.column(MEAN_RATING)?.as_materialized_series().f64()?;
    column_u64(&df, APPS)?
        .into_iter()
        .enumerate()
        .map(|(idx, apps)| {
            Ok(InstallTier {
                installs: i64_at(installs, idx, INSTALLS)?,
                apps,
                mean_rating: f64_at(means, idx, MEAN_RATING)?,
            })
        })
        .collect()
}

/// Total Revenue per Genres value, largest first.
///
/// # Errors
///
/// Returns [`EdaError::DataProcessing`] when revenue has not been computed yet.
pub fn revenue_by_genre(dataset: &CleanDataset) -> Result<Vec<GenreRevenue>> {
    if !dataset.has_revenue() {
        return Err(EdaError::DataProcessing(
            "Revenue column missing; compute revenue before grouping by genre".to_owned(),
        ));
    }

    let totals = dataset
        .frame()
        .clone()
        .lazy()
        .group_by_stable([col(GENRES)])
        .agg([col(REVENUE).sum()]);
    let df = ranked(totals, REVENUE, GENRES).collect()?;

    let genres = df.column(GENRES)?.as_materialized_series().str()?;
    let revenue = df.column(REVENUE)?.as_materialized_series().f64()?;
    (0..df.height())
        .map(|idx| {
            Ok(GenreRevenue {
                genre: text_at(genres, idx, GENRES)?,
                revenue: f64_at(revenue, idx, REVENUE)?,
            })
        })
        .collect()
}

/// The best-rated app of every Category, best first.
///
/// Within a category the first record (in dataset order) holding the maximum
/// Rating wins. Categories with equal top ratings are ordered by name.
///
/// # Errors
///
/// Only fails if the table engine does.
pub fn top_rated_by_category(dataset: &CleanDataset) -> Result<Vec<Record>> {
    let row = scratch_column(dataset.frame(), ROW);
    let indexed = dataset
        .frame()
        .clone()
        .lazy()
        .with_row_index(row.as_str(), None);

    let winners = indexed
        .clone()
        .group_by_stable([col(CATEGORY)])
        .agg([col(row.as_str())
            .filter(col(RATING).eq(col(RATING).max()))
            .min()
            .alias(row.as_str())])
        .select([col(row.as_str())]);

    let joined = indexed.join(
        winners,
        [col(row.as_str())],
        [col(row.as_str())],
        JoinArgs::new(JoinType::Inner),
    );
    let df = ranked(joined, RATING, CATEGORY).collect()?;

    records_from_frame(&df)
}

fn column_u64(df: &DataFrame, name: &str) -> Result<Vec<u64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    Ok(series.u64()?.into_iter().map(Option::unwrap_or_default).collect())
}
