use crate::error::{EdaError, ParseError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// COLUMN NAMES

pub const APP: &str = "App";
pub const CATEGORY: &str = "Category";
pub const RATING: &str = "Rating";
pub const REVIEWS: &str = "Reviews";
pub const INSTALLS: &str = "Installs";
pub const PRICE: &str = "Price";
pub const GENRES: &str = "Genres";
pub const REVENUE: &str = "Revenue";

/// Columns every input file must carry. Anything else passes through untouched.
pub const REQUIRED_COLUMNS: [&str; 7] = [APP, CATEGORY, RATING, REVIEWS, INSTALLS, PRICE, GENRES];

/// Base name of the scratch column holding the 1-based record number while cleaning.
pub(crate) const RECORD_INDEX: &str = "__record";

/// A column name derived from `base` that `df` does not use yet.
///
/// Extra input columns pass through untouched, so scratch columns must never
/// collide with them.
pub(crate) fn scratch_column(df: &DataFrame, base: &str) -> String {
    let mut name = base.to_owned();
    while df.column(&name).is_ok() {
        name.insert(0, '_');
    }
    name
}

// DATASETS

/// Raw app records as loaded, every column still text.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    /// Wraps a frame, checking that the required columns are present.
    ///
    /// # Errors
    ///
    /// Returns [`EdaError::Load`] naming the first missing column.
    pub fn new(df: DataFrame) -> Result<Self> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(EdaError::Load(format!("required column '{name}' not found")));
            }
        }
        Ok(Self { df })
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }
}

/// A dataset that went through [`clean`](super::cleaning::clean).
///
/// No column holds a missing value, Rating is `Float64`, Reviews and Installs are
/// non-negative `Int64`, and Price is a finite non-negative `Float64`. Only the
/// pipeline can build one.
#[derive(Debug, Clone)]
pub struct CleanDataset {
    df: DataFrame,
}

impl CleanDataset {
    pub(crate) fn from_cleaned(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    /// True once [`compute_revenue`](super::revenue::compute_revenue) has run.
    pub fn has_revenue(&self) -> bool {
        self.df.column(REVENUE).is_ok()
    }

    /// Typed view of every record, in dataset order.
    ///
    /// # Errors
    ///
    /// Fails only if the frame no longer has the clean column types.
    pub fn records(&self) -> Result<Vec<Record>> {
        records_from_frame(&self.df)
    }
}

/// One cleaned app record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub app: String,
    pub category: String,
    pub rating: f64,
    pub reviews: i64,
    pub installs: i64,
    pub price: f64,
    pub genres: String,
    pub revenue: Option<f64>,
}

pub(crate) fn records_from_frame(df: &DataFrame) -> Result<Vec<Record>> {
    let app = df.column(APP)?.as_materialized_series().str()?;
    let category = df.column(CATEGORY)?.as_materialized_series().str()?;
    let genres = df.column(GENRES)?.as_materialized_series().str()?;
    let rating = df.column(RATING)?.as_materialized_series().f64()?;
    let reviews = df.column(REVIEWS)?.as_materialized_series().i64()?;
    let installs = df.column(INSTALLS)?.as_materialized_series().i64()?;
    let price = df.column(PRICE)?.as_materialized_series().f64()?;
    let revenue = match df.column(REVENUE) {
        Ok(c) => Some(c.as_materialized_series().f64()?),
        Err(_) => None,
    };

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        records.push(Record {
            app: text_at(app, idx, APP)?,
            category: text_at(category, idx, CATEGORY)?,
            rating: f64_at(rating, idx, RATING)?,
            reviews: i64_at(reviews, idx, REVIEWS)?,
            installs: i64_at(installs, idx, INSTALLS)?,
            price: f64_at(price, idx, PRICE)?,
            genres: text_at(genres, idx, GENRES)?,
            revenue: match revenue {
                Some(ca) => Some(f64_at(ca, idx, REVENUE)?),
                None => None,
            },
        });
    }
    Ok(records)
}

fn missing(column: &str, idx: usize) -> EdaError {
    EdaError::DataProcessing(format!("unexpected null in '{column}' at row {idx}"))
}

pub(crate) fn text_at(ca: &StringChunked, idx: usize, column: &str) -> Result<String> {
    ca.get(idx)
        .map(str::to_owned)
        .ok_or_else(|| missing(column, idx))
}

pub(crate) fn f64_at(ca: &Float64Chunked, idx: usize, column: &str) -> Result<f64> {
    ca.get(idx).ok_or_else(|| missing(column, idx))
}

pub(crate) fn i64_at(ca: &Int64Chunked, idx: usize, column: &str) -> Result<i64> {
    ca.get(idx).ok_or_else(|| missing(column, idx))
}

// CLEANING

/// What Clean does with a value that cannot be coerced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Abort on the first bad value.
    #[default]
    Fail,
    /// Drop the offending records and report every bad value.
    Skip,
}

/// Row accounting for one Clean run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    pub rows_before: usize,
    pub rows_with_nulls: usize,
    pub invalid_ratings: usize,
    pub parse_errors: Vec<ParseError>,
    pub rows_after: usize,
}

impl CleanReport {
    /// Records dropped because at least one of their values failed coercion.
    pub fn unparseable_rows(&self) -> usize {
        self.rows_before
            .saturating_sub(self.rows_with_nulls)
            .saturating_sub(self.invalid_ratings)
            .saturating_sub(self.rows_after)
    }

    pub fn summary(&self) -> String {
        format!(
            "Clean: {} -> {} records ({} with missing values, {} with non-numeric rating, {} unparseable)",
            self.rows_before,
            self.rows_after,
            self.rows_with_nulls,
            self.invalid_ratings,
            self.unparseable_rows()
        )
    }
}

// DERIVED VIEWS

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub apps: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRating {
    pub category: String,
    pub mean_rating: f64,
    pub apps: u64,
}

/// Ratings of the apps sharing one Installs value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallTier {
    pub installs: i64,
    pub apps: u64,
    pub mean_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreRevenue {
    pub genre: String,
    pub revenue: f64,
}
