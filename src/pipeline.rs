//! The app dataset pipeline.
//!
//! Each stage takes the previous stage's value and returns a new one; nothing is
//! shared between stages.
//!
//! ```text
//! load_dataset ─> deduplicate ─> clean ─> compute_revenue
//!                                  │             │
//!                                  ├─> category_counts
//!                                  ├─> average_rating_by_category
//!                                  ├─> rating_by_installs
//!                                  ├─> top_rated_by_category
//!                                  │             └─> revenue_by_genre
//! ```
//!
//! # Example
//!
//! ```no_run
//! use appscope::pipeline::{self, ParsePolicy};
//! use std::path::Path;
//!
//! let raw = pipeline::load_dataset(Path::new("data/apps.csv"))?;
//! let (raw, _duplicates) = pipeline::deduplicate(raw)?;
//! let (cleaned, report) = pipeline::clean(raw, ParsePolicy::Skip)?;
//! println!("{}", report.summary());
//!
//! let cleaned = pipeline::compute_revenue(cleaned)?;
//! for genre in pipeline::revenue_by_genre(&cleaned)?.iter().take(5) {
//!     println!("{}: {:.0}", genre.genre, genre.revenue);
//! }
//! # Ok::<(), appscope::error::EdaError>(())
//! ```

pub mod aggregate;
pub mod cleaning;
pub mod io;
pub mod revenue;
pub mod types;

pub use aggregate::{
    average_rating_by_category, category_counts, rating_by_installs, revenue_by_genre,
    top_rated_by_category,
};
pub use cleaning::{clean, deduplicate, parse_installs, parse_price, parse_rating, parse_reviews};
pub use io::{load_dataset, save_df};
pub use revenue::compute_revenue;
pub use types::{
    CategoryCount, CategoryRating, CleanDataset, CleanReport, Dataset, GenreRevenue,
    InstallTier, ParsePolicy, REQUIRED_COLUMNS, Record,
};
