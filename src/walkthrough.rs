//! Step-by-step console walkthrough of the app dataset.
//!
//! The driver owns the dataset and threads it through the pipeline one
//! challenge at a time:
//!
//! ```text
//! Dataset ─> deduplicate ─> [1] clean ─> [2] counts ─> [3] ratings
//!        ─> [4] install tiers ─> [5] revenue by genre ─> [6] top rated
//! ```
//!
//! Before each challenge it prints `Challenge: <title>` and asks the [`Pacer`]
//! whether to go on.

use crate::config::Settings;
use crate::error::{EdaError, Result};
use crate::pipeline::types::{APP, CATEGORY, GENRES, INSTALLS, PRICE, RATING, REVENUE, REVIEWS};
use crate::pipeline::{
    CleanReport, Dataset, average_rating_by_category, category_counts, clean, compute_revenue,
    deduplicate, rating_by_installs, revenue_by_genre, save_df, top_rated_by_category,
};
use crate::report;
use polars::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Challenge titles, in walkthrough order.
pub const CHALLENGES: [&str; 6] = [
    "Clean the data by removing NaN, duplicates, and converting data types appropriately",
    "Visualize the number of apps per category",
    "Visualize average rating per category",
    "Explore the relationship between number of installs and ratings",
    "Which genres have the most revenue potential?",
    "Find the top-rated apps in each category",
];

/// Decides when the walkthrough moves on to the next challenge.
pub trait Pacer {
    /// Called after the challenge title is printed.
    ///
    /// # Errors
    ///
    /// Returns [`EdaError::Aborted`] when the user asks to stop.
    fn pause(&mut self, out: &mut dyn Write) -> Result<()>;
}

/// Never waits. Used for `--no-pause` and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&mut self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}

/// Waits for a line of input. `q` or `quit` aborts; end of input continues.
#[derive(Debug)]
pub struct LinePacer<R> {
    input: R,
}

pub type StdinPacer = LinePacer<io::StdinLock<'static>>;

impl<R: BufRead> LinePacer<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl StdinPacer {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Pacer for LinePacer<R> {
    fn pause(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Press ENTER to see the result (q to quit)...")?;
        out.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        match line.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" => Err(EdaError::Aborted),
            _ => Ok(()),
        }
    }
}

/// What a completed walkthrough did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkthroughSummary {
    pub duplicates_removed: usize,
    pub clean: CleanReport,
    pub challenges_completed: usize,
    /// Files written to the export directory, in challenge order.
    pub exported: Vec<PathBuf>,
}

/// Runs all six challenges over `raw`, writing tables to `out`.
///
/// # Errors
///
/// Stops at the first failure: a [`EdaError::Parse`] from Clean under the
/// `fail` policy, [`EdaError::Aborted`] from the pacer, or an I/O error while
/// writing output or exports.
pub fn run_walkthrough(
    raw: Dataset,
    settings: &Settings,
    pacer: &mut impl Pacer,
    out: &mut impl Write,
) -> Result<WalkthroughSummary> {
    let (dataset, duplicates_removed) = deduplicate(raw)?;
    let mut summary = WalkthroughSummary {
        duplicates_removed,
        ..WalkthroughSummary::default()
    };
    let top_n = settings.top_n;
    let export_dir = settings.export_dir.as_deref();

    // 1
    announce(0, pacer, out)?;
    let (cleaned, clean_report) = clean(dataset, settings.parse_policy)?;
    report::write_clean_report(out, duplicates_removed, &clean_report, &cleaned)?;
    summary.clean = clean_report;
    export(export_dir, "cleaned.csv", &mut cleaned.frame().clone(), &mut summary)?;
    summary.challenges_completed += 1;

    // 2
    announce(1, pacer, out)?;
    let counts = category_counts(&cleaned)?;
    report::write_category_counts(out, &counts, top_n)?;
    if export_dir.is_some() {
        let mut df = df!(
            CATEGORY => counts.iter().map(|c| c.category.clone()).collect::<Vec<_>>(),
            "apps" => counts.iter().map(|c| c.apps).collect::<Vec<_>>()
        )?;
        export(export_dir, "category_counts.csv", &mut df, &mut summary)?;
    }
    summary.challenges_completed += 1;

    // 3
    announce(2, pacer, out)?;
    let ratings = average_rating_by_category(&cleaned)?;
    report::write_category_ratings(out, &ratings, top_n)?;
    if export_dir.is_some() {
        let mut df = df!(
            CATEGORY => ratings.iter().map(|r| r.category.clone()).collect::<Vec<_>>(),
            "mean_rating" => ratings.iter().map(|r| r.mean_rating).collect::<Vec<_>>(),
            "apps" => ratings.iter().map(|r| r.apps).collect::<Vec<_>>()
        )?;
        export(export_dir, "category_ratings.csv", &mut df, &mut summary)?;
    }
    summary.challenges_completed += 1;

    // 4
    announce(3, pacer, out)?;
    let tiers = rating_by_installs(&cleaned)?;
    report::write_install_tiers(out, &tiers)?;
    if export_dir.is_some() {
        let mut df = df!(
            INSTALLS => tiers.iter().map(|t| t.installs).collect::<Vec<_>>(),
            "apps" => tiers.iter().map(|t| t.apps).collect::<Vec<_>>(),
            "mean_rating" => tiers.iter().map(|t| t.mean_rating).collect::<Vec<_>>()
        )?;
        export(export_dir, "install_tiers.csv", &mut df, &mut summary)?;
    }
    summary.challenges_completed += 1;

    // 5
    announce(4, pacer, out)?;
    let cleaned = compute_revenue(cleaned)?;
    let genres = revenue_by_genre(&cleaned)?;
    report::write_genre_revenue(out, &genres, top_n)?;
    if export_dir.is_some() {
        let mut df = df!(
            GENRES => genres.iter().map(|g| g.genre.clone()).collect::<Vec<_>>(),
            REVENUE => genres.iter().map(|g| g.revenue).collect::<Vec<_>>()
        )?;
        export(export_dir, "genre_revenue.csv", &mut df, &mut summary)?;
    }
    summary.challenges_completed += 1;

    // 6
    announce(5, pacer, out)?;
    let winners = top_rated_by_category(&cleaned)?;
    report::write_top_rated(out, &winners)?;
    if export_dir.is_some() {
        let mut df = df!(
            APP => winners.iter().map(|r| r.app.clone()).collect::<Vec<_>>(),
            CATEGORY => winners.iter().map(|r| r.category.clone()).collect::<Vec<_>>(),
            RATING => winners.iter().map(|r| r.rating).collect::<Vec<_>>(),
            REVIEWS => winners.iter().map(|r| r.reviews).collect::<Vec<_>>(),
            INSTALLS => winners.iter().map(|r| r.installs).collect::<Vec<_>>(),
            PRICE => winners.iter().map(|r| r.price).collect::<Vec<_>>(),
            GENRES => winners.iter().map(|r| r.genres.clone()).collect::<Vec<_>>()
        )?;
        export(export_dir, "top_rated.csv", &mut df, &mut summary)?;
    }
    summary.challenges_completed += 1;

    log::info!(
        "Walkthrough finished: {} challenges, {} files exported",
        summary.challenges_completed,
        summary.exported.len()
    );
    Ok(summary)
}

fn announce(idx: usize, pacer: &mut impl Pacer, out: &mut impl Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Challenge: {}", CHALLENGES[idx])?;
    pacer.pause(out)
}

fn export(
    dir: Option<&Path>,
    file_name: &str,
    df: &mut DataFrame,
    summary: &mut WalkthroughSummary,
) -> Result<()> {
    let Some(dir) = dir else {
        return Ok(());
    };
    let path = dir.join(file_name);
    save_df(df, &path)?;
    log::debug!("Exported {} rows to {}", df.height(), path.display());
    summary.exported.push(path);
    Ok(())
}
