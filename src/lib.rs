//! # appscope - guided analysis of an app store dataset
//!
//! appscope loads a CSV of app store listings, cleans it into typed columns,
//! and derives the views behind a six-step console walkthrough.
//!
//! ## Quick Start
//!
//! ```no_run
//! use appscope::config::Settings;
//! use appscope::pipeline::load_dataset;
//! use appscope::walkthrough::{NoPause, run_walkthrough};
//!
//! let settings = Settings::default();
//! let raw = load_dataset(&settings.input_path)?;
//! let summary = run_walkthrough(raw, &settings, &mut NoPause, &mut std::io::stdout())?;
//! assert_eq!(summary.challenges_completed, 6);
//! # Ok::<(), appscope::error::EdaError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`pipeline`]: load, deduplicate, clean, revenue and the derived views
//! - [`walkthrough`]: the challenge driver and its [`walkthrough::Pacer`] seam
//! - [`report`]: plain-text tables
//! - [`config`]: JSON settings
//! - [`error`]: error types and handling utilities
//! - [`logging`]: `env_logger` setup
//! - [`utils`]: number formatting
//!
//! ## Typestate
//!
//! Only [`pipeline::clean`] can produce a [`pipeline::CleanDataset`], and every
//! derived view takes one. Aggregating raw text is a compile error rather than
//! a runtime surprise.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod utils;
pub mod walkthrough;
