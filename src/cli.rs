use anyhow::{Context as _, Result};
use appscope::config::{Settings, load_settings};
use appscope::error::EdaError;
use appscope::pipeline::{ParsePolicy, clean, compute_revenue, deduplicate, load_dataset, save_df};
use appscope::walkthrough::{NoPause, StdinPacer, WalkthroughSummary, run_walkthrough};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "appscope",
    version,
    about = "Guided exploratory analysis of an app store dataset"
)]
pub struct Cli {
    /// Path to a JSON settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the six challenges one after another (default)
    Walkthrough(WalkthroughArgs),
    /// Clean a file, add Revenue and save the result
    Clean {
        /// Input CSV file. Defaults to data/apps.csv.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output file path (.csv, .parquet or .json)
        #[arg(short, long)]
        output: PathBuf,

        /// What to do with values that cannot be coerced
        #[arg(long, value_enum)]
        on_parse_error: Option<ParsePolicy>,
    },
}

#[derive(Args, Default)]
pub struct WalkthroughArgs {
    /// Input CSV file. Defaults to data/apps.csv.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Run every challenge without waiting for ENTER
    #[arg(long)]
    pub no_pause: bool,

    /// Rows shown in ranked tables
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub top: Option<u64>,

    /// What to do with values that cannot be coerced
    #[arg(long, value_enum)]
    pub on_parse_error: Option<ParsePolicy>,

    /// Also write every view as CSV into this directory
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

impl WalkthroughArgs {
    /// Command-line flags win over the settings file.
    fn apply(self, settings: &mut Settings) -> Result<()> {
        if let Some(file) = self.file {
            settings.input_path = file;
        }
        if self.no_pause {
            settings.pause = false;
        }
        if let Some(top) = self.top {
            settings.top_n = usize::try_from(top).context("--top is too large")?;
        }
        if let Some(policy) = self.on_parse_error {
            settings.parse_policy = policy;
        }
        if self.export_dir.is_some() {
            settings.export_dir = self.export_dir;
        }
        Ok(())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref()).context("Failed to load settings")?;
    match cli.command {
        Some(Commands::Walkthrough(args)) => handle_walkthrough(args, settings),
        None => handle_walkthrough(WalkthroughArgs::default(), settings),
        Some(Commands::Clean {
            file,
            output,
            on_parse_error,
        }) => handle_clean(file, output, on_parse_error, settings),
    }
}

fn handle_walkthrough(args: WalkthroughArgs, mut settings: Settings) -> Result<()> {
    args.apply(&mut settings)?;

    let raw = load_dataset(&settings.input_path)?;
    let mut out = std::io::stdout().lock();
    let result = if settings.pause {
        run_walkthrough(raw, &settings, &mut StdinPacer::stdin(), &mut out)
    } else {
        run_walkthrough(raw, &settings, &mut NoPause, &mut out)
    };

    match result {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(EdaError::Aborted) => {
            log::info!("Walkthrough stopped at the user's request");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_summary(summary: &WalkthroughSummary) {
    println!(
        "Completed {} challenges ({} duplicates removed, {} records analysed).",
        summary.challenges_completed, summary.duplicates_removed, summary.clean.rows_after
    );
    for path in &summary.exported {
        println!("Exported: {}", path.display());
    }
}

fn handle_clean(
    file: Option<PathBuf>,
    output: PathBuf,
    on_parse_error: Option<ParsePolicy>,
    settings: Settings,
) -> Result<()> {
    let input = file.unwrap_or(settings.input_path);
    let policy = on_parse_error.unwrap_or(settings.parse_policy);

    println!("Cleaning {} into {}...", input.display(), output.display());
    let raw = load_dataset(&input)?;
    let (dataset, duplicates) = deduplicate(raw)?;
    let (cleaned, report) = clean(dataset, policy)?;
    for err in &report.parse_errors {
        println!("  skipped: {err}");
    }

    let mut df = compute_revenue(cleaned)?.into_frame();
    save_df(&mut df, &output).context("Failed to save cleaned file")?;

    println!("Removed {duplicates} duplicates. {}", report.summary());
    println!("Successfully cleaned.");
    Ok(())
}
