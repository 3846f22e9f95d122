//! # appscope entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Install env_logger (-v / RUST_LOG)
//!   └─> Run the command; no command means the walkthrough
//! ```
//!
//! Errors bubble up as `anyhow::Error`, so a failed run exits non-zero with the
//! stage and the offending value in the message.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    appscope::logging::init(cli.verbose);
    cli::run(cli)
}
