//! Console logging for appscope.
//!
//! The library logs through the `log` facade; the binary installs `env_logger`
//! once at startup. Log lines go to stderr so they never interleave with the
//! walkthrough tables on stdout.
//!
//! ```no_run
//! appscope::logging::init(1); // -v
//! log::info!("Walkthrough started");
//! ```

use env_logger::Env;

/// Filter used when `RUST_LOG` is not set, by `-v` count.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the logger. `RUST_LOG` overrides the verbosity flag.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8) {
    let env = Env::default().default_filter_or(default_filter(verbosity));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
