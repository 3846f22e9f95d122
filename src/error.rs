//! Centralized error handling for appscope.
//!
//! Every fallible library operation returns [`Result`], whose error type is
//! [`EdaError`]. The variants follow the stage that failed:
//!
//! - [`EdaError::Load`]: the input file is missing, unreadable, or lacks a
//!   required column. Fatal for the run.
//! - [`EdaError::Parse`]: a Reviews/Installs/Price value could not be coerced.
//!   The wrapped [`ParseError`] names the column, the raw value and the record.
//! - [`EdaError::DataProcessing`]: the underlying `polars` engine failed.
//! - [`EdaError::Aborted`]: the user quit the walkthrough.
//!
//! ```
//! use appscope::error::{EdaError, ParseError};
//!
//! let err = EdaError::from(ParseError::new("Installs", "Free", 7, "Some App", "not a whole number"));
//! assert!(err.to_string().contains("'Free'"));
//! ```

use std::fmt;

/// A value that could not be coerced to its typed representation during Clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Column the value came from (Reviews, Installs or Price).
    pub column: String,

    /// The raw text as it appeared in the input.
    pub value: String,

    /// 1-based position of the record in the deduplicated dataset.
    pub record: u64,

    /// App name of the offending record, for display.
    pub app: String,

    /// Why the value was rejected.
    pub reason: String,
}

impl ParseError {
    pub fn new(
        column: impl Into<String>,
        value: impl Into<String>,
        record: u64,
        app: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            record,
            app: app.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: cannot coerce '{}' ({}) in record {} (app '{}')",
            self.column, self.value, self.reason, self.record, self.app
        )
    }
}

impl std::error::Error for ParseError {}

/// Main error type for appscope operations.
#[derive(Debug)]
pub enum EdaError {
    /// I/O errors (file operations, console)
    Io(std::io::Error),

    /// Input file missing, unreadable, or missing required columns
    Load(String),

    /// A value failed type coercion during Clean
    Parse(ParseError),

    /// Table engine errors (Polars)
    DataProcessing(String),

    /// Configuration errors
    Config(String),

    /// Walkthrough quit by the user
    Aborted,

    /// Generic error with context
    Other(String),
}

impl fmt::Display for EdaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Load(msg) => write!(f, "Load error: {msg}"),
            Self::Parse(e) => write!(f, "Parse error during clean: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Aborted => write!(f, "Walkthrough aborted by user"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EdaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EdaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ParseError> for EdaError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<serde_json::Error> for EdaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for EdaError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for appscope operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<EdaError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: EdaError = e.into();
            EdaError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: EdaError = e.into();
            EdaError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EdaError::Load("missing column 'Genres'".to_owned());
        assert_eq!(err.to_string(), "Load error: missing column 'Genres'");
    }

    #[test]
    fn test_parse_error_names_value_and_record() {
        let err: EdaError =
            ParseError::new("Price", "Everyone", 12, "Life Made WI-Fi", "not a number").into();
        let msg = err.to_string();
        assert!(msg.starts_with("Parse error during clean: Price"));
        assert!(msg.contains("'Everyone'"));
        assert!(msg.contains("record 12"));
        assert!(msg.contains("Life Made WI-Fi"));
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "apps.csv",
        ));

        let result: Result<()> = result.context("Failed to read dataset");
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("Failed to read dataset"));
        assert!(msg.contains("apps.csv"));
    }

    #[test]
    fn test_parse_error_is_source() {
        use std::error::Error as _;
        let err = EdaError::Parse(ParseError::new("Reviews", "3.0M", 1, "A", "not a whole number"));
        assert!(err.source().is_some());
        assert!(EdaError::Aborted.source().is_none());
    }
}
