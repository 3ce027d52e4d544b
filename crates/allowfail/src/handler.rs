//! Error handlers: what a guard does with a failure it contained.

use serde::{Deserialize, Serialize};

use crate::failure::Panicked;
use crate::logging::Logger;
use crate::outcome::{BoxError, DynError};

/// Receives every failure a guard contains.
///
/// `label` is the guard's label with its params already interpolated, and
/// `error` is the original error object. `logger` is the guard's configured
/// channel, available to handlers that want it.
///
/// Returning `Err` means the handler itself failed. In decorator mode that
/// failure is reported separately and never reaches the caller.
///
/// Plain closures taking `(&str, &DynError)` are handlers too:
///
/// ```
/// use allowfail::AllowFail;
///
/// let guard = AllowFail::new("sync {}")
///     .param("inbox")
///     .on_error(|label: &str, err: &allowfail::DynError| eprintln!("{label}: {err}"));
/// ```
pub trait ErrorHandler {
    /// Handles one contained failure.
    fn on_error(&self, label: &str, error: &DynError, logger: &Logger) -> Result<(), BoxError>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&str, &DynError),
{
    fn on_error(&self, label: &str, error: &DynError, _logger: &Logger) -> Result<(), BoxError> {
        self(label, error);
        Ok(())
    }
}

/// The default handler: a warning on the guard's logger.
///
/// Records read `"<label> got an error: <error>"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHandler;

impl ErrorHandler for LogHandler {
    fn on_error(&self, label: &str, error: &DynError, logger: &Logger) -> Result<(), BoxError> {
        logger.warn(format_args!("{} got an error: {}", label, error));
        Ok(())
    }
}

/// A serializable snapshot of one reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The interpolated label.
    pub label: String,
    /// The error's `Display` output.
    pub message: String,
    /// Whether the failure was a caught panic.
    pub panicked: bool,
}

impl Report {
    /// Captures a report from a handler's arguments.
    #[must_use]
    pub fn new(label: &str, error: &DynError) -> Self {
        Self {
            label: label.to_string(),
            message: error.to_string(),
            panicked: error.is::<Panicked>(),
        }
    }

    /// Serializes the report as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
