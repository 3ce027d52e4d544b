//! Capturing failures from guarded work.
//!
//! Guarded work can fail two ways: by returning `Err`, or by panicking.
//! [`capture`] runs a closure and folds both into a single [`BoxError`].
//! Panics are turned into a [`Panicked`] value; a [`Cancelled`] unwind is
//! never captured and keeps unwinding past every guard.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::logging::targets;
use crate::outcome::BoxError;

/// Error value produced when guarded work panics.
///
/// The panic message is kept when the payload is a string. Any other payload
/// (for example `std::panic::panic_any(())`) still produces a `Panicked`
/// value, just without a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panicked {
    message: Option<String>,
}

impl Panicked {
    /// Creates a `Panicked` value with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Creates a `Panicked` value that carries no message.
    #[must_use]
    pub fn without_message() -> Self {
        Self { message: None }
    }

    /// Builds a `Panicked` value from a raw panic payload.
    #[must_use]
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&'static str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        Self { message }
    }

    /// The panic message, if the payload was a string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "panicked: {message}"),
            None => f.write_str("panicked"),
        }
    }
}

impl Error for Panicked {}

/// Unwind payload used to request cancellation.
///
/// Guards treat a `Cancelled` unwind as a shutdown request rather than a
/// failure: it is re-raised untouched and never reaches an error handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cancelled")
    }
}

impl Error for Cancelled {}

/// Unwinds the current thread with a [`Cancelled`] payload.
///
/// No guard suppresses this unwind. The panic hook is not invoked.
///
/// # Example
///
/// ```
/// use allowfail::{AllowFail, Cancelled, cancel};
///
/// let result = std::panic::catch_unwind(|| {
///     let _ = AllowFail::new("work").protect(|| -> Result<(), Cancelled> { cancel() });
/// });
/// let payload = result.unwrap_err();
/// assert!(payload.is::<Cancelled>());
/// ```
pub fn cancel() -> ! {
    panic::resume_unwind(Box::new(Cancelled))
}

/// Runs `work`, converting both `Err` returns and panics into a [`BoxError`].
///
/// A [`Cancelled`] unwind is resumed instead of captured.
pub fn capture<T, E, F>(work: F) -> Result<T, BoxError>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<BoxError>,
{
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(result) => result.map_err(Into::into),
        Err(payload) => Err(from_panic(payload)),
    }
}

/// Converts a caught panic payload into an error, resuming cancellation.
pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> BoxError {
    if payload.is::<Cancelled>() {
        log::trace!(target: targets::ALLOWFAIL, "cancellation unwind passed through guard");
        panic::resume_unwind(payload);
    }
    Box::new(Panicked::from_payload(payload.as_ref()))
}
