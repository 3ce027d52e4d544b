//! The [`AllowFail`] guard.
//!
//! A guard is configured once (label, params, handler, logger) and then
//! used either to protect a block or to wrap a function.
//!
//! # Example
//!
//! ```
//! use allowfail::AllowFail;
//!
//! // Scoped block: the failure is logged and execution continues.
//! AllowFail::new("refresh cache for {}")
//!     .param("user-42")
//!     .protect(|| -> Result<(), std::io::Error> {
//!         Err(std::io::Error::other("cache offline"))
//!     })
//!     .unwrap();
//!
//! // Decorator: the call returns an Outcome instead of failing.
//! let outcome = AllowFail::new("parse {}").param("count").call(|| "x".parse::<u32>());
//! assert!(outcome.is_failed());
//! ```

use std::any::type_name;
use std::fmt;

use crate::failure::capture;
use crate::guard::{Protected, ReportError};
use crate::handler::{ErrorHandler, LogHandler};
use crate::label::Label;
use crate::logging::{Logger, targets};
use crate::outcome::{BoxError, DynError, Outcome};

/// Label template of the guard that reports handler failures.
const HANDLER_FAILURE_LABEL: &str = "On error handler: {}";

/// Contains failures of guarded work and reports them.
///
/// Failures are `Err` returns and panics. Each one is handed to the error
/// handler together with the interpolated label, then suppressed.
/// Cancellation unwinds (see [`cancel`](crate::cancel)) are never contained.
///
/// Configuration is fixed once the guard is built. Guards are cheap; build
/// one per call site or per block.
pub struct AllowFail<H = LogHandler> {
    label: Label,
    handler: H,
    logger: Logger,
}

impl AllowFail {
    /// Creates a guard with the default handler and logger.
    ///
    /// The default handler writes a warning to the `OnError` channel.
    #[must_use]
    pub fn new(label: impl Into<Label>) -> Self {
        Self {
            label: label.into(),
            handler: LogHandler,
            logger: Logger::default(),
        }
    }
}

impl<H> AllowFail<H> {
    /// Adds a positional param for the label template.
    #[must_use]
    pub fn param(mut self, param: impl fmt::Display) -> Self {
        self.label.push(param);
        self
    }

    /// Adds several positional params, in order.
    #[must_use]
    pub fn params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        for param in params {
            self.label.push(param);
        }
        self
    }

    /// Replaces the error handler.
    #[must_use]
    pub fn on_error<H2>(self, handler: H2) -> AllowFail<H2>
    where
        H2: ErrorHandler,
    {
        AllowFail {
            label: self.label,
            handler,
            logger: self.logger,
        }
    }

    /// Replaces the logger handed to the error handler.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// The label template and params.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// The configured logger.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The configured error handler.
    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Wraps `func` into a reusable [`Protected`] function.
    ///
    /// The wrapper is named after `func`'s type; use
    /// [`Protected::named`] to give it a readable name.
    pub fn wrap<F>(self, func: F) -> Protected<F, H> {
        Protected::new(self, func)
    }
}

impl<H: ErrorHandler> AllowFail<H> {
    /// Runs `block`, suppressing any failure inside it.
    ///
    /// On failure the handler is called with the interpolated label and the
    /// error, and `Ok(())` is returned. Values owned by the block are
    /// dropped before the handler runs.
    ///
    /// `Err` is returned only when the failure could not be reported: the
    /// label is malformed, or the handler returned an error. A panicking
    /// handler is not shielded here.
    pub fn protect<F, E>(&self, block: F) -> Result<(), ReportError>
    where
        F: FnOnce() -> Result<(), E>,
        E: Into<BoxError>,
    {
        self.protect_with(block).map(|_| ())
    }

    /// Like [`protect`](Self::protect), for blocks that produce a value.
    ///
    /// Returns `Ok(Some(value))` on success and `Ok(None)` when a failure
    /// was contained.
    pub fn protect_with<T, F, E>(&self, block: F) -> Result<Option<T>, ReportError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        match capture(block) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                self.report(error.as_ref())?;
                Ok(None)
            }
        }
    }

    /// Calls `func` once, returning an [`Outcome`] instead of failing.
    ///
    /// Handler failures are reported under the name of `func`'s type.
    pub fn call<T, F, E>(&self, func: F) -> Outcome<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.call_named(type_name::<F>(), func)
    }

    /// Calls `func` once, returning an [`Outcome`] instead of failing.
    ///
    /// On failure the handler is called with the interpolated label and the
    /// original error, which is then returned in [`Outcome::Failed`].
    ///
    /// If reporting fails (the handler errors or panics, or the label is
    /// malformed), that secondary failure is logged by a fresh default guard
    /// labeled `On error handler: <name>` and never propagates.
    pub fn call_named<T, F, E>(&self, name: &str, func: F) -> Outcome<T>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        match capture(func) {
            Ok(value) => Outcome::Ok(value),
            Err(error) => {
                log::debug!(target: targets::ALLOWFAIL, "contained failure in {}", name);
                self.report_shielded(name, error.as_ref());
                Outcome::Failed(error)
            }
        }
    }

    fn report(&self, error: &DynError) -> Result<(), ReportError> {
        let label = self.label.render()?;
        self.handler
            .on_error(&label, error, &self.logger)
            .map_err(ReportError::Handler)
    }

    /// Reports through the handler, containing any failure of the handler
    /// itself. The fallback guard always uses the default logger.
    fn report_shielded(&self, name: &str, error: &DynError) {
        let fallback = AllowFail::new(HANDLER_FAILURE_LABEL).param(name);
        let reported = fallback.protect(|| {
            self.report(error).map_err(|err| match err {
                ReportError::Handler(source) => source,
                other => BoxError::from(other),
            })
        });
        if let Err(err) = reported {
            log::error!(target: targets::ALLOWFAIL, "{}: {}", name, err);
        }
    }
}

impl<H> fmt::Debug for AllowFail<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllowFail")
            .field("label", &self.label)
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}
