//! Logging for allowfail.
//!
//! Reports go through the standard [`log`] facade. allowfail does not ship a
//! log implementation; applications initialize their preferred backend:
//!
//! ```ignore
//! env_logger::init();
//! ```
//!
//! # Log Targets
//!
//! - `OnError`: failure reports written by the default handler
//! - `allowfail`: internal diagnostics (trace level)
//!
//! Example filter: `RUST_LOG=OnError=warn`
//!
//! # Channels
//!
//! A [`Logger`] is a named channel: a target plus a sink. The sink is the
//! global facade unless a [`log::Log`] implementation is injected with
//! [`Logger::with_sink`], which is how tests capture reports without
//! installing a global logger.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

// Re-export log macros for ergonomic use
pub use log::{debug, error, info, trace, warn};

// Re-export log level types for programmatic use
pub use log::{Level, LevelFilter};

/// Log targets used by allowfail.
pub mod targets {
    /// Default channel for failure reports.
    pub const ON_ERROR: &str = "OnError";

    /// Internal diagnostics.
    pub const ALLOWFAIL: &str = "allowfail";
}

static DEFAULT_LOGGER: Logger = Logger::named(targets::ON_ERROR);

/// Returns the process-wide default channel (`OnError` on the global facade).
#[must_use]
pub fn default_logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

#[derive(Clone)]
enum Sink {
    Global,
    Custom(Arc<dyn log::Log>),
}

/// A named logging channel.
#[derive(Clone)]
pub struct Logger {
    target: Cow<'static, str>,
    sink: Sink,
}

impl Logger {
    /// Creates a channel with a static target on the global facade.
    #[must_use]
    pub const fn named(target: &'static str) -> Self {
        Self {
            target: Cow::Borrowed(target),
            sink: Sink::Global,
        }
    }

    /// Creates a channel with an owned target on the global facade.
    #[must_use]
    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            target: Cow::Owned(target.into()),
            sink: Sink::Global,
        }
    }

    /// Routes this channel to a specific `Log` implementation instead of the
    /// global facade.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn log::Log>) -> Self {
        self.sink = Sink::Custom(sink);
        self
    }

    /// The target records are written under.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns whether this channel would emit a record at `level`.
    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        let metadata = log::Metadata::builder()
            .level(level)
            .target(&self.target)
            .build();
        match &self.sink {
            Sink::Global => level <= log::max_level() && log::logger().enabled(&metadata),
            Sink::Custom(sink) => sink.enabled(&metadata),
        }
    }

    /// Writes a record at `level`.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        match &self.sink {
            Sink::Global => log::log!(target: self.target(), level, "{}", args),
            Sink::Custom(sink) => {
                let record = log::Record::builder()
                    .args(args)
                    .level(level)
                    .target(&self.target)
                    .module_path_static(Some(module_path!()))
                    .build();
                if sink.enabled(record.metadata()) {
                    sink.log(&record);
                }
            }
        }
    }

    /// Writes a warning-level record.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }
}

impl Default for Logger {
    fn default() -> Self {
        DEFAULT_LOGGER.clone()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink = match self.sink {
            Sink::Global => "global",
            Sink::Custom(_) => "custom",
        };
        f.debug_struct("Logger")
            .field("target", &self.target)
            .field("sink", &sink)
            .finish()
    }
}
