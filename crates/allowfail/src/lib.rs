#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod failure; // Panic capture and cancellation
pub mod guard; // AllowFail guard and Protected wrapper
pub mod handler; // Error handlers and reports
pub mod label; // Label templates
pub mod logging; // Log targets and channels
pub mod outcome; // Outcome and root error type
pub mod testing; // Test utilities

pub use failure::{Cancelled, Panicked, cancel};
pub use guard::{AllowFail, Protected, ReportError};
pub use handler::{ErrorHandler, LogHandler, Report};
pub use label::{Label, LabelError};
pub use logging::{Logger, default_logger};
pub use outcome::{BoxError, DynError, Outcome};

#[cfg(feature = "macros")]
pub use allowfail_macros::allow_fail;
