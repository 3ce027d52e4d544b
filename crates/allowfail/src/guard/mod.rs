//! Failure containment for functions and blocks.
//!
//! This module provides the [`AllowFail`] guard, which runs work, reports any
//! failure through an [`ErrorHandler`](crate::ErrorHandler) and suppresses
//! it, plus the reusable [`Protected`] wrapper it produces in decorator mode.

mod allow_fail;
mod protected;

use std::error::Error;
use std::fmt;

use crate::label::LabelError;
use crate::outcome::BoxError;

pub use allow_fail::AllowFail;
pub use protected::Protected;

/// Why a scoped-block guard could not report a failure it contained.
///
/// The guarded block's own failure is always suppressed; this error only
/// describes a problem in the reporting path.
#[derive(Debug)]
pub enum ReportError {
    /// The label template does not match its params.
    Label(LabelError),
    /// The error handler returned an error.
    Handler(BoxError),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(err) => write!(f, "malformed guard label: {err}"),
            Self::Handler(err) => write!(f, "error handler failed: {err}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Label(err) => Some(err),
            Self::Handler(err) => Some(err.as_ref()),
        }
    }
}

impl From<LabelError> for ReportError {
    fn from(err: LabelError) -> Self {
        Self::Label(err)
    }
}
