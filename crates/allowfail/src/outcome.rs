//! The value returned by a guarded call.

use std::error::Error;
use std::fmt;

/// Root error type every contained failure is funneled into.
///
/// The concrete error stays inside the box untouched, so callers can
/// recover it with [`downcast_ref`](Box::downcast_ref) or
/// [`downcast`](Box::downcast).
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Borrowed form of [`BoxError`], as seen by error handlers.
pub type DynError = dyn Error + Send + Sync + 'static;

/// Result of a guarded call: either the wrapped function's value or the
/// failure it produced.
///
/// An `Outcome` is created once per call and never mutated. It replaces
/// propagation: a failed call hands its error back here instead of
/// unwinding or returning `Err` through the caller.
///
/// # Example
///
/// ```
/// use allowfail::{AllowFail, Outcome};
///
/// let outcome = AllowFail::new("parse port").call(|| "80".parse::<u16>());
/// assert!(outcome.is_ok());
/// assert_eq!(outcome.ok(), Some(80));
/// ```
#[must_use = "an Outcome may hold a contained failure"]
pub enum Outcome<T> {
    /// The wrapped function returned normally.
    Ok(T),
    /// The wrapped function failed; holds the original error.
    Failed(BoxError),
}

impl<T> Outcome<T> {
    /// Returns `true` if the call succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns `true` if the call failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        !self.is_ok()
    }

    /// Borrows the success value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Borrows the captured error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&DynError> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(err) => Some(err.as_ref()),
        }
    }

    /// Converts into the success value, discarding any error.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Converts into the captured error, discarding any value.
    pub fn err(self) -> Option<BoxError> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    /// Converts into a plain `Result`.
    pub fn into_result(self) -> Result<T, BoxError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Failed(err) => Err(err),
        }
    }

    /// Maps the success value, leaving a failure untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Failed(err) => Outcome::Failed(err),
        }
    }

    /// Returns `true` if the call failed with an error of type `E`.
    #[must_use]
    pub fn failed_with<E>(&self) -> bool
    where
        E: Error + 'static,
    {
        self.error().is_some_and(|err| err.is::<E>())
    }
}

impl<T> From<Outcome<T>> for Result<T, BoxError> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}

impl<T: fmt::Debug> fmt::Debug for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(value) => f.debug_tuple("Ok").field(value).finish(),
            Self::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn ok_outcome_accessors() {
        let outcome: Outcome<i32> = Outcome::Ok(7);
        assert!(outcome.is_ok());
        assert!(!outcome.is_failed());
        assert_eq!(outcome.value(), Some(&7));
        assert!(outcome.error().is_none());
        assert_eq!(outcome.map(|v| v * 2).ok(), Some(14));
    }

    #[test]
    fn failed_outcome_keeps_concrete_error() {
        let outcome: Outcome<i32> =
            Outcome::Failed(Box::new(io::Error::new(io::ErrorKind::NotFound, "gone")));
        assert!(outcome.is_failed());
        assert!(outcome.failed_with::<io::Error>());
        assert!(!outcome.failed_with::<std::fmt::Error>());

        let err = outcome.err().unwrap();
        let io_err = err.downcast::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn into_result_round_trips_failure() {
        let outcome: Outcome<()> = Outcome::Failed("boom".into());
        let result: Result<(), BoxError> = outcome.into();
        assert_eq!(result.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn debug_output_names_variant() {
        let outcome: Outcome<u8> = Outcome::Ok(1);
        assert_eq!(format!("{:?}", outcome), "Ok(1)");
        let failed: Outcome<u8> = Outcome::Failed("bad".into());
        assert!(format!("{:?}", failed).starts_with("Failed("));
    }
}
