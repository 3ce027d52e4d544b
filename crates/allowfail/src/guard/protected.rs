//! Reusable protected functions.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

use crate::guard::AllowFail;
use crate::handler::{ErrorHandler, LogHandler};
use crate::outcome::{BoxError, Outcome};

/// A function wrapped by an [`AllowFail`] guard.
///
/// Every call returns an [`Outcome`]; failures are reported and never
/// propagate. The wrapper keeps a name for its function, used when the
/// error handler itself fails.
///
/// # Example
///
/// ```
/// use allowfail::AllowFail;
///
/// let parse = AllowFail::new("parse {}")
///     .param("port")
///     .wrap(|s: &str| s.parse::<u16>())
///     .named("parse_port");
///
/// assert_eq!(parse.name(), "parse_port");
/// assert_eq!(parse.call("8080").ok(), Some(8080));
/// assert!(parse.call("http").is_failed());
/// ```
pub struct Protected<F, H = LogHandler> {
    guard: AllowFail<H>,
    func: F,
    name: Cow<'static, str>,
}

impl<F, H> Protected<F, H> {
    pub(crate) fn new(guard: AllowFail<H>, func: F) -> Self {
        Self {
            guard,
            func,
            name: Cow::Borrowed(type_name::<F>()),
        }
    }

    /// Sets the name reported for this function.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// The function's name; defaults to its type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The guard applied to every call.
    #[must_use]
    pub fn guard(&self) -> &AllowFail<H> {
        &self.guard
    }

    /// Borrows the wrapped function.
    #[must_use]
    pub fn inner(&self) -> &F {
        &self.func
    }

    /// Unwraps the original function.
    pub fn into_inner(self) -> F {
        self.func
    }
}

impl<F, H: ErrorHandler> Protected<F, H> {
    /// Calls a zero-argument function.
    pub fn run<T, E>(&self) -> Outcome<T>
    where
        F: Fn() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.guard.call_named(&self.name, || (self.func)())
    }

    /// Calls the function with `args`. Use a tuple for several arguments.
    pub fn call<A, T, E>(&self, args: A) -> Outcome<T>
    where
        F: Fn(A) -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.guard.call_named(&self.name, || (self.func)(args))
    }

    /// Converts into a plain closure returning [`Outcome`].
    pub fn into_fn<A, T, E>(self) -> impl Fn(A) -> Outcome<T>
    where
        F: Fn(A) -> Result<T, E>,
        E: Into<BoxError>,
    {
        move |args| self.call(args)
    }
}

impl<F, H> fmt::Debug for Protected<F, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Protected")
            .field("name", &self.name)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
