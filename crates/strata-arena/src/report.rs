//! Failure reporting for the convenience entry points.
//!
//! Every arena owns a [`Reporter`]. When an allocation made through a
//! non-`try_` method cannot be satisfied, the reporter writes a diagnostic
//! naming the call site and cause to stderr, runs the registered failure
//! hook (if any), and then aborts or panics per [`FailureStrategy`].

use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::panic::Location;

use crate::config::FailureStrategy;

/// Callback run once, immediately before termination.
pub type FailureHook = Box<dyn FnMut() + Send + 'static>;

/// Reports fatal arena failures and terminates.
pub struct Reporter {
    strategy: FailureStrategy,
    backtrace: bool,
    hook: Option<FailureHook>,
}

impl Reporter {
    /// Create a reporter with no hook registered.
    pub fn new(strategy: FailureStrategy, backtrace: bool) -> Self {
        Self {
            strategy,
            backtrace,
            hook: None,
        }
    }

    /// The termination strategy.
    pub fn strategy(&self) -> FailureStrategy {
        self.strategy
    }

    /// Register `hook`, returning the previously registered one.
    pub fn set_hook(&mut self, hook: FailureHook) -> Option<FailureHook> {
        self.hook.replace(hook)
    }

    /// Remove and return the registered hook.
    pub fn take_hook(&mut self) -> Option<FailureHook> {
        self.hook.take()
    }

    /// Write the diagnostic, run the hook, and terminate.
    pub fn terminate(
        &mut self,
        location: &Location<'_>,
        error: Option<&dyn Error>,
        cause: impl fmt::Display,
    ) -> ! {
        let cause = cause.to_string();
        let diagnostic = self.diagnostic(location, error, &cause);
        eprint!("{diagnostic}");
        tracing::error!(
            file = location.file(),
            line = location.line(),
            error = error.map(tracing::field::display),
            cause = %cause,
            "arena failure, terminating"
        );

        if let Some(hook) = self.hook.as_mut() {
            hook();
        }

        match self.strategy {
            FailureStrategy::Abort => std::process::abort(),
            FailureStrategy::Panic => panic!("{location}: {cause}"),
        }
    }

    /// Render the diagnostic text written by [`Reporter::terminate`].
    pub fn diagnostic(
        &self,
        location: &Location<'_>,
        error: Option<&dyn Error>,
        cause: &str,
    ) -> String {
        let mut out = String::from("\n");
        if self.backtrace {
            out.push_str(&format!("{}\n", Backtrace::force_capture()));
        }
        out.push_str(&format!("   At: '{}:{}'\n", location.file(), location.line()));
        if let Some(error) = error {
            out.push_str(&format!("Error: {error}\n"));
        }
        out.push_str(&format!("Cause: {cause}\n"));
        out
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(FailureStrategy::default(), false)
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("strategy", &self.strategy)
            .field("backtrace", &self.backtrace)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// Unwrap a present/ok value or terminate through a [`Reporter`].
///
/// The call site recorded in the diagnostic is the caller of
/// `or_terminate`.
pub trait Fatal<T> {
    /// Return the value, or report `cause` and terminate.
    fn or_terminate(self, reporter: &mut Reporter, cause: &str) -> T;
}

impl<T> Fatal<T> for Option<T> {
    #[track_caller]
    fn or_terminate(self, reporter: &mut Reporter, cause: &str) -> T {
        match self {
            Some(value) => value,
            None => reporter.terminate(Location::caller(), None, cause),
        }
    }
}

impl<T, E: Error> Fatal<T> for Result<T, E> {
    #[track_caller]
    fn or_terminate(self, reporter: &mut Reporter, cause: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                let err: &dyn Error = &err;
                reporter.terminate(Location::caller(), Some(err), cause)
            }
        }
    }
}
