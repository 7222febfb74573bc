use std::{fmt::Display, panic::Location};

use anyhow::{Context, Result};

pub mod prelude {
    extern crate anyhow;
    pub use anyhow::{anyhow, bail, Context, Result};

    extern crate thiserror;
    pub use thiserror::Error;

    pub use super::{LocatedError, LocatedOption};
}

fn fmt_caller(caller: &Location) -> String {
    format!("[{}:{}:{}]", caller.file(), caller.line(), caller.column())
}

/// Attach context to an error, prefixed with the file, line and column of the
/// call site. Anyhow's `.context()`, except the resulting chain keeps track of
/// where each layer was added.
pub trait LocatedError<T> {
    /// Wrap the error value with additional context + the location at which it was called.
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static;

    /// Wrap the error value with lazily-evaluated additional context + the
    /// location at which it was called.
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> LocatedError<T> for Result<T, E>
where
    E: Display + Send + Sync + 'static,
    Result<T, E>: Context<T, E>,
{
    #[track_caller]
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static
    {
        match self {
            Ok(ok)  => Ok(ok),
            Err(_)  => {
                let loc = fmt_caller(Location::caller());
                self.context(format!("{loc} {context}"))
            }
        }
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        match self {
            Ok(ok)  => Ok(ok),
            Err(_)  => {
                let loc = fmt_caller(Location::caller());
                self.with_context(|| format!("{loc} {}", f()))
            }
        }
    }
}

/// `LocatedError`, for `Option<T>`.
pub trait LocatedOption<T> {
    /// Convert a `None` into an error carrying the provided context + the
    /// location at which it was called.
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static;

    /// Convert a `None` into an error carrying lazily-evaluated context + the
    /// location at which it was called.
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> LocatedOption<T> for Option<T> {
    #[track_caller]
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static
    {
        match self {
            Some(ok) => Ok(ok),
            None     => {
                let loc = fmt_caller(Location::caller());
                self.context(format!("{loc} {context}"))
            }
        }
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        match self {
            Some(ok) => Ok(ok),
            None     => {
                let loc = fmt_caller(Location::caller());
                self.with_context(|| format!("{loc} {}", f()))
            }
        }
    }
}
