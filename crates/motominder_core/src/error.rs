//! Non-exception error aggregate.
//!
//! # Responsibility
//! - Collect human-readable failure messages in insertion order.
//! - Combine aggregates from independent checks without short-circuiting.
//!
//! # Invariants
//! - An aggregate with zero messages means "no error"; callers convert it
//!   with [`Error::into_result`] before returning.
//! - Merging never drops messages from either side.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops;

/// Ordered, mergeable collection of failure messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Error {
    messages: Vec<String>,
}

impl Error {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregate holding one message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// Creates an aggregate holding every given message.
    pub fn from_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut error = Self::new();
        error.add_range(messages);
        error
    }

    /// Appends one message.
    pub fn add(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Appends every message, preserving order.
    pub fn add_range<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Null-safe merge. Both sides absent yields an empty, present aggregate.
    pub fn merge(left: Option<Error>, right: Option<Error>) -> Error {
        let mut merged = left.unwrap_or_default();
        if let Some(right) = right {
            merged.messages.extend(right.messages);
        }
        merged
    }

    /// Maps an empty aggregate to success and a non-empty one to failure.
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Folds the failure side of a validation result into this aggregate.
    pub fn absorb(&mut self, result: Result<(), Error>) {
        if let Err(error) = result {
            self.messages.extend(error.messages);
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

impl std::error::Error for Error {}

impl ops::Add for Error {
    type Output = Error;

    fn add(self, rhs: Error) -> Self::Output {
        Error::merge(Some(self), Some(rhs))
    }
}

impl ops::Add<Option<Error>> for Error {
    type Output = Error;

    fn add(self, rhs: Option<Error>) -> Self::Output {
        Error::merge(Some(self), rhs)
    }
}

impl ops::AddAssign for Error {
    fn add_assign(&mut self, rhs: Error) {
        self.messages.extend(rhs.messages);
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::from_message(value)
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::from_message(value)
    }
}
