use std::fmt;

use thiserror::Error;

use crate::token::Token;

/// A single compiler message. The message text is owned; the token (when
/// present) anchors the message to a source position and borrows the
/// source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic<'a> {
    pub what: String,
    pub token: Option<Token<'a>>,
}

impl<'a> Diagnostic<'a> {
    pub fn new(what: impl Into<String>, token: Token<'a>) -> Self {
        Self {
            what: what.into(),
            token: Some(token),
        }
    }

    /// A diagnostic with no source anchor.
    pub fn message(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            token: None,
        }
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{}:{}: {}", token.line, token.column, self.what),
            None => write!(f, "{}", self.what),
        }
    }
}

/// An error that aborts the pipeline for the current file. Raised by the
/// parser on the first malformed construct and by lowering on malformed
/// literals; propagated with `?` up to the per-file driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FatalError<'a>(pub Diagnostic<'a>);

impl<'a> FatalError<'a> {
    pub fn new(what: impl Into<String>, token: Token<'a>) -> Self {
        Self(Diagnostic::new(what, token))
    }

    pub fn diagnostic(&self) -> &Diagnostic<'a> {
        &self.0
    }

    pub fn into_diagnostic(self) -> Diagnostic<'a> {
        self.0
    }
}
