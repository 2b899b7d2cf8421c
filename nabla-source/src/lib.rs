//! Per-file compilation context: source text, tokens and diagnostics.

pub mod console;
pub mod diagnostic;
pub mod token;

pub use console::{render_diagnostic, Console};
pub use diagnostic::{Diagnostic, FatalError};
pub use token::{tokenize, Token, TokenKind};

/// One source file. Owns the text; tokens, tree nodes and diagnostics all
/// borrow from it, so the borrow checker scopes them to the compilation.
pub struct Source {
    pub filename: String,
    pub content: String,
}

impl Source {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Scans the content into the complete token sequence, whitespace and
    /// comments included.
    pub fn tokenize(&self) -> Vec<Token<'_>> {
        token::tokenize(&self.content)
    }
}

impl From<&str> for Source {
    fn from(content: &str) -> Self {
        Source::new("<source>", content)
    }
}
