//! Rendering of diagnostics with a caret under the offending token.

use std::io::{self, Write};

use crate::diagnostic::Diagnostic;
use crate::Source;

/// Writes rendered diagnostics to an output sink. The sink is generic so
/// tests can capture into a `Vec<u8>`.
pub struct Console<W> {
    program_name: String,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            program_name: "nabla".to_string(),
            out,
        }
    }

    /// Sets the name echoed in program-level errors, normally `argv[0]`.
    pub fn set_program_name(&mut self, arg0: impl Into<String>) {
        self.program_name = arg0.into();
    }

    pub fn print_error(&mut self, what: &str) -> io::Result<()> {
        writeln!(self.out, "{}: error: {}", self.program_name, what)
    }

    pub fn print_diagnostic(&mut self, source: &Source, diagnostic: &Diagnostic) -> io::Result<()> {
        let rendered = render_diagnostic(&source.filename, diagnostic, &source.content);
        self.out.write_all(rendered.as_bytes())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renders one diagnostic:
///
/// ```text
///  <line> | <line text>
///         |    ^~~~~~~~
///         |           `<what>
/// ```
///
/// The caret sits under the first character of the token and tildes span
/// the remainder of its text. Diagnostics without a token render as
/// `<filename>: error: <what>`.
pub fn render_diagnostic(filename: &str, diagnostic: &Diagnostic, source: &str) -> String {
    let token = match diagnostic.token {
        Some(token) => token,
        None => return format!("{}: error: {}\n", filename, diagnostic.what),
    };

    let gutter = " ".repeat(format!(" {}", token.line).len());
    let margin = " ".repeat(token.column.saturating_sub(1));
    let tildes = "~".repeat(token.text.len().saturating_sub(1));
    let skip = " ".repeat(token.text.len());

    let mut out = String::new();
    out.push_str(&format!(
        " {} | {}\n",
        token.line,
        source_line(source, token.line)
    ));
    out.push_str(&format!("{} | {}^{}\n", gutter, margin, tildes));
    out.push_str(&format!(
        "{} | {}{}`{}\n",
        gutter, margin, skip, diagnostic.what
    ));
    out
}

fn source_line(source: &str, line: usize) -> &str {
    source.split('\n').nth(line.saturating_sub(1)).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    #[test]
    fn test_render_with_token() {
        let source = "let x = 1 +;";
        let tokens = tokenize(source);
        // the `+` token
        let plus = tokens[tokens.len() - 2];
        assert_eq!(plus.text, "+");

        let diagnostic = Diagnostic::new("missing right operand", plus);
        let rendered = render_diagnostic("test.nabla", &diagnostic, source);
        assert_eq!(
            rendered,
            concat!(
                " 1 | let x = 1 +;\n",
                "   |           ^\n",
                "   |            `missing right operand\n",
            )
        );
    }

    #[test]
    fn test_render_multichar_token() {
        let source = "print hello;";
        let tokens = tokenize(source);
        let ident = tokens[2];
        assert_eq!(ident.text, "hello");

        let diagnostic = Diagnostic::new("unexpected token", ident);
        let rendered = render_diagnostic("test.nabla", &diagnostic, source);
        assert_eq!(
            rendered,
            concat!(
                " 1 | print hello;\n",
                "   |       ^~~~~\n",
                "   |            `unexpected token\n",
            )
        );
    }

    #[test]
    fn test_render_without_token() {
        let diagnostic = Diagnostic::message("unable to open file");
        let rendered = render_diagnostic("test.nabla", &diagnostic, "");
        assert_eq!(rendered, "test.nabla: error: unable to open file\n");
    }
}
