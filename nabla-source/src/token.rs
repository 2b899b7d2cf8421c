use logos::Logos;

/// Lexical class of a token. Whitespace and comments are produced rather
/// than skipped; the driver filters them before parsing so that their
/// incomplete forms can be reported first.
#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n\f]+")]
    Space,

    // single line comments and terminated block comments
    #[regex(r"//[^\n]*")]
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    Comment,
    /// A `/*` with no matching `*/` before the end of input.
    #[token("/*")]
    IncompleteComment,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // Escape sequences are not interpreted here; they stay in the token
    // text until lowering.
    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    StringLiteral,
    /// A quote with no matching closing quote before the end of input.
    #[token("\"")]
    #[token("'")]
    IncompleteStringLiteral,

    #[regex(r"[0-9]+")]
    IntLiteral,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    FloatLiteral,

    /// Any other single character. Keywords are not token kinds; the
    /// parser compares identifier text.
    #[regex(r".", priority = 0)]
    Symbol,

    #[error]
    Error,
}

/// A single scanned token. `text` borrows the source buffer, so a token
/// (and anything holding one, tree nodes and diagnostics included) cannot
/// outlive the compilation's `Source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 1-based source line.
    pub line: usize,
    /// 1-based source column, counted in bytes.
    pub column: usize,
}

impl<'a> Token<'a> {
    /// Compares the token text. Used for keywords and punctuation alike.
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

/// Scans `source` into the complete token sequence, including whitespace
/// and comment tokens. The sequence is contiguous: every byte of the
/// source belongs to exactly one token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;

    while let Some(kind) = lexer.next() {
        let text = lexer.slice();
        tokens.push(Token {
            kind,
            text,
            line,
            column,
        });
        for byte in text.bytes() {
            if byte == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|tok| tok.kind).collect()
    }

    #[test]
    fn test_literals() {
        use TokenKind::*;
        assert_eq!(kinds("1"), vec![IntLiteral]);
        assert_eq!(kinds("123"), vec![IntLiteral]);
        assert_eq!(kinds("1.5"), vec![FloatLiteral]);
        assert_eq!(kinds("1."), vec![FloatLiteral]);
        assert_eq!(kinds(".5"), vec![FloatLiteral]);
        assert_eq!(kinds("1e5"), vec![FloatLiteral]);
        assert_eq!(kinds("1.5e-3"), vec![FloatLiteral]);
        assert_eq!(kinds(r#""hello""#), vec![StringLiteral]);
        assert_eq!(kinds("'hello'"), vec![StringLiteral]);
    }

    #[test]
    fn test_incomplete_tokens() {
        use TokenKind::*;
        assert_eq!(kinds(r#""ab"#)[0], IncompleteStringLiteral);
        assert_eq!(kinds("/* ab")[0], IncompleteComment);
    }

    #[test]
    fn test_comments_and_space() {
        use TokenKind::*;
        assert_eq!(kinds("// hi"), vec![Comment]);
        assert_eq!(kinds("/* hi */"), vec![Comment]);
        assert_eq!(kinds("/* a\nb */"), vec![Comment]);
        assert_eq!(kinds(" \t\n"), vec![Space]);
    }

    #[test]
    fn test_statement() {
        use TokenKind::*;
        assert_eq!(
            kinds("let x = 1;"),
            vec![
                Identifier, Space, Identifier, Space, Symbol, Space, IntLiteral, Symbol
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("let x;\n  y");
        let x = &tokens[2];
        assert_eq!((x.text, x.line, x.column), ("x", 1, 5));
        let y = &tokens[5];
        assert_eq!((y.text, y.line, y.column), ("y", 2, 3));
    }

    #[test]
    fn test_contiguous() {
        let source = "print(1 + 2); // done";
        let total: usize = tokenize(source).iter().map(|tok| tok.text.len()).sum();
        assert_eq!(total, source.len());
    }
}
