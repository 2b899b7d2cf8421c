use nabla_source::{FatalError, Token};

use crate::ast::{Node, SyntaxTree};

mod expr;
mod stmt;

pub type ParseResult<'a, T> = Result<T, FatalError<'a>>;

/// A recursive-descent parser over an immutable token slice. The caller
/// must filter whitespace and comment tokens, and must report incomplete
/// tokens (unterminated strings or block comments) before parsing.
///
/// `'t` is the borrow of the token buffer, `'a` the borrow of the source
/// text the tokens point into.
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    offset: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, offset: 0 }
    }

    /// Whether all input has been consumed.
    pub fn eof(&self) -> bool {
        self.offset >= self.tokens.len()
    }

    /// Parses the next top-level node. Must not be called at end of
    /// input. Any deviation from the grammar is a fatal error carrying
    /// the offending token; there is no recovery.
    pub fn parse(&mut self) -> ParseResult<'a, Node<'a>> {
        let first = self.current();
        if first.is("let") {
            self.next();
            self.parse_let_stmt(first)
        } else if first.is("fn") {
            self.next();
            self.parse_fn_def(first)
        } else if first.is("struct") {
            self.next();
            self.parse_struct_decl(first)
        } else if first.is("return") {
            self.next();
            self.parse_return_stmt(first)
        } else if first.is("print") {
            self.next();
            self.parse_print_stmt(first)
        } else {
            self.fatal("unexpected token", first)
        }
    }

    /// Parses every remaining top-level node into a tree.
    pub fn parse_tree(&mut self) -> ParseResult<'a, SyntaxTree<'a>> {
        let mut nodes = Vec::new();
        while !self.eof() {
            nodes.push(self.parse()?);
        }
        Ok(SyntaxTree { nodes })
    }
}

/// Parse utilities
impl<'t, 'a> Parser<'t, 'a> {
    fn current(&self) -> Token<'a> {
        self.tokens[self.offset]
    }

    fn at(&self, offset: usize) -> Option<Token<'a>> {
        self.tokens.get(self.offset + offset).copied()
    }

    fn last(&self) -> Token<'a> {
        self.tokens[self.tokens.len() - 1]
    }

    fn next(&mut self) {
        self.offset += 1;
    }

    fn fatal<T>(&self, what: &str, token: Token<'a>) -> ParseResult<'a, T> {
        Err(FatalError::new(what, token))
    }

    /// Consumes the statement terminator. The terminator is optional only
    /// at the end of the file.
    fn terminate_stmt(&mut self) -> ParseResult<'a, ()> {
        if self.eof() {
            return Ok(());
        }

        let token = self.current();
        if !token.is(";") {
            return self.fatal("expected ';' here", token);
        }

        self.next();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use nabla_source::{tokenize, TokenKind};
    use pretty_assertions::assert_eq;

    fn significant(source: &str) -> Vec<Token<'_>> {
        tokenize(source)
            .into_iter()
            .filter(|tok| tok.kind != TokenKind::Space && tok.kind != TokenKind::Comment)
            .collect()
    }

    fn tree(source: &'static str) -> SyntaxTree<'static> {
        let tokens = significant(source);
        Parser::new(&tokens).parse_tree().expect("parse error")
    }

    fn parse_error(source: &'static str) -> FatalError<'static> {
        let tokens = significant(source);
        match Parser::new(&tokens).parse_tree() {
            Ok(tree) => panic!("expected a parse error, got {:?}", tree),
            Err(err) => err,
        }
    }

    #[test]
    fn test_determinism() {
        let source = "let x = 1 + 2 * 3; print(x, 4.5); fn f(a: int) { return a; }";
        assert_eq!(tree(source), tree(source));
    }

    #[test]
    fn test_unexpected_token() {
        let err = parse_error("42;");
        assert_eq!(err.diagnostic().what, "unexpected token");
        assert!(err.diagnostic().token.unwrap().is("42"));
    }

    #[test]
    fn test_terminator_optional_at_eof() {
        let tree = tree("print(1)");
        assert_eq!(tree.nodes.len(), 1);
    }

    #[test]
    fn test_missing_terminator() {
        let err = parse_error("let x = 1 let y = 2;");
        assert_eq!(err.diagnostic().what, "expected ';' here");
        assert!(err.diagnostic().token.unwrap().is("let"));
    }

    #[test]
    fn test_missing_right_operand() {
        let err = parse_error("let x = 1 +");
        assert_eq!(err.diagnostic().what, "missing right operand");
        let token = err.diagnostic().token.unwrap();
        assert!(token.is("+"));
        assert_eq!(token.column, 11);
    }

    #[test]
    fn test_missing_operand_expression() {
        let err = parse_error("let x = 1 + ;");
        assert_eq!(err.diagnostic().what, "expected an expression here");
        assert!(err.diagnostic().token.unwrap().is(";"));
    }

    #[test]
    fn test_let_missing_name() {
        let err = parse_error("let = 1;");
        assert_eq!(err.diagnostic().what, "expected this to be a variable name");
        assert!(err.diagnostic().token.unwrap().is("="));

        let err = parse_error("let");
        assert_eq!(err.diagnostic().what, "missing variable name");
        assert!(err.diagnostic().token.unwrap().is("let"));
    }

    #[test]
    fn test_comments_are_filtered() {
        let tree = tree("let x = 1; // trailing\n/* block */ print(x);");
        assert_eq!(tree.nodes.len(), 2);
        assert!(matches!(&tree.nodes[1], Node::Print(args) if args.len() == 1));
    }

    #[test]
    fn test_tree_shape() {
        let tree = tree("let x = 1; print(x);");
        assert_eq!(tree.nodes.len(), 2);
        match &tree.nodes[0] {
            Node::Decl(decl) => {
                assert!(decl.name.is("x"));
                assert!(decl.immutable);
                assert!(matches!(
                    decl.value.as_deref(),
                    Some(Expr::IntLiteral(tok)) if tok.is("1")
                ));
            }
            other => panic!("expected decl, got {:?}", other),
        }
    }
}
