use nabla_source::{Token, TokenKind};

use crate::ast::Expr;

use super::{ParseResult, Parser};

impl<'t, 'a> Parser<'t, 'a> {
    /* Expressions */
    /// Parses any expression. Binary operators are left-associative;
    /// `+`/`-` bind looser than `*`/`/`.
    pub fn parse_expr(&mut self) -> ParseResult<'a, Expr<'a>> {
        self.parse_add_sub_expr()
    }

    fn parse_add_sub_expr(&mut self) -> ParseResult<'a, Expr<'a>> {
        let mut lhs = self.parse_mul_div_expr()?;
        while !self.eof() && (self.current().is("+") || self.current().is("-")) {
            let op = self.current();
            self.next();
            if self.eof() {
                return self.fatal("missing right operand", op);
            }
            let rhs = self.parse_mul_div_expr()?;
            lhs = Expr::Add {
                left: Box::new(lhs),
                right: Box::new(rhs),
                op,
            };
        }
        Ok(lhs)
    }

    fn parse_mul_div_expr(&mut self) -> ParseResult<'a, Expr<'a>> {
        let mut lhs = self.parse_primary_expr()?;
        while !self.eof() && (self.current().is("*") || self.current().is("/")) {
            let op = self.current();
            self.next();
            if self.eof() {
                return self.fatal("missing right operand", op);
            }
            let rhs = self.parse_primary_expr()?;
            lhs = Expr::Mul {
                left: Box::new(lhs),
                right: Box::new(rhs),
                op,
            };
        }
        Ok(lhs)
    }

    /// Parses a primary (atom) expression: a literal, a variable
    /// reference or a call.
    fn parse_primary_expr(&mut self) -> ParseResult<'a, Expr<'a>> {
        let first = match self.at(0) {
            Some(token) => token,
            None => return self.fatal("expected an expression here", self.last()),
        };

        match first.kind {
            TokenKind::StringLiteral => {
                self.next();
                Ok(Expr::StringLiteral(first))
            }
            TokenKind::IntLiteral => {
                self.next();
                Ok(Expr::IntLiteral(first))
            }
            TokenKind::FloatLiteral => {
                self.next();
                Ok(Expr::FloatLiteral(first))
            }
            TokenKind::Identifier => {
                self.next();
                if !self.eof() && self.current().is("(") {
                    let l_paren = self.current();
                    self.next();
                    return self.parse_call_expr(first, l_paren);
                }
                Ok(Expr::Var(first))
            }
            _ => self.fatal("expected an expression here", first),
        }
    }

    fn parse_call_expr(&mut self, name: Token<'a>, l_paren: Token<'a>) -> ParseResult<'a, Expr<'a>> {
        let mut args = Vec::new();

        while !self.eof() {
            if self.current().is(")") {
                break;
            }

            let value = self.parse_expr()?;
            args.push((None, value));

            if self.eof() {
                break;
            }
            if !self.current().is(",") {
                break;
            }
            self.next();
        }

        if self.eof() {
            return self.fatal("missing ')'", l_paren);
        }

        let r_paren = self.current();
        if !r_paren.is(")") {
            return self.fatal("expected ')' here", r_paren);
        }
        self.next();

        Ok(Expr::Call { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nabla_source::tokenize;

    fn significant(source: &str) -> Vec<Token<'_>> {
        tokenize(source)
            .into_iter()
            .filter(|tok| tok.kind != TokenKind::Space && tok.kind != TokenKind::Comment)
            .collect()
    }

    fn expr(source: &'static str) -> Expr<'static> {
        let tokens = significant(source);
        let mut parser = Parser::new(&tokens);
        let expr = parser.parse_expr().expect("parse error");
        assert!(parser.eof(), "trailing input after expression");
        expr
    }

    #[test]
    fn test_literal() {
        assert!(matches!(expr("1"), Expr::IntLiteral(tok) if tok.is("1")));
        assert!(matches!(expr("2.5"), Expr::FloatLiteral(tok) if tok.is("2.5")));
        assert!(matches!(expr(r#""hi""#), Expr::StringLiteral(tok) if tok.is(r#""hi""#)));
    }

    #[test]
    fn test_identifier() {
        assert!(matches!(expr("foo"), Expr::Var(tok) if tok.is("foo")));
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        match expr("1 + 2 * 3") {
            Expr::Add { left, right, op } => {
                assert!(op.is("+"));
                assert!(matches!(*left, Expr::IntLiteral(tok) if tok.is("1")));
                match *right {
                    Expr::Mul { left, right, op } => {
                        assert!(op.is("*"));
                        assert!(matches!(*left, Expr::IntLiteral(tok) if tok.is("2")));
                        assert!(matches!(*right, Expr::IntLiteral(tok) if tok.is("3")));
                    }
                    other => panic!("expected mul, got {:?}", other),
                }
            }
            other => panic!("expected add, got {:?}", other),
        }

        // 2 * 3 + 4 parses as (2 * 3) + 4
        match expr("2 * 3 + 4") {
            Expr::Add { left, right, op } => {
                assert!(op.is("+"));
                assert!(matches!(*left, Expr::Mul { .. }));
                assert!(matches!(*right, Expr::IntLiteral(tok) if tok.is("4")));
            }
            other => panic!("expected add, got {:?}", other),
        }
    }

    #[test]
    fn test_associativity() {
        // 1 - 2 + 3 parses as (1 - 2) + 3
        match expr("1 - 2 + 3") {
            Expr::Add { left, op, .. } => {
                assert!(op.is("+"));
                assert!(matches!(*left, Expr::Add { op, .. } if op.is("-")));
            }
            other => panic!("expected add, got {:?}", other),
        }

        // 8 / 2 / 2 parses as (8 / 2) / 2
        match expr("8 / 2 / 2") {
            Expr::Mul { left, op, .. } => {
                assert!(op.is("/"));
                assert!(matches!(*left, Expr::Mul { op, .. } if op.is("/")));
            }
            other => panic!("expected mul, got {:?}", other),
        }
    }

    #[test]
    fn test_call() {
        match expr("foo(1, bar, baz())") {
            Expr::Call { name, args } => {
                assert!(name.is("foo"));
                assert_eq!(args.len(), 3);
                assert!(args.iter().all(|(name, _)| name.is_none()));
                assert!(matches!(&args[2].1, Expr::Call { args, .. } if args.is_empty()));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_call_missing_paren() {
        let tokens = significant("foo(1");
        let err = Parser::new(&tokens).parse_expr().unwrap_err();
        assert_eq!(err.diagnostic().what, "missing ')'");
        assert!(err.diagnostic().token.unwrap().is("("));
    }
}
