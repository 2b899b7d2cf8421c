use nabla_source::{Token, TokenKind};

use crate::ast::{Decl, Expr, Node, TypeInstance};

use super::{ParseResult, Parser};

impl<'t, 'a> Parser<'t, 'a> {
    pub(crate) fn parse_let_stmt(&mut self, let_token: Token<'a>) -> ParseResult<'a, Node<'a>> {
        if self.eof() {
            return self.fatal("missing variable name", let_token);
        }

        let name = self.current();
        if name.kind != TokenKind::Identifier {
            return self.fatal("expected this to be a variable name", name);
        }
        self.next();

        if self.eof() {
            return self.fatal("expected '=' here", name);
        }
        let equals = self.current();
        if !equals.is("=") {
            return self.fatal("expected '=' here", equals);
        }
        self.next();

        let value = self.parse_expr()?;

        self.terminate_stmt()?;

        Ok(Node::Decl(Decl {
            name,
            value: Some(Box::new(value)),
            immutable: true,
            ty: None,
        }))
    }

    pub(crate) fn parse_fn_def(&mut self, fn_token: Token<'a>) -> ParseResult<'a, Node<'a>> {
        if self.eof() {
            return self.fatal("expected function name after this", fn_token);
        }

        let name = self.current();
        if name.kind != TokenKind::Identifier {
            return self.fatal("expected this to be a function name", name);
        }
        self.next();

        let params = self.parse_param_list(name)?;
        let body = self.parse_fn_body(name)?;

        Ok(Node::Func { name, params, body })
    }

    fn parse_fn_body(&mut self, name: Token<'a>) -> ParseResult<'a, Vec<Node<'a>>> {
        if self.eof() {
            return self.fatal("missing function body", name);
        }

        let l_bracket = self.current();
        if !l_bracket.is("{") {
            return self.fatal("expected '{' here", l_bracket);
        }
        self.next();

        let mut body = Vec::new();
        while !self.eof() {
            if self.current().is("}") {
                break;
            }
            body.push(self.parse()?);
        }

        if self.eof() {
            return self.fatal("missing '}'", l_bracket);
        }

        let r_bracket = self.current();
        if !r_bracket.is("}") {
            return self.fatal("expected '}' here", r_bracket);
        }
        self.next();

        Ok(body)
    }

    fn parse_param_list(&mut self, anchor: Token<'a>) -> ParseResult<'a, Vec<Decl<'a>>> {
        if self.eof() {
            return self.fatal("expected parameter list after this", anchor);
        }

        let l_paren = self.current();
        if !l_paren.is("(") {
            return self.fatal("expected a '(' here", l_paren);
        }
        self.next();

        let mut params = Vec::new();

        while !self.eof() {
            if self.current().is(")") {
                break;
            }

            match self.parse_param_decl()? {
                Some(param) => params.push(param),
                None => break,
            }

            if self.eof() || self.current().is(")") {
                break;
            }

            let comma = self.current();
            if !comma.is(",") {
                return self.fatal("expected either a ',' or ')' here", comma);
            }
            self.next();
        }

        if self.eof() || !self.current().is(")") {
            return self.fatal("missing ')'", l_paren);
        }
        self.next();

        Ok(params)
    }

    fn parse_param_decl(&mut self) -> ParseResult<'a, Option<Decl<'a>>> {
        let name = self.current();
        if name.kind != TokenKind::Identifier {
            return Ok(None);
        }
        self.next();

        if self.eof() || !self.current().is(":") {
            // an untyped parameter
            return Ok(Some(Decl {
                name,
                value: None,
                immutable: true,
                ty: None,
            }));
        }
        let colon = self.current();
        self.next();

        let ty = match self.parse_type()? {
            Some(ty) => ty,
            None => return self.fatal("expected type after this", colon),
        };

        let mut value = None;
        if !self.eof() && self.current().is("=") {
            self.next();
            value = Some(Box::new(self.parse_expr()?));
        }

        Ok(Some(Decl {
            name,
            value,
            immutable: true,
            ty: Some(ty),
        }))
    }

    fn parse_type(&mut self) -> ParseResult<'a, Option<TypeInstance<'a>>> {
        if self.eof() {
            return Ok(None);
        }

        let name = self.current();
        if name.kind != TokenKind::Identifier {
            return self.fatal("expected a type name here", name);
        }
        self.next();

        let mut args = Vec::new();

        if !self.eof() && self.current().is("<") {
            let l_bracket = self.current();
            self.next();

            while !self.eof() {
                if self.current().is(">") {
                    break;
                }

                args.push(self.parse_expr()?);

                if self.eof() || self.current().is(">") {
                    break;
                }
                let comma = self.current();
                if !comma.is(",") {
                    return self.fatal("expected either ',' or '>' here", comma);
                }
                self.next();
            }

            if self.eof() {
                return self.fatal("missing '>'", l_bracket);
            }
            let r_bracket = self.current();
            if !r_bracket.is(">") {
                return self.fatal("expected '>' here", r_bracket);
            }
            self.next();
        }

        Ok(Some(TypeInstance { name, args }))
    }

    pub(crate) fn parse_struct_decl(&mut self, struct_token: Token<'a>) -> ParseResult<'a, Node<'a>> {
        if self.eof() {
            return self.fatal("expected name after this", struct_token);
        }

        let name = self.current();
        if name.kind != TokenKind::Identifier {
            return self.fatal("expected this to be a struct name", name);
        }
        self.next();

        if self.eof() {
            return self.fatal("expected struct body after this", name);
        }

        let l_bracket = self.current();
        if !l_bracket.is("{") {
            return self.fatal("expected '{' here", l_bracket);
        }
        self.next();

        let mut fields = Vec::new();

        while !self.eof() {
            if self.current().is("}") {
                break;
            }

            let field_name = self.current();
            if field_name.kind != TokenKind::Identifier {
                return self.fatal("expected field name or '}' here", field_name);
            }
            self.next();

            if self.eof() || !self.current().is(":") {
                return self.fatal("expected ':' after field name", field_name);
            }
            let colon = self.current();
            self.next();

            let ty = match self.parse_type()? {
                Some(ty) => ty,
                None => return self.fatal("expected type after this", colon),
            };

            fields.push(Decl {
                name: field_name,
                value: None,
                immutable: false,
                ty: Some(ty),
            });

            if self.eof() || self.current().is("}") {
                break;
            }
            let comma = self.current();
            if !comma.is(",") {
                return self.fatal("expected either ',' or '}' here", comma);
            }
            self.next();
        }

        if self.eof() {
            return self.fatal("missing '}'", l_bracket);
        }

        let r_bracket = self.current();
        if !r_bracket.is("}") {
            return self.fatal("expected '}' here", r_bracket);
        }
        self.next();

        Ok(Node::Struct { name, fields })
    }

    pub(crate) fn parse_return_stmt(&mut self, return_token: Token<'a>) -> ParseResult<'a, Node<'a>> {
        let value = self.parse_expr()?;
        self.terminate_stmt()?;
        Ok(Node::Return {
            keyword: return_token,
            value,
        })
    }

    pub(crate) fn parse_print_stmt(&mut self, print_token: Token<'a>) -> ParseResult<'a, Node<'a>> {
        let args = self.parse_arg_list(print_token)?;
        self.terminate_stmt()?;
        Ok(Node::Print(args))
    }

    fn parse_arg_list(&mut self, func_name: Token<'a>) -> ParseResult<'a, Vec<Expr<'a>>> {
        if self.eof() {
            return self.fatal("missing argument list", func_name);
        }

        let l_paren = self.current();
        if !l_paren.is("(") {
            return self.fatal("expected the start of an argument list here", l_paren);
        }
        self.next();

        let mut args = Vec::new();

        while !self.eof() && !self.current().is(")") {
            args.push(self.parse_expr()?);

            if self.eof() || self.current().is(")") {
                break;
            }

            let comma = self.current();
            if !comma.is(",") {
                return self.fatal("expected a ',' or ')' here", comma);
            }
            self.next();
        }

        if self.eof() || !self.current().is(")") {
            return self.fatal("missing ')'", l_paren);
        }
        self.next();

        Ok(args)
    }
}
