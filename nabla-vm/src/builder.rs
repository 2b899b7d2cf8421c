//! Lowers the annotated syntax tree into an IR [`Module`].

use std::collections::HashMap;

use nabla_ir::{Module, Stmt, Ty, Value};
use nabla_parser::ast::{Decl, Expr, Node, SyntaxTree};
use nabla_passes::{AddOp, AnnotationTable, MulOp};
use nabla_source::{FatalError, Token};

pub type BuildResult<'a, T> = Result<T, FatalError<'a>>;

/// Builds IR from the annotated tree. Expressions are visited post-order;
/// each visit appends an `Assign` whose id is the count of previously
/// emitted expressions, and a variable reference reuses the id recorded
/// for its declaration instead of re-emitting the initializer.
pub struct Builder<'a, 't> {
    module: Module,
    annotations: &'t AnnotationTable<'a>,
    decl_ids: HashMap<*const Decl<'a>, usize>,
    expr_count: usize,
}

impl<'a, 't> Builder<'a, 't> {
    pub fn new(name: impl Into<String>, annotations: &'t AnnotationTable<'a>) -> Self {
        Self {
            module: Module::new(name),
            annotations,
            decl_ids: HashMap::new(),
            expr_count: 0,
        }
    }

    pub fn build(&mut self, tree: &'a SyntaxTree<'a>) -> BuildResult<'a, ()> {
        for node in &tree.nodes {
            self.build_node(node)?;
        }
        Ok(())
    }

    /// Consumes `self` and returns the built [`Module`].
    #[must_use]
    pub fn into_module(self) -> Module {
        self.module
    }

    fn build_node(&mut self, node: &'a Node<'a>) -> BuildResult<'a, ()> {
        match node {
            Node::Print(args) => {
                for arg in args {
                    let id = self.build_expr(arg)?;
                    self.module.stmts.push(Stmt::Print { id });
                }
                self.module.stmts.push(Stmt::PrintEnd);
                Ok(())
            }
            Node::Decl(decl) => {
                if let Some(value) = &decl.value {
                    let id = self.build_expr(value)?;
                    self.decl_ids.insert(decl as *const Decl<'a>, id);
                }
                Ok(())
            }
            Node::Func { name, .. } => Err(FatalError::new("not yet implemented", *name)),
            Node::Struct { name, .. } => Err(FatalError::new("not yet implemented", *name)),
            Node::Return { keyword, .. } => Err(FatalError::new("not yet implemented", *keyword)),
        }
    }

    fn build_expr(&mut self, expr: &'a Expr<'a>) -> BuildResult<'a, usize> {
        match expr {
            Expr::IntLiteral(token) => {
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| FatalError::new("unable to parse integer", *token))?;
                Ok(self.push_assign(Value::Int(value)))
            }
            Expr::FloatLiteral(token) => {
                let value = token
                    .text
                    .parse::<f32>()
                    .map_err(|_| FatalError::new("unable to parse float", *token))?;
                Ok(self.push_assign(Value::Float(value)))
            }
            Expr::StringLiteral(token) => {
                let value = unescape_string_literal(token)?;
                Ok(self.push_assign(Value::String(value)))
            }
            Expr::Var(name) => {
                let decl = self
                    .annotations
                    .var_expr
                    .get(&(expr as *const Expr<'a>))
                    .and_then(|annotation| annotation.decl);
                match decl.and_then(|decl| self.decl_ids.get(&decl).copied()) {
                    Some(id) => Ok(id),
                    None => Err(FatalError::new("unresolved variable", *name)),
                }
            }
            Expr::Call { name, .. } => Err(FatalError::new("not yet implemented", *name)),
            Expr::Add { left, right, op } => {
                let left = self.build_expr(left)?;
                let right = self.build_expr(right)?;

                let annotation = &self.annotations.add_expr[&(expr as *const Expr<'a>)];
                let ty = match annotation.op {
                    AddOp::AddInt => Ty::Int,
                    AddOp::AddFloat => Ty::Float,
                    AddOp::None => unreachable!("unresolved operator reached lowering"),
                };

                let value = if op.is("-") {
                    Value::Sub { ty, left, right }
                } else {
                    Value::Add { ty, left, right }
                };
                Ok(self.push_assign(value))
            }
            Expr::Mul { left, right, op } => {
                let left = self.build_expr(left)?;
                let right = self.build_expr(right)?;

                let annotation = &self.annotations.mul_expr[&(expr as *const Expr<'a>)];
                let ty = match annotation.op {
                    MulOp::MulInt => Ty::Int,
                    MulOp::MulFloat => Ty::Float,
                    MulOp::None => unreachable!("unresolved operator reached lowering"),
                };

                let value = if op.is("/") {
                    Value::Div { ty, left, right }
                } else {
                    Value::Mul { ty, left, right }
                };
                Ok(self.push_assign(value))
            }
        }
    }

    fn push_assign(&mut self, value: Value) -> usize {
        let id = self.expr_count;
        self.expr_count += 1;
        self.module.stmts.push(Stmt::Assign { id, value });
        id
    }
}

/// Unescapes a string literal token, recognizing
/// `\n \t \r \\ \' \" \0 \b \f \v`. Any other backslash escape, or a
/// backslash at the end of the string, is a fatal error carrying the
/// string token.
fn unescape_string_literal<'a>(token: &Token<'a>) -> BuildResult<'a, String> {
    // strip the surrounding quotes
    let data = &token.text[1..token.text.len() - 1];

    let mut result = String::with_capacity(data.len());
    let mut chars = data.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        let next = match chars.next() {
            Some(next) => next,
            None => {
                return Err(FatalError::new(
                    "invalid escape sequence at end of string",
                    *token,
                ))
            }
        };

        match next {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            '\\' => result.push('\\'),
            '\'' => result.push('\''),
            '"' => result.push('"'),
            '0' => result.push('\0'),
            'b' => result.push('\u{0008}'),
            'f' => result.push('\u{000c}'),
            'v' => result.push('\u{000b}'),
            other => {
                return Err(FatalError::new(
                    format!("unknown escape sequence: \\{}", other),
                    *token,
                ))
            }
        }
    }

    Ok(result)
}
