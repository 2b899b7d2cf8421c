//! Validation of the annotated tree: unresolved operators and symbol
//! redeclarations. Diagnostics are collected, not thrown; the file is
//! only abandoned after every semantic error has been reported.

use std::collections::HashMap;

use nabla_parser::ast::{Decl, Expr, Node, SyntaxTree};
use nabla_parser::visitor::{walk_expr, Visitor};
use nabla_source::{Diagnostic, Token};

use crate::annotations::AnnotationTable;

#[derive(Debug, Default)]
pub struct Validation<'a> {
    pub diagnostics: Vec<Diagnostic<'a>>,
    pub failed: bool,
}

/// Checks the tree against its annotations. Unresolved-operator checks
/// follow the tree in program order so diagnostics come out in a
/// deterministic order.
pub fn validate<'a>(tree: &'a SyntaxTree<'a>, annotations: &AnnotationTable<'a>) -> Validation<'a> {
    let mut validator = Validator {
        annotations,
        scopes: vec![Scope::default()],
        validation: Validation::default(),
    };

    for node in &tree.nodes {
        validator.visit_node(node);
    }

    validator.validation
}

#[derive(Default)]
struct Scope<'a> {
    decls: HashMap<&'a str, *const Decl<'a>>,
}

struct Validator<'a, 't> {
    annotations: &'t AnnotationTable<'a>,
    scopes: Vec<Scope<'a>>,
    validation: Validation<'a>,
}

impl<'a, 't> Validator<'a, 't> {
    fn add_diagnostic(&mut self, what: &str, token: Token<'a>) {
        self.validation.diagnostics.push(Diagnostic::new(what, token));
        self.validation.failed = true;
    }

    fn find_decl(&self, name: &str) -> Option<*const Decl<'a>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.decls.get(name).copied())
    }

    /// Declares into the current scope, reporting a collision against the
    /// same or any enclosing scope.
    fn declare(&mut self, decl: &'a Decl<'a>) {
        if self.find_decl(decl.name.text).is_some() {
            self.add_diagnostic("symbol already exists by this name", decl.name);
        } else {
            self.current_scope().decls.insert(decl.name.text, decl);
        }
    }

    /// Declares into the current scope, checking only that scope. Used
    /// for struct fields, which do not shadow variables.
    fn declare_field(&mut self, decl: &'a Decl<'a>) {
        if self.current_scope().decls.contains_key(decl.name.text) {
            self.add_diagnostic("symbol already exists by this name", decl.name);
        } else {
            self.current_scope().decls.insert(decl.name.text, decl);
        }
    }

    fn current_scope(&mut self) -> &mut Scope<'a> {
        self.scopes.last_mut().unwrap()
    }
}

impl<'a, 't> Visitor<'a> for Validator<'a, 't> {
    fn visit_expr(&mut self, expr: &'a Expr<'a>) {
        walk_expr(self, expr);

        match expr {
            Expr::Add { op, .. } => {
                let resolved = self
                    .annotations
                    .add_expr
                    .get(&(expr as *const Expr<'a>))
                    .map_or(false, |annotation| annotation.result_type.is_some());
                if !resolved {
                    self.add_diagnostic("unresolved operator", *op);
                }
            }
            Expr::Mul { op, .. } => {
                let resolved = self
                    .annotations
                    .mul_expr
                    .get(&(expr as *const Expr<'a>))
                    .map_or(false, |annotation| annotation.result_type.is_some());
                if !resolved {
                    self.add_diagnostic("unresolved operator", *op);
                }
            }
            _ => {}
        }
    }

    fn visit_node(&mut self, node: &'a Node<'a>) {
        match node {
            Node::Print(args) => {
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Node::Decl(decl) => {
                if let Some(value) = &decl.value {
                    self.visit_expr(value);
                }
                self.declare(decl);
            }
            Node::Func {
                name: _,
                params,
                body,
            } => {
                self.scopes.push(Scope::default());
                for param in params {
                    if let Some(value) = &param.value {
                        self.visit_expr(value);
                    }
                    self.declare(param);
                }
                for inner in body {
                    self.visit_node(inner);
                }
                self.scopes.pop();
            }
            Node::Struct { name: _, fields } => {
                self.scopes.push(Scope::default());
                for field in fields {
                    self.declare_field(field);
                }
                self.scopes.pop();
            }
            Node::Return { keyword: _, value } => self.visit_expr(value),
        }
    }
}
