//! Visitor pattern for syntax tree nodes.

use crate::ast::{Decl, Expr, Node, TypeInstance};

pub trait Visitor<'a>: Sized {
    fn visit_expr(&mut self, expr: &'a Expr<'a>) {
        walk_expr(self, expr);
    }
    fn visit_node(&mut self, node: &'a Node<'a>) {
        walk_node(self, node);
    }
    fn visit_decl(&mut self, decl: &'a Decl<'a>) {
        walk_decl(self, decl);
    }
    fn visit_type_instance(&mut self, instance: &'a TypeInstance<'a>) {
        walk_type_instance(self, instance);
    }
}

pub fn walk_expr<'a>(visitor: &mut impl Visitor<'a>, expr: &'a Expr<'a>) {
    match expr {
        Expr::IntLiteral(_) => {}
        Expr::FloatLiteral(_) => {}
        Expr::StringLiteral(_) => {}
        Expr::Var(_) => {}
        Expr::Call { name: _, args } => {
            for (_name, arg) in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Add { left, right, op: _ } | Expr::Mul { left, right, op: _ } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
    }
}

pub fn walk_node<'a>(visitor: &mut impl Visitor<'a>, node: &'a Node<'a>) {
    match node {
        Node::Print(args) => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Node::Decl(decl) => visitor.visit_decl(decl),
        Node::Func {
            name: _,
            params,
            body,
        } => {
            for param in params {
                visitor.visit_decl(param);
            }
            for inner in body {
                visitor.visit_node(inner);
            }
        }
        Node::Struct { name: _, fields } => {
            for field in fields {
                visitor.visit_decl(field);
            }
        }
        Node::Return { keyword: _, value } => visitor.visit_expr(value),
    }
}

pub fn walk_decl<'a>(visitor: &mut impl Visitor<'a>, decl: &'a Decl<'a>) {
    if let Some(value) = &decl.value {
        visitor.visit_expr(value);
    }
    if let Some(instance) = &decl.ty {
        visitor.visit_type_instance(instance);
    }
}

pub fn walk_type_instance<'a>(visitor: &mut impl Visitor<'a>, instance: &'a TypeInstance<'a>) {
    for arg in &instance.args {
        visitor.visit_expr(arg);
    }
}
