//! The fixed-point annotation pass.
//!
//! The tree is walked repeatedly; each walk may fill previously empty
//! annotation fields and never overwrites a filled one. The loop stops on
//! the first walk that makes no write, which bounds the pass because the
//! set of fillable fields is finite.

use nabla_parser::ast::{Decl, Expr, Node, SyntaxTree, TypeInstance};
use nabla_parser::visitor::{walk_decl, walk_expr, walk_node, walk_type_instance, Visitor};
use tracing::debug;

use crate::annotations::{AddOp, AnnotationTable, MulOp, Type};

/// Runs the annotator to its fixed point and returns the completed table.
/// The annotator never fails; whatever stays unresolved is left empty for
/// the validator to surface.
pub fn annotate<'a>(tree: &'a SyntaxTree<'a>) -> AnnotationTable<'a> {
    let mut table = AnnotationTable::default();
    let mut walks = 0usize;

    loop {
        let mut pass = AnnotatePass {
            tree,
            table: &mut table,
            changed: false,
        };
        for node in &tree.nodes {
            pass.visit_node(node);
        }
        walks += 1;
        if !pass.changed {
            break;
        }
    }

    debug!(walks, "annotation fixed point reached");
    table
}

struct AnnotatePass<'a, 't> {
    tree: &'a SyntaxTree<'a>,
    table: &'t mut AnnotationTable<'a>,
    changed: bool,
}

impl<'a, 't> Visitor<'a> for AnnotatePass<'a, 't> {
    fn visit_expr(&mut self, expr: &'a Expr<'a>) {
        // children first, so operand queries can succeed in the same walk
        walk_expr(self, expr);

        match expr {
            Expr::Add { left, right, .. } => {
                self.table.add_expr.entry(expr as *const _).or_default();
                self.changed |= annotate_add(self.table, expr, left, right);
            }
            Expr::Mul { left, right, .. } => {
                self.table.mul_expr.entry(expr as *const _).or_default();
                self.changed |= annotate_mul(self.table, expr, left, right);
            }
            Expr::Var(name) => {
                self.table.var_expr.entry(expr as *const _).or_default();
                self.changed |= annotate_var(self.table, self.tree, expr, name.text);
            }
            _ => {}
        }
    }

    fn visit_decl(&mut self, decl: &'a Decl<'a>) {
        walk_decl(self, decl);

        self.table.decl.entry(decl as *const _).or_default();
        self.changed |= annotate_decl(self.table, decl);
    }

    fn visit_type_instance(&mut self, instance: &'a TypeInstance<'a>) {
        walk_type_instance(self, instance);

        self.table.type_instance.entry(instance as *const _).or_default();
        self.changed |= annotate_type_instance(self.table, self.tree, instance);
    }
}

fn annotate_add<'a>(
    table: &mut AnnotationTable<'a>,
    expr: &'a Expr<'a>,
    left: &'a Expr<'a>,
    right: &'a Expr<'a>,
) -> bool {
    let key = expr as *const Expr<'a>;
    if table
        .add_expr
        .get(&key)
        .map_or(false, |annotation| annotation.result_type.is_some())
    {
        return false;
    }

    let resolved = match (table.resolve_type(left), table.resolve_type(right)) {
        (Some(Type::Int), Some(Type::Int)) => Some((Type::Int, AddOp::AddInt)),
        (Some(Type::Float), Some(Type::Float)) => Some((Type::Float, AddOp::AddFloat)),
        // no implicit conversions
        _ => None,
    };

    match resolved {
        Some((ty, op)) => {
            let annotation = table.add_expr.entry(key).or_default();
            annotation.result_type = Some(ty);
            annotation.op = op;
            true
        }
        None => false,
    }
}

fn annotate_mul<'a>(
    table: &mut AnnotationTable<'a>,
    expr: &'a Expr<'a>,
    left: &'a Expr<'a>,
    right: &'a Expr<'a>,
) -> bool {
    let key = expr as *const Expr<'a>;
    if table
        .mul_expr
        .get(&key)
        .map_or(false, |annotation| annotation.result_type.is_some())
    {
        return false;
    }

    let resolved = match (table.resolve_type(left), table.resolve_type(right)) {
        (Some(Type::Int), Some(Type::Int)) => Some((Type::Int, MulOp::MulInt)),
        (Some(Type::Float), Some(Type::Float)) => Some((Type::Float, MulOp::MulFloat)),
        _ => None,
    };

    match resolved {
        Some((ty, op)) => {
            let annotation = table.mul_expr.entry(key).or_default();
            annotation.result_type = Some(ty);
            annotation.op = op;
            true
        }
        None => false,
    }
}

fn annotate_var<'a>(
    table: &mut AnnotationTable<'a>,
    tree: &'a SyntaxTree<'a>,
    expr: &'a Expr<'a>,
    name: &'a str,
) -> bool {
    let key = expr as *const Expr<'a>;
    if table
        .var_expr
        .get(&key)
        .map_or(false, |annotation| annotation.decl.is_some())
    {
        return false;
    }

    let mut resolver = VarResolver {
        target: key,
        name,
        decl: None,
        done: false,
    };
    for node in &tree.nodes {
        resolver.visit_node(node);
        if resolver.done {
            break;
        }
    }

    match resolver.decl {
        Some(decl) => {
            let annotation = table.var_expr.entry(key).or_default();
            annotation.decl = Some(decl as *const Decl<'a>);
            true
        }
        None => false,
    }
}

/// Searches the tree for the declaration a variable reference binds to.
/// The walk stops when it reaches the reference itself, so only
/// declarations visited earlier can match; the last match wins, which
/// approximates lexical shadowing without a scope stack.
struct VarResolver<'a> {
    target: *const Expr<'a>,
    name: &'a str,
    decl: Option<&'a Decl<'a>>,
    done: bool,
}

impl<'a> Visitor<'a> for VarResolver<'a> {
    fn visit_expr(&mut self, expr: &'a Expr<'a>) {
        if self.done {
            return;
        }
        if expr as *const Expr<'a> == self.target {
            self.done = true;
            return;
        }
        walk_expr(self, expr);
    }

    fn visit_decl(&mut self, decl: &'a Decl<'a>) {
        // A declaration that contains the reference cannot bind it; that
        // would resolve `let foo = foo;`.
        walk_decl(self, decl);
        if self.done {
            return;
        }

        if decl.name.text == self.name {
            // A later declaration may shadow this one; keep searching.
            self.decl = Some(decl);
        }
    }

    fn visit_node(&mut self, node: &'a Node<'a>) {
        if self.done {
            return;
        }
        match node {
            // struct fields are not variables
            Node::Struct { .. } => {}
            _ => walk_node(self, node),
        }
    }
}

fn annotate_decl<'a>(table: &mut AnnotationTable<'a>, decl: &'a Decl<'a>) -> bool {
    let key = decl as *const Decl<'a>;
    if table
        .decl
        .get(&key)
        .map_or(false, |annotation| annotation.ty.is_some())
    {
        return false;
    }

    let value = match &decl.value {
        Some(value) => value,
        None => return false,
    };

    match table.resolve_type(value).cloned() {
        Some(ty) => {
            table.decl.entry(key).or_default().ty = Some(ty);
            true
        }
        None => false,
    }
}

fn annotate_type_instance<'a>(
    table: &mut AnnotationTable<'a>,
    tree: &'a SyntaxTree<'a>,
    instance: &'a TypeInstance<'a>,
) -> bool {
    let key = instance as *const TypeInstance<'a>;
    let mut changed = false;

    let resolved = table
        .type_instance
        .get(&key)
        .map_or(false, |annotation| annotation.ty.is_some());
    if !resolved {
        if let Some(ty) = resolve_type_name(table, tree, instance.name.text) {
            table.type_instance.entry(key).or_default().ty = Some(ty);
            changed = true;
        }
    }

    let evaluated = table
        .type_instance
        .get(&key)
        .map_or(false, |annotation| annotation.args.is_some());
    if !evaluated {
        if let Some(args) = eval_type_args(&instance.args) {
            table.type_instance.entry(key).or_default().args = Some(args);
            changed = true;
        }
    }

    changed
}

fn resolve_type_name<'a>(
    table: &AnnotationTable<'a>,
    tree: &'a SyntaxTree<'a>,
    name: &str,
) -> Option<Type> {
    match name {
        "int" => return Some(Type::Int),
        "float" => return Some(Type::Float),
        "string" => return Some(Type::String),
        _ => {}
    }

    // A struct name resolves once every field type has resolved, which
    // may take further walks.
    for node in &tree.nodes {
        if let Node::Struct {
            name: struct_name,
            fields,
        } = node
        {
            if struct_name.text != name {
                continue;
            }
            let mut resolved = Vec::with_capacity(fields.len());
            for field in fields {
                let instance = field.ty.as_ref()?;
                let key = instance as *const TypeInstance<'a>;
                let ty = table.type_instance.get(&key)?.ty.clone()?;
                resolved.push((field.name.text.to_string(), ty));
            }
            return Some(Type::Struct(resolved));
        }
    }

    None
}

fn eval_type_args(args: &[Expr<'_>]) -> Option<Vec<i64>> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Expr::IntLiteral(token) => values.push(token.text.parse().ok()?),
            _ => return None,
        }
    }
    Some(values)
}
