//! C++ source emission.
//!
//! Structs, declarations and functions emit at namespace scope in tree
//! order; top-level print statements are gathered into an emitted `main`
//! so the output is a self-contained translation unit. Return statements
//! outside function bodies are skipped.

use nabla_parser::ast::{Decl, Expr, Node, SyntaxTree};
use nabla_passes::{AnnotationTable, Type};

use super::CodeWriter;

pub struct CxxEmitter<'a, 't> {
    writer: CodeWriter,
    annotations: &'t AnnotationTable<'a>,
}

impl<'a, 't> CxxEmitter<'a, 't> {
    pub fn new(annotations: &'t AnnotationTable<'a>) -> Self {
        Self {
            writer: CodeWriter::new(),
            annotations,
        }
    }

    pub fn source(&self) -> &str {
        self.writer.source()
    }

    pub fn generate(&mut self, tree: &'a SyntaxTree<'a>) {
        let has_prints = tree
            .nodes
            .iter()
            .any(|node| matches!(node, Node::Print(_)));
        let uses_string = self.uses_string(tree);

        if has_prints {
            self.writer.add_line("#include <iostream>");
        }
        if uses_string {
            self.writer.add_line("#include <string>");
        }
        if has_prints || uses_string {
            self.writer.newline();
        }

        for node in &tree.nodes {
            match node {
                Node::Print(_) => {}
                Node::Return { .. } => {}
                _ => self.emit_node(node),
            }
        }

        if has_prints {
            self.writer.add_line("auto main() -> int {");
            self.writer.indent();
            for node in &tree.nodes {
                if let Node::Print(args) = node {
                    self.emit_print(args);
                }
            }
            self.writer.add_line("return 0;");
            self.writer.dedent();
            self.writer.add_line("}");
        }
    }

    fn emit_node(&mut self, node: &'a Node<'a>) {
        match node {
            Node::Print(args) => self.emit_print(args),
            Node::Decl(decl) => self.emit_decl(decl),
            Node::Func { name, params, body } => {
                let mut line = String::from("auto ");
                line.push_str(name.text);
                line.push('(');
                for (index, param) in params.iter().enumerate() {
                    if index > 0 {
                        line.push_str(", ");
                    }
                    line.push_str("const ");
                    line.push_str(&self.param_type(param));
                    line.push(' ');
                    line.push_str(param.name.text);
                    if let Some(value) = &param.value {
                        line.push_str(" = ");
                        line.push_str(&self.expr_text(value));
                    }
                }
                line.push_str(") {");
                self.writer.add_line(&line);
                self.writer.indent();
                for inner in body {
                    match inner {
                        Node::Return { keyword: _, value } => {
                            let line = format!("return {};", self.expr_text(value));
                            self.writer.add_line(&line);
                        }
                        _ => self.emit_node(inner),
                    }
                }
                self.writer.dedent();
                self.writer.add_line("}");
            }
            Node::Struct { name, fields } => {
                self.writer.add_line(&format!("struct {} final {{", name.text));
                self.writer.indent();
                for field in fields {
                    let line = format!("{} {}{{}};", self.param_type(field), field.name.text);
                    self.writer.add_line(&line);
                }
                self.writer.dedent();
                self.writer.add_line("};");
            }
            Node::Return { .. } => {}
        }
    }

    fn emit_decl(&mut self, decl: &'a Decl<'a>) {
        let mut line = String::new();
        if decl.immutable {
            line.push_str("const ");
        }

        let ty = self
            .annotations
            .decl
            .get(&(decl as *const Decl<'a>))
            .and_then(|annotation| annotation.ty.as_ref());
        line.push_str(match ty {
            Some(Type::Int) => "int",
            Some(Type::Float) => "float",
            Some(Type::String) => "std::string",
            _ => "auto",
        });

        line.push(' ');
        line.push_str(decl.name.text);

        if let Some(value) = &decl.value {
            line.push_str(" = ");
            line.push_str(&self.expr_text(value));
        }

        line.push(';');
        self.writer.add_line(&line);
    }

    fn emit_print(&mut self, args: &[Expr<'a>]) {
        let mut line = String::from("std::cout");
        for arg in args {
            line.push_str(" << ");
            line.push_str(&self.expr_text(arg));
        }
        line.push_str(" << std::endl;");
        self.writer.add_line(&line);
    }

    fn expr_text(&self, expr: &Expr<'a>) -> String {
        match expr {
            Expr::IntLiteral(token)
            | Expr::FloatLiteral(token)
            | Expr::StringLiteral(token)
            | Expr::Var(token) => token.text.to_string(),
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|(_name, arg)| self.expr_text(arg))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", name.text, args)
            }
            Expr::Add { left, right, op } | Expr::Mul { left, right, op } => {
                // the grammar has no parenthesized primaries, so operand
                // trees never need parentheses in the output
                format!(
                    "{} {} {}",
                    self.expr_text(left),
                    op.text,
                    self.expr_text(right)
                )
            }
        }
    }

    /// The written C++ type for a parameter or field: the resolved type
    /// when the annotator got one, the written type name for structs and
    /// unresolved names, `auto` when no type was written at all.
    fn param_type(&self, decl: &Decl<'a>) -> String {
        let instance = match &decl.ty {
            Some(instance) => instance,
            None => return "auto".to_string(),
        };

        let resolved = self
            .annotations
            .type_instance
            .get(&(instance as *const _))
            .and_then(|annotation| annotation.ty.as_ref());
        match resolved {
            Some(Type::Int) => "int".to_string(),
            Some(Type::Float) => "float".to_string(),
            Some(Type::String) => "std::string".to_string(),
            _ => instance.name.text.to_string(),
        }
    }

    fn uses_string(&self, tree: &'a SyntaxTree<'a>) -> bool {
        fn decl_is_string<'a>(
            annotations: &AnnotationTable<'a>,
            decl: &'a Decl<'a>,
        ) -> bool {
            if let Some(annotation) = annotations.decl.get(&(decl as *const Decl<'a>)) {
                if annotation.ty == Some(Type::String) {
                    return true;
                }
            }
            if let Some(instance) = &decl.ty {
                if let Some(annotation) = annotations.type_instance.get(&(instance as *const _)) {
                    if annotation.ty == Some(Type::String) {
                        return true;
                    }
                }
            }
            false
        }

        tree.nodes.iter().any(|node| match node {
            Node::Decl(decl) => decl_is_string(self.annotations, decl),
            Node::Func { params, .. } => params
                .iter()
                .any(|param| decl_is_string(self.annotations, param)),
            Node::Struct { fields, .. } => fields
                .iter()
                .any(|field| decl_is_string(self.annotations, field)),
            _ => false,
        })
    }
}
