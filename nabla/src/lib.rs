//! The per-file compilation pipeline: lex, parse, annotate, validate,
//! then either lower and interpret or emit target-language source.
//!
//! Every stage failure prints its diagnostics to the console and stops
//! the pipeline for that file.

pub mod codegen;

use std::io::{self, Write};

use nabla_parser::ast::SyntaxTree;
use nabla_parser::parser::Parser;
use nabla_passes::{annotate, validate, AnnotationTable, Validation};
use nabla_source::{Console, Diagnostic, Source, Token, TokenKind};
use nabla_vm::{Builder, Interpreter, Runtime};
use tracing::debug;

/// Compiles `source` and executes it against `runtime`. Returns whether
/// the file compiled and ran; the `io::Result` only reflects console
/// write failures.
pub fn interpret_source<W: Write>(
    source: &Source,
    runtime: &mut dyn Runtime,
    console: &mut Console<W>,
) -> io::Result<bool> {
    let tokens = match scan(source, console)? {
        Some(tokens) => tokens,
        None => return Ok(false),
    };
    let tree = match parse_all(source, &tokens, console)? {
        Some(tree) => tree,
        None => return Ok(false),
    };

    let annotations = annotate(&tree);
    if !report_validation(source, &tree, &annotations, console)? {
        return Ok(false);
    }

    let mut builder = Builder::new(source.filename.clone(), &annotations);
    if let Err(err) = builder.build(&tree) {
        console.print_diagnostic(source, err.diagnostic())?;
        return Ok(false);
    }
    let module = builder.into_module();
    debug!("lowered module:\n{}", module);

    if let Err(err) = Interpreter::new(runtime).exec(&module) {
        console.print_error(&err.to_string())?;
        return Ok(false);
    }

    Ok(true)
}

/// Compiles `source` and emits it in the target language selected by
/// `lang`. Returns the emitted source, or `None` if the file failed.
pub fn emit_source<W: Write>(
    source: &Source,
    lang: &str,
    console: &mut Console<W>,
) -> io::Result<Option<String>> {
    let tokens = match scan(source, console)? {
        Some(tokens) => tokens,
        None => return Ok(None),
    };
    let tree = match parse_all(source, &tokens, console)? {
        Some(tree) => tree,
        None => return Ok(None),
    };

    let annotations = annotate(&tree);
    if !report_validation(source, &tree, &annotations, console)? {
        return Ok(None);
    }

    let mut emitter = match codegen::create(lang, &annotations) {
        Some(emitter) => emitter,
        None => {
            console.print_error(&format!("unknown target language '{}'", lang))?;
            return Ok(None);
        }
    };
    emitter.generate(&tree);

    Ok(Some(emitter.source().to_string()))
}

/// Lexes the file and filters whitespace and comments. Incomplete tokens
/// are reported here, before any parsing.
fn scan<'a, W: Write>(
    source: &'a Source,
    console: &mut Console<W>,
) -> io::Result<Option<Vec<Token<'a>>>> {
    let mut tokens = Vec::new();

    for token in source.tokenize() {
        match token.kind {
            TokenKind::Space | TokenKind::Comment => continue,
            TokenKind::IncompleteStringLiteral => {
                console.print_diagnostic(source, &Diagnostic::new("unterminated string", token))?;
                return Ok(None);
            }
            TokenKind::IncompleteComment => {
                console.print_diagnostic(source, &Diagnostic::new("unterminated comment", token))?;
                return Ok(None);
            }
            _ => tokens.push(token),
        }
    }

    Ok(Some(tokens))
}

/// Parses the whole token stream. The first syntax error aborts the file.
fn parse_all<'a, W: Write>(
    source: &Source,
    tokens: &'a [Token<'a>],
    console: &mut Console<W>,
) -> io::Result<Option<SyntaxTree<'a>>> {
    let mut parser = Parser::new(tokens);
    let mut tree = SyntaxTree::default();

    while !parser.eof() {
        match parser.parse() {
            Ok(node) => tree.nodes.push(node),
            Err(err) => {
                console.print_diagnostic(source, err.diagnostic())?;
                return Ok(None);
            }
        }
    }

    Ok(Some(tree))
}

/// Runs the validator and prints every collected diagnostic. Returns
/// whether validation passed.
fn report_validation<'a, W: Write>(
    source: &Source,
    tree: &'a SyntaxTree<'a>,
    annotations: &AnnotationTable<'a>,
    console: &mut Console<W>,
) -> io::Result<bool> {
    let Validation {
        diagnostics,
        failed,
    } = validate(tree, annotations);

    for diagnostic in &diagnostics {
        console.print_diagnostic(source, diagnostic)?;
    }

    Ok(!failed)
}
