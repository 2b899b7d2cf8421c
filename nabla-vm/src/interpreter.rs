//! Executes an IR [`Module`] against a [`Runtime`] sink.

use nabla_ir::{Module, Stmt, Ty, Value};
use thiserror::Error;

/// The interpreter's effect sink. Kept as a trait object so tests can
/// capture printed output instead of writing to stdout.
pub trait Runtime {
    fn print_int(&mut self, value: i64);
    fn print_float(&mut self, value: f32);
    fn print_str(&mut self, value: &str);
    fn print_end(&mut self);
}

/// Writes values to standard output; `print_end` emits a newline.
#[derive(Debug, Default)]
pub struct StdoutRuntime;

impl Runtime for StdoutRuntime {
    fn print_int(&mut self, value: i64) {
        print!("{}", value);
    }

    fn print_float(&mut self, value: f32) {
        print!("{}", value);
    }

    fn print_str(&mut self, value: &str) {
        print!("{}", value);
    }

    fn print_end(&mut self) {
        println!();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("division by zero")]
    DivisionByZero,
    /// Unreachable on validated input; execution refuses to continue
    /// rather than compute with the wrong type.
    #[error("operand type mismatch")]
    OperandMismatch,
}

/// A computed value slot, indexed by assignment id.
#[derive(Debug, Clone)]
enum Slot {
    Int(i64),
    Float(f32),
    Str(String),
}

pub struct Interpreter<'r> {
    runtime: &'r mut dyn Runtime,
}

impl<'r> Interpreter<'r> {
    pub fn new(runtime: &'r mut dyn Runtime) -> Self {
        Self { runtime }
    }

    /// Walks the statements in order. Assignment ids are dense and
    /// assigned in emission order, and every operand id is smaller than
    /// the id being assigned, so the value table is a plain vector.
    pub fn exec(&mut self, module: &Module) -> Result<(), ExecError> {
        let mut values: Vec<Slot> = Vec::new();

        for stmt in &module.stmts {
            match stmt {
                Stmt::Assign { id, value } => {
                    debug_assert_eq!(*id, values.len());
                    let slot = eval(&values, value)?;
                    values.push(slot);
                }
                Stmt::Print { id } => match &values[*id] {
                    Slot::Int(value) => self.runtime.print_int(*value),
                    Slot::Float(value) => self.runtime.print_float(*value),
                    Slot::Str(value) => self.runtime.print_str(value),
                },
                Stmt::PrintEnd => self.runtime.print_end(),
            }
        }

        Ok(())
    }
}

fn eval(values: &[Slot], value: &Value) -> Result<Slot, ExecError> {
    Ok(match value {
        Value::Int(value) => Slot::Int(*value),
        Value::Float(value) => Slot::Float(*value),
        Value::String(value) => Slot::Str(value.clone()),
        Value::Add { ty, left, right } => match ty {
            Ty::Int => {
                let (left, right) = int_operands(&values[*left], &values[*right])?;
                Slot::Int(left.wrapping_add(right))
            }
            Ty::Float => {
                let (left, right) = float_operands(&values[*left], &values[*right])?;
                Slot::Float(left + right)
            }
        },
        Value::Sub { ty, left, right } => match ty {
            Ty::Int => {
                let (left, right) = int_operands(&values[*left], &values[*right])?;
                Slot::Int(left.wrapping_sub(right))
            }
            Ty::Float => {
                let (left, right) = float_operands(&values[*left], &values[*right])?;
                Slot::Float(left - right)
            }
        },
        Value::Mul { ty, left, right } => match ty {
            Ty::Int => {
                let (left, right) = int_operands(&values[*left], &values[*right])?;
                Slot::Int(left.wrapping_mul(right))
            }
            Ty::Float => {
                let (left, right) = float_operands(&values[*left], &values[*right])?;
                Slot::Float(left * right)
            }
        },
        Value::Div { ty, left, right } => match ty {
            Ty::Int => {
                let (left, right) = int_operands(&values[*left], &values[*right])?;
                Slot::Int(left.checked_div(right).ok_or(ExecError::DivisionByZero)?)
            }
            Ty::Float => {
                let (left, right) = float_operands(&values[*left], &values[*right])?;
                Slot::Float(left / right)
            }
        },
    })
}

fn int_operands(left: &Slot, right: &Slot) -> Result<(i64, i64), ExecError> {
    match (left, right) {
        (Slot::Int(left), Slot::Int(right)) => Ok((*left, *right)),
        _ => Err(ExecError::OperandMismatch),
    }
}

fn float_operands(left: &Slot, right: &Slot) -> Result<(f32, f32), ExecError> {
    match (left, right) {
        (Slot::Float(left), Slot::Float(right)) => Ok((*left, *right)),
        _ => Err(ExecError::OperandMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use nabla_passes::annotate;
    use nabla_source::{tokenize, TokenKind};

    /// Captures printed output into a string for assertions.
    #[derive(Default)]
    struct CaptureRuntime {
        out: String,
    }

    impl Runtime for CaptureRuntime {
        fn print_int(&mut self, value: i64) {
            self.out.push_str(&value.to_string());
        }

        fn print_float(&mut self, value: f32) {
            self.out.push_str(&value.to_string());
        }

        fn print_str(&mut self, value: &str) {
            self.out.push_str(value);
        }

        fn print_end(&mut self) {
            self.out.push('\n');
        }
    }

    fn run(source: &str) -> String {
        let tokens: Vec<_> = tokenize(source)
            .into_iter()
            .filter(|tok| tok.kind != TokenKind::Space && tok.kind != TokenKind::Comment)
            .collect();
        let tree = nabla_parser::parser::Parser::new(&tokens)
            .parse_tree()
            .expect("parse error");
        let table = annotate(&tree);
        let mut builder = Builder::new("test.nabla", &table);
        builder.build(&tree).expect("build error");
        let module = builder.into_module();

        let mut runtime = CaptureRuntime::default();
        Interpreter::new(&mut runtime)
            .exec(&module)
            .expect("exec error");
        runtime.out
    }

    #[test]
    fn test_print_string() {
        assert_eq!(run(r#"print("hello");"#), "hello\n");
    }

    #[test]
    fn test_int_arithmetic() {
        assert_eq!(run("print(2 * 3 + 4);"), "10\n");
        assert_eq!(run("print(10 - 2 - 3);"), "5\n");
        assert_eq!(run("print(9 / 2);"), "4\n");
    }

    #[test]
    fn test_float_arithmetic() {
        assert_eq!(run("print(1.5 * 2.0);"), "3\n");
        assert_eq!(run("print(0.5 + 0.25);"), "0.75\n");
    }

    #[test]
    fn test_variables() {
        assert_eq!(run("let x = 7; print(x);"), "7\n");
        assert_eq!(run("let x = 2 * 10; let y = 1; print(x, y);"), "201\n");
    }

    #[test]
    fn test_multiple_print_args() {
        assert_eq!(run("print(2, 3);"), "23\n");
    }

    #[test]
    fn test_division_by_zero() {
        let module = Module {
            name: "test".to_string(),
            stmts: vec![
                Stmt::Assign {
                    id: 0,
                    value: Value::Int(1),
                },
                Stmt::Assign {
                    id: 1,
                    value: Value::Int(0),
                },
                Stmt::Assign {
                    id: 2,
                    value: Value::Div {
                        ty: Ty::Int,
                        left: 0,
                        right: 1,
                    },
                },
            ],
        };

        let mut runtime = CaptureRuntime::default();
        assert_eq!(
            Interpreter::new(&mut runtime).exec(&module),
            Err(ExecError::DivisionByZero)
        );
    }

    #[test]
    fn test_operand_mismatch() {
        let module = Module {
            name: "test".to_string(),
            stmts: vec![
                Stmt::Assign {
                    id: 0,
                    value: Value::Int(1),
                },
                Stmt::Assign {
                    id: 1,
                    value: Value::Float(2.0),
                },
                Stmt::Assign {
                    id: 2,
                    value: Value::Add {
                        ty: Ty::Int,
                        left: 0,
                        right: 1,
                    },
                },
            ],
        };

        let mut runtime = CaptureRuntime::default();
        assert_eq!(
            Interpreter::new(&mut runtime).exec(&module),
            Err(ExecError::OperandMismatch)
        );
    }
}
