//! Human-readable module dumps, one line per statement.

use std::fmt;

use crate::{Module, Stmt, Ty, Value};

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Float => write!(f, "float"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "int {}", value),
            Value::Float(value) => write!(f, "float {}", value),
            Value::String(value) => write!(f, "string {:?}", value),
            Value::Add { ty, left, right } => write!(f, "add.{} v{}, v{}", ty, left, right),
            Value::Sub { ty, left, right } => write!(f, "sub.{} v{}, v{}", ty, left, right),
            Value::Mul { ty, left, right } => write!(f, "mul.{} v{}, v{}", ty, left, right),
            Value::Div { ty, left, right } => write!(f, "div.{} v{}, v{}", ty, left, right),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.name)?;

        for (offset, stmt) in self.stmts.iter().enumerate() {
            write!(f, "{:04} ", offset)?;
            match stmt {
                Stmt::Assign { id, value } => writeln!(f, "assign v{}, {}", id, value)?,
                Stmt::Print { id } => writeln!(f, "print v{}", id)?,
                Stmt::PrintEnd => writeln!(f, "print_end")?,
            }
        }

        Ok(())
    }
}
