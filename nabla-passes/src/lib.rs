//! Semantic passes over the syntax tree: the fixed-point annotator and
//! the validator.

pub mod annotate;
pub mod annotations;
pub mod validate;

pub use annotate::annotate;
pub use annotations::{
    AddAnnotation, AddOp, AnnotationTable, DeclAnnotation, MulAnnotation, MulOp, Type,
    TypeInstanceAnnotation, VarAnnotation,
};
pub use validate::{validate, Validation};
