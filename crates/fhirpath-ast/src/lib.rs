//! The FHIRPath AST node model and its services (`astToString`, `prettyPrint`).
//!
//! This crate builds on `fhirpath-ir`'s `Position` but has no dependency on
//! the lexer or the parser: it describes the tree shape and how to render
//! it, not how to build one.

mod node;
mod pretty;
mod stringify;

pub use node::{structural_eq, AstNode, BinaryOp, LiteralType, UnaryOp};
pub use pretty::pretty_print;
pub use stringify::ast_to_string;
