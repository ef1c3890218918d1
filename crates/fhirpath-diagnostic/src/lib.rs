//! Diagnostic construction and rendering for the FHIRPath parser (spec §4.3).
//!
//! This crate owns the `ParseError` shape and its caret-block formatter; it
//! has no knowledge of tokens or the AST, so it can be depended on by both
//! the lexer's error-conversion path and the parser without a dependency
//! cycle.

mod error;
mod messages;
mod render;

pub use error::ParseError;
pub use messages::{
    expected_closing_bracket, expected_closing_paren, expected_expression_in_indexer,
    expected_identifier_after_dot, expected_type_specifier, expression_too_deeply_nested,
    invalid_date_format, unexpected_after_binary_operator, unexpected_end_of_input,
    unexpected_in_expression, unexpected_in_function_args, unexpected_in_indexer,
    unexpected_trailing_token,
};
pub use render::render;
