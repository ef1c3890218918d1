//! Named-context constructors for the fixed message text in spec §4.3's
//! dictionary, plus the structural/lexical errors spec §7 names that fall
//! outside that table.

use crate::error::ParseError;
use fhirpath_ir::Position;

pub fn unexpected_in_expression(position: Position, expression: &str) -> ParseError {
    ParseError::new(
        "Unexpected token in expression. Expected an operand, function, or identifier.",
        position,
        expression,
    )
}

pub fn expected_identifier_after_dot(position: Position, expression: &str) -> ParseError {
    ParseError::new("Expected identifier after dot", position, expression)
}

pub fn unexpected_in_function_args(position: Position, expression: &str) -> ParseError {
    ParseError::new(
        "Unexpected token in function arguments. Expected an expression or closing parenthesis.",
        position,
        expression,
    )
}

pub fn unexpected_after_binary_operator(position: Position, expression: &str) -> ParseError {
    ParseError::new(
        "Unexpected token. Expected an expression after binary operator.",
        position,
        expression,
    )
}

pub fn unexpected_in_indexer(position: Position, expression: &str) -> ParseError {
    ParseError::new("Unexpected token in indexer.", position, expression)
}

pub fn expected_expression_in_indexer(position: Position, expression: &str) -> ParseError {
    ParseError::new("Expected expression in indexer", position, expression)
}

pub fn expected_closing_bracket(position: Position, expression: &str) -> ParseError {
    ParseError::new("Expected closing bracket", position, expression)
}

pub fn expected_closing_paren(position: Position, expression: &str) -> ParseError {
    ParseError::new("Expected closing parenthesis", position, expression)
}

pub fn unexpected_trailing_token(position: Position, expression: &str) -> ParseError {
    ParseError::new("Unexpected token", position, expression)
}

pub fn unexpected_end_of_input(position: Position, expression: &str) -> ParseError {
    ParseError::new(
        "Unexpected end of input. Expected an expression.",
        position,
        expression,
    )
}

pub fn invalid_date_format(position: Position, expression: &str) -> ParseError {
    ParseError::new("Invalid date format", position, expression)
}

pub fn expected_type_specifier(position: Position, expression: &str) -> ParseError {
    ParseError::new(
        "Expected a type specifier after `is`/`as`",
        position,
        expression,
    )
}

pub fn expression_too_deeply_nested(position: Position, expression: &str) -> ParseError {
    ParseError::new("Expression too deeply nested", position, expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dictionary_messages_match_spec_wording() {
        let pos = Position::new(0, 1, 1);
        assert_eq!(
            unexpected_in_expression(pos, "x").original_message,
            "Unexpected token in expression. Expected an operand, function, or identifier."
        );
        assert_eq!(
            expected_identifier_after_dot(pos, "x").original_message,
            "Expected identifier after dot"
        );
        assert_eq!(
            unexpected_in_indexer(pos, "x").original_message,
            "Unexpected token in indexer."
        );
    }
}
