//! The FHIRPath expression parser — a Pratt-style, operator-precedence
//! parser over [`fhirpath_lexer::Tokenizer`]'s token stream (spec §4.2).
//!
//! The precedence ladder itself lives in [`precedence`], generated by a
//! small macro grounded in the teacher's `parse_binary_level!` (the ladder
//! functions are a straight mechanical transcription of spec §4.2's twelve
//! tiers, not a generic binding-power table). Primary/postfix dispatch
//! lives in [`primary`].

mod precedence;
mod primary;

use fhirpath_ast::AstNode;
use fhirpath_diagnostic::{
    expression_too_deeply_nested, unexpected_end_of_input, unexpected_trailing_token, ParseError,
};
use fhirpath_ir::{Position, Token, TokenKind};
use fhirpath_lexer::{LexError, Tokenizer};
use primary::PrimaryContext;
use tracing::debug;

/// Recursion depth ceiling (spec §5): a plain counter, not stack-growth —
/// FHIRPath expressions are short, so a hard, explicit limit is the right
/// tool, unlike the teacher's `ori_stack::ensure_sufficient_stack`, which
/// grows the OS stack instead of rejecting the input.
const MAX_RECURSION_DEPTH: usize = 500;

pub(crate) struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    source: &'a str,
    current: Token,
    depth: usize,
    primary_context: PrimaryContext,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Result<Self, ParseError> {
        let mut tokenizer = Tokenizer::new(source);
        let current = tokenizer
            .next_token()
            .map_err(|err| lex_error_to_parse_error(err, source))?;
        Ok(Parser {
            tokenizer,
            source,
            current,
            depth: 0,
            primary_context: PrimaryContext::default(),
        })
    }

    /// Arms the one-shot context flag the next [`Parser::parse_primary`] call
    /// will consume to pick its error wording (spec §4.3's named contexts).
    pub(crate) fn set_primary_context(&mut self, context: PrimaryContext) {
        self.primary_context = context;
    }

    /// Consumes the armed context flag, resetting it back to `Expression`.
    pub(crate) fn take_primary_context(&mut self) -> PrimaryContext {
        std::mem::take(&mut self.primary_context)
    }

    /// Consumes the current token and fetches the next one.
    pub(crate) fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self
            .tokenizer
            .next_token()
            .map_err(|err| lex_error_to_parse_error(err, self.source))?;
        Ok(())
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current.kind
    }

    pub(crate) fn current_position(&self) -> Position {
        self.current.position
    }

    pub(crate) fn current_token(&self) -> &Token {
        &self.current
    }

    pub(crate) fn source(&self) -> &'a str {
        self.source
    }

    /// Enters a recursive-descent call that could, for pathological input,
    /// recurse without bound (parenthesis nesting, `implies` chains, stacked
    /// unary operators). Pair with [`Parser::leave`].
    pub(crate) fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(expression_too_deeply_nested(self.current.position, self.source));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }
}

fn lex_error_to_parse_error(err: LexError, source: &str) -> ParseError {
    ParseError::new(err.kind.message(), err.position, source)
}

/// Parses `source` into an [`AstNode`] (spec §4.2 `parse(source) → AstNode`).
pub fn parse(source: &str) -> Result<AstNode, ParseError> {
    debug!(len = source.len(), "parsing expression");
    let mut parser = Parser::new(source)?;
    // Genuinely empty input (spec §7 "empty input") gets its own wording;
    // every other primary-position `Eof` (e.g. a function call left open,
    // spec §8 scenario 7) falls through to the ordinary expression-context
    // message instead, since by then something was already written.
    if parser.current_kind() == TokenKind::Eof {
        return Err(unexpected_end_of_input(parser.current_position(), source));
    }
    let ast = parser.parse_expr()?;
    if parser.current_kind() != TokenKind::Eof {
        return Err(unexpected_trailing_token(parser.current_position(), source));
    }
    Ok(ast)
}


/// Property tests for spec §8's universal laws: round-trip idempotence
/// (law 1) and operator precedence (law 5). Grounded in the teacher's
/// `ori_lexer_core` use of `proptest` for its scanning primitives, applied
/// here one layer up at the parser/stringifier boundary.
#[cfg(test)]
mod laws {
    use super::parse;
    use fhirpath_ast::structural_eq;
    use proptest::prelude::*;

    const RESERVED: &[&str] = &[
        "and", "or", "xor", "implies", "div", "mod", "in", "contains", "is", "as", "not", "true",
        "false",
    ];

    fn ident() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9]{0,5}".prop_filter("not reserved", |s| !RESERVED.contains(&s.as_str()))
    }

    fn number() -> impl Strategy<Value = String> {
        (1u32..1000).prop_map(|n| n.to_string())
    }

    fn operand() -> impl Strategy<Value = String> {
        prop_oneof![ident(), number()]
    }

    proptest! {
        /// Law 1: a successful parse round-trips through `astToString`.
        #[test]
        fn round_trip_through_ast_to_string(a in operand(), b in operand()) {
            let source = format!("{a} + {b} * 2");
            let first = parse(&source).expect("fixture source parses");
            let rendered = fhirpath_ast::ast_to_string(&first);
            let second = parse(&rendered).expect("rendered source reparses");
            prop_assert!(structural_eq(&first, &second));
        }

        /// Law 5: `*` binds tighter than `+`, so `a + b * c` always roots at `+`.
        #[test]
        fn multiplicative_binds_tighter_than_additive(a in operand(), b in operand(), c in operand()) {
            let ast = parse(&format!("{a} + {b} * {c}")).expect("fixture source parses");
            match ast {
                fhirpath_ast::AstNode::Binary { op: fhirpath_ast::BinaryOp::Add, right, .. } => {
                    prop_assert!(matches!(*right, fhirpath_ast::AstNode::Binary { op: fhirpath_ast::BinaryOp::Mul, .. }));
                }
                other => prop_assert!(false, "expected top-level Add, got {other:?}"),
            }
        }

        /// Law 5 continued: `and` binds tighter than `or`, matching §4.2 tiers 10/11.
        #[test]
        fn and_binds_tighter_than_or(a in ident(), b in ident(), c in ident()) {
            let ast = parse(&format!("{a} or {b} and {c}")).expect("fixture source parses");
            match ast {
                fhirpath_ast::AstNode::Binary { op: fhirpath_ast::BinaryOp::Or, right, .. } => {
                    prop_assert!(matches!(*right, fhirpath_ast::AstNode::Binary { op: fhirpath_ast::BinaryOp::And, .. }));
                }
                other => prop_assert!(false, "expected top-level Or, got {other:?}"),
            }
        }
    }
}
