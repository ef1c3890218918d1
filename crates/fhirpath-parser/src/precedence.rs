//! The binary-operator precedence ladder (spec §4.2's twelve-tier table).
//!
//! Each left-associative tier is a mechanical repeat of the same shape
//! (parse the tighter level, then loop consuming same-tier operators), so
//! `binary_level!` generates them, grounded in the teacher's
//! `parse_binary_level!` macro. `implies` (right-associative) and `is`/`as`
//! (mixfix, non-expression right-hand side) don't fit that shape and are
//! written out by hand.

use crate::primary::PrimaryContext;
use crate::Parser;
use fhirpath_ast::{AstNode, BinaryOp};
use fhirpath_diagnostic::{expected_type_specifier, ParseError};
use fhirpath_ir::{token_identifier_text, TokenKind};

macro_rules! binary_level {
    ($name:ident, $next:ident, [$($tok:pat => $op:expr),+ $(,)?]) => {
        fn $name(&mut self) -> Result<AstNode, ParseError> {
            let mut left = self.$next()?;
            loop {
                let op = match self.current_kind() {
                    $($tok => $op,)+
                    _ => break,
                };
                let position = self.current_position();
                self.advance()?;
                self.set_primary_context(PrimaryContext::BinaryRhs);
                let right = self.$next()?;
                left = AstNode::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                    position,
                };
            }
            Ok(left)
        }
    };
}

impl<'a> Parser<'a> {
    /// Entry point for the whole precedence ladder (spec §4.2 tier 12, the
    /// loosest-binding level): `implies`, right-associative.
    pub(crate) fn parse_expr(&mut self) -> Result<AstNode, ParseError> {
        self.enter()?;
        let result = self.parse_implies();
        self.leave();
        result
    }

    fn parse_implies(&mut self) -> Result<AstNode, ParseError> {
        let left = self.parse_or()?;
        if self.current_kind() == TokenKind::Implies {
            let position = self.current_position();
            self.advance()?;
            self.set_primary_context(PrimaryContext::BinaryRhs);
            self.enter()?;
            let right = self.parse_implies();
            self.leave();
            return Ok(AstNode::Binary {
                op: BinaryOp::Implies,
                left: Box::new(left),
                right: Box::new(right?),
                position,
            });
        }
        Ok(left)
    }

    binary_level!(parse_or, parse_and, [
        TokenKind::Xor => BinaryOp::Xor,
        TokenKind::Or => BinaryOp::Or,
    ]);

    binary_level!(parse_and, parse_membership, [
        TokenKind::And => BinaryOp::And,
    ]);

    binary_level!(parse_membership, parse_equality, [
        TokenKind::In => BinaryOp::In,
        TokenKind::Contains => BinaryOp::Contains,
    ]);

    binary_level!(parse_equality, parse_comparison, [
        TokenKind::Equals => BinaryOp::Eq,
        TokenKind::NotEquals => BinaryOp::Ne,
        TokenKind::Equivalence => BinaryOp::Equivalent,
        TokenKind::NotEquivalence => BinaryOp::NotEquivalent,
    ]);

    binary_level!(parse_comparison, parse_type_op, [
        TokenKind::LessThan => BinaryOp::Lt,
        TokenKind::LessEquals => BinaryOp::Le,
        TokenKind::GreaterThan => BinaryOp::Gt,
        TokenKind::GreaterEquals => BinaryOp::Ge,
    ]);

    /// `is`/`as`, tier 6 — mixfix: the right-hand side is a qualified type
    /// name, not a sub-expression, so it can't be generated by `binary_level!`.
    fn parse_type_op(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.parse_union()?;
        loop {
            let make_is = match self.current_kind() {
                TokenKind::Is => true,
                TokenKind::As => false,
                _ => break,
            };
            let position = self.current_position();
            self.advance()?;
            let target_type = self.parse_qualified_type_specifier()?;
            left = if make_is {
                AstNode::Is {
                    expression: Box::new(left),
                    target_type,
                    position,
                }
            } else {
                AstNode::As {
                    expression: Box::new(left),
                    target_type,
                    position,
                }
            };
        }
        Ok(left)
    }

    binary_level!(parse_union, parse_additive, [
        TokenKind::Pipe => BinaryOp::Union,
    ]);

    binary_level!(parse_additive, parse_multiplicative, [
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Amp => BinaryOp::Concat,
    ]);

    binary_level!(parse_multiplicative, parse_unary, [
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Div => BinaryOp::IntDiv,
        TokenKind::Mod => BinaryOp::Mod,
    ]);

    /// A dot-joined chain of one or more identifier-or-keyword segments
    /// (`FHIR.Observation`, `System.String`, ...), used after `is`/`as`.
    fn parse_qualified_type_specifier(&mut self) -> Result<String, ParseError> {
        let mut segments = vec![self.expect_type_segment()?];
        while self.current_kind() == TokenKind::Dot {
            self.advance()?;
            segments.push(self.expect_type_segment()?);
        }
        Ok(segments.join("."))
    }

    fn expect_type_segment(&mut self) -> Result<String, ParseError> {
        let current = self.current_token();
        match token_identifier_text(current) {
            Some(text) => {
                let text = text.to_string();
                self.advance()?;
                Ok(text)
            }
            None => Err(expected_type_specifier(self.current_position(), self.source())),
        }
    }
}
