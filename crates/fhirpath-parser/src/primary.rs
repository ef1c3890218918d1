//! Prefix (`parsePrimary`), unary, and postfix dispatch (spec §4.2 tiers 1-2
//! plus the mixfix `[]`/function-call/member-access forms).

use crate::Parser;
use fhirpath_ast::{AstNode, LiteralType, UnaryOp};
use fhirpath_diagnostic::{
    expected_closing_bracket, expected_closing_paren, expected_expression_in_indexer,
    expected_identifier_after_dot, invalid_date_format, unexpected_after_binary_operator,
    unexpected_in_expression, unexpected_in_function_args, unexpected_in_indexer, ParseError,
};
use fhirpath_ir::{token_identifier_text, Position, TokenKind};
use fhirpath_lexer::{is_valid_date, is_valid_datetime, is_valid_time};

/// Which of spec §4.3's dictionary messages a failed [`Parser::parse_primary`]
/// call should raise. Threading a context parameter through every precedence
/// tier would mean touching all twelve ladder functions for one detail, so
/// instead the call site that's about to require a primary (binary RHS,
/// indexer contents) sets this one-shot flag via [`Parser::set_primary_context`];
/// the very next `parse_primary` call consumes it and resets it back to
/// `Expression`. The function-args dictionary message doesn't need this: it's
/// raised directly by [`Parser::parse_call_args`] at the post-argument
/// comma/`)` check, which already knows it's in that context (spec table row
/// 7 expects the plain `Expression` wording for a failed *first* argument,
/// same as any other primary-position failure).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum PrimaryContext {
    #[default]
    Expression,
    BinaryRhs,
    Indexer,
}

impl<'a> Parser<'a> {
    /// Tier 2: prefix `+`, `-`, `not`. Binds looser than postfix, so `-a.b`
    /// parses as `-(a.b)` — the operand recurses through the postfix tier,
    /// not the other way around.
    pub(crate) fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Not => Some(UnaryOp::Not),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix();
        };
        let position = self.current_position();
        self.advance()?;
        self.enter()?;
        let operand = self.parse_unary();
        self.leave();
        Ok(AstNode::Unary {
            op,
            operand: Box::new(operand?),
            position,
        })
    }

    /// Tier 1: a primary expression followed by zero or more `.member`,
    /// `.call(...)`, or `[index]` postfixes.
    fn parse_postfix(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance()?;
                    let right = self.parse_dot_rhs()?;
                    let position = expr.position();
                    expr = AstNode::Dot {
                        left: Box::new(expr),
                        right: Box::new(right),
                        position,
                    };
                }
                TokenKind::LBracket => {
                    let position = self.current_position();
                    self.advance()?;
                    if self.current_kind() == TokenKind::RBracket {
                        return Err(expected_expression_in_indexer(self.current_position(), self.source()));
                    }
                    self.set_primary_context(PrimaryContext::Indexer);
                    let index = self.parse_expr()?;
                    if self.current_kind() != TokenKind::RBracket {
                        return Err(expected_closing_bracket(self.current_position(), self.source()));
                    }
                    self.advance()?;
                    expr = AstNode::Indexer {
                        expression: Box::new(expr),
                        index: Box::new(index),
                        position,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// The right-hand side of a `.`: an identifier, a keyword-shaped
    /// identifier, or a function call — never a number, string, or anything
    /// else (spec §4.2 "Expected identifier after dot").
    fn parse_dot_rhs(&mut self) -> Result<AstNode, ParseError> {
        let position = self.current_position();
        let Some(name) = token_identifier_text(self.current_token()).map(str::to_string) else {
            return Err(expected_identifier_after_dot(position, self.source()));
        };
        self.advance()?;
        if self.current_kind() == TokenKind::LParen {
            let args = self.parse_call_args()?;
            Ok(AstNode::Function { name, args, position })
        } else {
            Ok(AstNode::Identifier { name, position })
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<AstNode>, ParseError> {
        self.advance()?; // consume '('
        let mut args = Vec::new();
        if self.current_kind() == TokenKind::RParen {
            self.advance()?;
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.current_kind() {
                TokenKind::Comma => {
                    self.advance()?;
                }
                TokenKind::RParen => {
                    self.advance()?;
                    break;
                }
                _ => return Err(unexpected_in_function_args(self.current_position(), self.source())),
            }
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let context = self.take_primary_context();
        let position = self.current_position();
        match self.current_kind() {
            TokenKind::Number => self.literal(LiteralType::Number, position),
            TokenKind::LongNumber => self.literal(LiteralType::Long, position),
            TokenKind::String => self.literal(LiteralType::String, position),
            TokenKind::Boolean => self.literal(LiteralType::Boolean, position),
            TokenKind::Quantity => self.literal(LiteralType::Quantity, position),
            TokenKind::Date => {
                let value = self.current_token().value.clone();
                if !is_valid_date(&value) {
                    return Err(invalid_date_format(position, self.source()));
                }
                self.advance()?;
                Ok(AstNode::Literal { data_type: LiteralType::Date, value, position })
            }
            TokenKind::DateTime => {
                let value = self.current_token().value.clone();
                if !is_valid_datetime(&value) {
                    return Err(invalid_date_format(position, self.source()));
                }
                self.advance()?;
                Ok(AstNode::Literal { data_type: LiteralType::DateTime, value, position })
            }
            TokenKind::Time => {
                let value = self.current_token().value.clone();
                if !is_valid_time(&value) {
                    return Err(invalid_date_format(position, self.source()));
                }
                self.advance()?;
                Ok(AstNode::Literal { data_type: LiteralType::Time, value, position })
            }
            TokenKind::LBrace => {
                self.advance()?;
                if self.current_kind() != TokenKind::RBrace {
                    return Err(unexpected_in_expression(self.current_position(), self.source()));
                }
                self.advance()?;
                Ok(AstNode::Null { position })
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                if self.current_kind() != TokenKind::RParen {
                    return Err(expected_closing_paren(self.current_position(), self.source()));
                }
                self.advance()?;
                Ok(inner)
            }
            TokenKind::Identifier => {
                let name = self.current_token().value.clone();
                self.advance()?;
                if self.current_kind() == TokenKind::LParen {
                    let args = self.parse_call_args()?;
                    Ok(AstNode::Function { name, args, position })
                } else {
                    Ok(AstNode::Identifier { name, position })
                }
            }
            TokenKind::QuotedIdentifier => {
                let name = self.current_token().value.clone();
                self.advance()?;
                Ok(AstNode::Identifier { name, position })
            }
            TokenKind::Variable => {
                let name = self.current_token().value.clone();
                self.advance()?;
                Ok(AstNode::Variable { name, position })
            }
            TokenKind::EnvVariable => {
                let name = self.current_token().value.clone();
                self.advance()?;
                Ok(AstNode::EnvVariable { name, position })
            }
            _ => Err(self.primary_error(context, position)),
        }
    }

    /// Picks the spec §4.3 dictionary message for a failed primary dispatch,
    /// honoring whatever [`PrimaryContext`] the caller set (or the default
    /// `Expression` context). This fires for `Eof` the same as any other
    /// unexpected token in primary position (spec §8 scenario 7: `Patient.name(`
    /// fails with the plain expression-context wording once the tokenizer
    /// reaches end of input looking for the call's first argument) — a
    /// distinct "ran out of input" message is only warranted for genuinely
    /// empty source, which `parse` checks before entering the ladder at all.
    fn primary_error(&self, context: PrimaryContext, position: Position) -> ParseError {
        match context {
            PrimaryContext::Expression => unexpected_in_expression(position, self.source()),
            PrimaryContext::BinaryRhs => unexpected_after_binary_operator(position, self.source()),
            PrimaryContext::Indexer => unexpected_in_indexer(position, self.source()),
        }
    }

    fn literal(&mut self, data_type: LiteralType, position: fhirpath_ir::Position) -> Result<AstNode, ParseError> {
        let value = self.current_token().value.clone();
        self.advance()?;
        Ok(AstNode::Literal { data_type, value, position })
    }
}
