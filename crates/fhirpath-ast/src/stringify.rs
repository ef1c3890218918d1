//! `astToString` — a deterministic, source-equivalent stringifier (spec §4.4).
//!
//! Binary and type-test (`is`/`as`) nodes parenthesize themselves; dots,
//! indexers, and function calls do not. This asymmetry matches spec §4.4
//! exactly and is what lets round-tripped output reparse to a structurally
//! equal tree (spec §8, law 1) even though the added parentheses mean the
//! text itself isn't byte-identical.

use crate::node::{AstNode, LiteralType};

/// The reserved keyword-shaped words the tokenizer reclassifies away from
/// plain identifiers (mirrors `fhirpath_lexer`'s keyword table — duplicated
/// here rather than depending on the lexer crate just for this list).
const RESERVED_WORDS: &[&str] = &[
    "and", "or", "xor", "implies", "div", "mod", "in", "contains", "is", "as", "not", "true",
    "false",
];

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Renders `name` as it must appear in source to reparse back to the same
/// `Identifier` node: bare if it's a simple, non-reserved word, backtick
/// quoted otherwise.
fn render_identifier(name: &str) -> String {
    if is_plain_identifier(name) && !RESERVED_WORDS.contains(&name) {
        name.to_string()
    } else {
        let escaped = name.replace('`', "``");
        format!("`{escaped}`")
    }
}

fn render_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Produces source-equivalent text for `node` (spec §4.4).
pub fn ast_to_string(node: &AstNode) -> String {
    match node {
        AstNode::Literal { data_type, value, .. } => match data_type {
            LiteralType::String => render_string_literal(value),
            LiteralType::Long => format!("{value}L"),
            LiteralType::Date | LiteralType::DateTime => format!("@{value}"),
            LiteralType::Time => format!("@{value}"),
            LiteralType::Number | LiteralType::Boolean | LiteralType::Quantity => value.clone(),
        },
        AstNode::Null { .. } => "{}".to_string(),
        AstNode::Identifier { name, .. } => render_identifier(name),
        AstNode::Variable { name, .. } => format!("${name}"),
        AstNode::EnvVariable { name, .. } => format!("%{name}"),
        AstNode::Unary { op, operand, .. } => format!("{}{}", op.as_str(), ast_to_string(operand)),
        AstNode::Binary { op, left, right, .. } => {
            format!("({} {} {})", ast_to_string(left), op, ast_to_string(right))
        }
        AstNode::Dot { left, right, .. } => format!("{}.{}", ast_to_string(left), ast_to_string(right)),
        AstNode::Indexer { expression, index, .. } => {
            format!("{}[{}]", ast_to_string(expression), ast_to_string(index))
        }
        AstNode::Function { name, args, .. } => {
            let rendered_args: Vec<String> = args.iter().map(ast_to_string).collect();
            format!("{}({})", render_identifier(name), rendered_args.join(", "))
        }
        AstNode::Is { expression, target_type, .. } => {
            format!("({} is {})", ast_to_string(expression), target_type)
        }
        AstNode::As { expression, target_type, .. } => {
            format!("({} as {})", ast_to_string(expression), target_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BinaryOp, UnaryOp};
    use fhirpath_ir::Position;
    use pretty_assertions::assert_eq;

    fn ident(name: &str) -> AstNode {
        AstNode::Identifier {
            name: name.to_string(),
            position: Position::START,
        }
    }

    #[test]
    fn dot_chain_has_no_parens() {
        let ast = AstNode::Dot {
            left: Box::new(AstNode::Dot {
                left: Box::new(ident("Patient")),
                right: Box::new(ident("name")),
                position: Position::START,
            }),
            right: Box::new(ident("given")),
            position: Position::START,
        };
        assert_eq!(ast_to_string(&ast), "Patient.name.given");
    }

    #[test]
    fn binary_is_parenthesized() {
        let ast = AstNode::Binary {
            op: BinaryOp::Add,
            left: Box::new(AstNode::Literal {
                data_type: LiteralType::Number,
                value: "1".to_string(),
                position: Position::START,
            }),
            right: Box::new(AstNode::Literal {
                data_type: LiteralType::Number,
                value: "2".to_string(),
                position: Position::START,
            }),
            position: Position::START,
        };
        assert_eq!(ast_to_string(&ast), "(1 + 2)");
    }

    #[test]
    fn is_is_parenthesized() {
        let ast = AstNode::Is {
            expression: Box::new(ident("value")),
            target_type: "FHIR.Observation".to_string(),
            position: Position::START,
        };
        assert_eq!(ast_to_string(&ast), "(value is FHIR.Observation)");
    }

    #[test]
    fn keyword_shaped_identifier_is_backtick_quoted() {
        let ast = ident("is");
        assert_eq!(ast_to_string(&ast), "`is`");
    }

    #[test]
    fn unary_not_keeps_its_trailing_space() {
        let ast = AstNode::Unary {
            op: UnaryOp::Not,
            operand: Box::new(ident("done")),
            position: Position::START,
        };
        assert_eq!(ast_to_string(&ast), "not done");
    }

    #[test]
    fn quantity_and_long_round_trip_surface_form() {
        let quantity = AstNode::Literal {
            data_type: LiteralType::Quantity,
            value: "5 'mg'".to_string(),
            position: Position::START,
        };
        assert_eq!(ast_to_string(&quantity), "5 'mg'");

        let long = AstNode::Literal {
            data_type: LiteralType::Long,
            value: "12345".to_string(),
            position: Position::START,
        };
        assert_eq!(ast_to_string(&long), "12345L");
    }
}
