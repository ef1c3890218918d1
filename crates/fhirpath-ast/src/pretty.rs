//! `prettyPrint` — a multi-line indented tree view (spec §4.4).
//!
//! Exposed for demo/debugging use; not used by the parser or by
//! `astToString`. Each line is indented by `depth * 2` spaces.

use crate::node::AstNode;

/// Renders `node` as an indented tree, starting at `depth`.
pub fn pretty_print(node: &AstNode, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    match node {
        AstNode::Literal { data_type, value, .. } => {
            format!("{indent}Literal({data_type:?}, {value:?})")
        }
        AstNode::Null { .. } => format!("{indent}Null"),
        AstNode::Identifier { name, .. } => format!("{indent}Identifier({name})"),
        AstNode::Variable { name, .. } => format!("{indent}Variable({name})"),
        AstNode::EnvVariable { name, .. } => format!("{indent}EnvVariable({name})"),
        AstNode::Unary { op, operand, .. } => {
            format!("{indent}Unary({op:?})\n{}", pretty_print(operand, depth + 1))
        }
        AstNode::Binary { op, left, right, .. } => format!(
            "{indent}Binary({op:?})\n{}\n{}",
            pretty_print(left, depth + 1),
            pretty_print(right, depth + 1)
        ),
        AstNode::Dot { left, right, .. } => format!(
            "{indent}Dot\n{}\n{}",
            pretty_print(left, depth + 1),
            pretty_print(right, depth + 1)
        ),
        AstNode::Indexer { expression, index, .. } => format!(
            "{indent}Indexer\n{}\n{}",
            pretty_print(expression, depth + 1),
            pretty_print(index, depth + 1)
        ),
        AstNode::Function { name, args, .. } => {
            let mut out = format!("{indent}Function({name})");
            for arg in args {
                out.push('\n');
                out.push_str(&pretty_print(arg, depth + 1));
            }
            out
        }
        AstNode::Is { expression, target_type, .. } => format!(
            "{indent}Is({target_type})\n{}",
            pretty_print(expression, depth + 1)
        ),
        AstNode::As { expression, target_type, .. } => format!(
            "{indent}As({target_type})\n{}",
            pretty_print(expression, depth + 1)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LiteralType;
    use fhirpath_ir::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn indents_children_by_two_spaces_per_depth() {
        let ast = AstNode::Dot {
            left: Box::new(AstNode::Identifier {
                name: "Patient".to_string(),
                position: Position::START,
            }),
            right: Box::new(AstNode::Identifier {
                name: "name".to_string(),
                position: Position::START,
            }),
            position: Position::START,
        };
        assert_eq!(
            pretty_print(&ast, 0),
            "Dot\n  Identifier(Patient)\n  Identifier(name)"
        );
    }

    #[test]
    fn literal_shows_type_and_value() {
        let ast = AstNode::Literal {
            data_type: LiteralType::Number,
            value: "42".to_string(),
            position: Position::START,
        };
        assert_eq!(pretty_print(&ast, 1), "  Literal(Number, \"42\")");
    }
}
