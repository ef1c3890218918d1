//! The FHIRPath abstract syntax tree (spec §3.3).
//!
//! A plain tagged sum type, matched exhaustively everywhere it's consumed —
//! no open-ended visitor hierarchy (spec §9 "Dynamic dispatch over AST
//! kinds"). Every node carries the [`Position`] of its first token.

use fhirpath_ir::Position;
use std::fmt;

/// The literal-value kinds a `Literal` node can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralType {
    Number,
    Long,
    String,
    Boolean,
    Date,
    DateTime,
    Time,
    Quantity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

impl UnaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "not ",
        }
    }
}

/// All infix operators (spec §4.2 precedence table), as a single flat enum —
/// the precedence ladder lives in the parser, not in the node shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    IntDiv,
    Mod,
    Add,
    Sub,
    Concat,
    Union,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Equivalent,
    NotEquivalent,
    In,
    Contains,
    And,
    Xor,
    Or,
    Implies,
}

impl BinaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::IntDiv => "div",
            BinaryOp::Mod => "mod",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Concat => "&",
            BinaryOp::Union => "|",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Equivalent => "~",
            BinaryOp::NotEquivalent => "!~",
            BinaryOp::In => "in",
            BinaryOp::Contains => "contains",
            BinaryOp::And => "and",
            BinaryOp::Xor => "xor",
            BinaryOp::Or => "or",
            BinaryOp::Implies => "implies",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A FHIRPath AST node.
#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    Literal {
        data_type: LiteralType,
        value: String,
        position: Position,
    },
    /// The `{}` empty-collection literal.
    Null {
        position: Position,
    },
    Identifier {
        name: String,
        position: Position,
    },
    /// `$this`, `$index`, `$total`, ... — `name` is the bare word.
    Variable {
        name: String,
        position: Position,
    },
    /// `%resource`, `%ucum`, or a quoted form; `name` preserves the original
    /// surrounding quotes for the quoted case.
    EnvVariable {
        name: String,
        position: Position,
    },
    Unary {
        op: UnaryOp,
        operand: Box<AstNode>,
        position: Position,
    },
    Binary {
        op: BinaryOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        position: Position,
    },
    /// `a.b`; `right` is always `Identifier` or `Function`.
    Dot {
        left: Box<AstNode>,
        right: Box<AstNode>,
        position: Position,
    },
    /// `a[i]`.
    Indexer {
        expression: Box<AstNode>,
        index: Box<AstNode>,
        position: Position,
    },
    Function {
        name: String,
        args: Vec<AstNode>,
        position: Position,
    },
    /// `expression is targetType`, `targetType` a dot-joined qualified name.
    Is {
        expression: Box<AstNode>,
        target_type: String,
        position: Position,
    },
    /// `expression as targetType`.
    As {
        expression: Box<AstNode>,
        target_type: String,
        position: Position,
    },
}

impl AstNode {
    /// The source position of this node's first token.
    pub fn position(&self) -> Position {
        match self {
            AstNode::Literal { position, .. }
            | AstNode::Null { position }
            | AstNode::Identifier { position, .. }
            | AstNode::Variable { position, .. }
            | AstNode::EnvVariable { position, .. }
            | AstNode::Unary { position, .. }
            | AstNode::Binary { position, .. }
            | AstNode::Dot { position, .. }
            | AstNode::Indexer { position, .. }
            | AstNode::Function { position, .. }
            | AstNode::Is { position, .. }
            | AstNode::As { position, .. } => *position,
        }
    }

    /// A short label for the node's kind, used by `prettyPrint` and in
    /// diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            AstNode::Literal { .. } => "Literal",
            AstNode::Null { .. } => "Null",
            AstNode::Identifier { .. } => "Identifier",
            AstNode::Variable { .. } => "Variable",
            AstNode::EnvVariable { .. } => "EnvVariable",
            AstNode::Unary { .. } => "Unary",
            AstNode::Binary { .. } => "Binary",
            AstNode::Dot { .. } => "Dot",
            AstNode::Indexer { .. } => "Indexer",
            AstNode::Function { .. } => "Function",
            AstNode::Is { .. } => "Is",
            AstNode::As { .. } => "As",
        }
    }
}

/// Structural equality ignoring source [`Position`] — the comparison spec
/// §8's universal laws mean by "structurally equal" (round-tripping through
/// `astToString` reparses to equivalent shape at different source offsets).
pub fn structural_eq(a: &AstNode, b: &AstNode) -> bool {
    use AstNode::*;
    match (a, b) {
        (Literal { data_type: dt1, value: v1, .. }, Literal { data_type: dt2, value: v2, .. }) => {
            dt1 == dt2 && v1 == v2
        }
        (Null { .. }, Null { .. }) => true,
        (Identifier { name: n1, .. }, Identifier { name: n2, .. }) => n1 == n2,
        (Variable { name: n1, .. }, Variable { name: n2, .. }) => n1 == n2,
        (EnvVariable { name: n1, .. }, EnvVariable { name: n2, .. }) => n1 == n2,
        (Unary { op: op1, operand: o1, .. }, Unary { op: op2, operand: o2, .. }) => {
            op1 == op2 && structural_eq(o1, o2)
        }
        (Binary { op: op1, left: l1, right: r1, .. }, Binary { op: op2, left: l2, right: r2, .. }) => {
            op1 == op2 && structural_eq(l1, l2) && structural_eq(r1, r2)
        }
        (Dot { left: l1, right: r1, .. }, Dot { left: l2, right: r2, .. }) => {
            structural_eq(l1, l2) && structural_eq(r1, r2)
        }
        (
            Indexer { expression: e1, index: i1, .. },
            Indexer { expression: e2, index: i2, .. },
        ) => structural_eq(e1, e2) && structural_eq(i1, i2),
        (Function { name: n1, args: a1, .. }, Function { name: n2, args: a2, .. }) => {
            n1 == n2
                && a1.len() == a2.len()
                && a1.iter().zip(a2.iter()).all(|(x, y)| structural_eq(x, y))
        }
        (
            Is { expression: e1, target_type: t1, .. },
            Is { expression: e2, target_type: t2, .. },
        ) => t1 == t2 && structural_eq(e1, e2),
        (
            As { expression: e1, target_type: t1, .. },
            As { expression: e2, target_type: t2, .. },
        ) => t1 == t2 && structural_eq(e1, e2),
        _ => false,
    }
}
