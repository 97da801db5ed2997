//! file: src/ast/kind.rs
//! description: AST node kind definitions and operator enums.
//!
//! Defines `AstNodeKind` along with `BinaryOperator` and `UnaryOperator`,
//! plus the typed sequence elements (`Param`, `StructField`,
//! `StructInitField`, `MatchCase`) that declaration and expression nodes
//! carry. Every concept gets its own variant or type; parameters and
//! struct-init fields are never encoded by reusing the Variable or
//! Assignment variants.

use super::node::AstNode;
use super::types::TypeDescriptor;

/// Represents binary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Eq,  // ==
    Ne,  // !=
    Lt,  // <
    Le,  // <=
    Gt,  // >
    Ge,  // >=
    And, // &&
    Or,  // ||
}

/// Represents unary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not, // !
    Neg, // -
}

/// `let` vs `const` on a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Let,
    Const,
}

/// A declared function parameter. Parameters form their own typed list on
/// Function and AnonymousFunction nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeDescriptor>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Option<TypeDescriptor>) -> Self {
        Param { name: name.into(), ty }
    }
}

/// A field in a struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        StructField { name: name.into(), ty }
    }
}

/// One entry in a struct initialization expression, in written order. A
/// spread entry inlines another struct-init's fields at its position.
#[derive(Debug, Clone, PartialEq)]
pub enum StructInitField {
    Field { name: String, value: AstNode },
    Spread { expr: AstNode },
}

/// One arm of a match statement. `pattern` is a literal, a BindingPattern
/// or a Wildcard node; `guard` is an optional boolean expression ANDed
/// into the arm's condition.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: AstNode,
    pub guard: Option<AstNode>,
    pub body: AstNode,
}

impl MatchCase {
    pub fn new(pattern: AstNode, guard: Option<AstNode>, body: AstNode) -> Self {
        MatchCase { pattern, guard, body }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstNodeKind {
    Program { declarations: Vec<AstNode> },

    Function {
        name: String,
        params: Vec<Param>,
        return_type: Option<TypeDescriptor>,
        guard: Option<Box<AstNode>>,
        body: Box<AstNode>,
        is_async: bool,
    },
    Variable {
        var_kind: VarKind,
        name: String,
        ty: Option<TypeDescriptor>,
        initializer: Option<Box<AstNode>>,
    },
    Struct {
        name: String,
        composition: Vec<String>,
        fields: Vec<StructField>,
    },
    TypeAlias { name: String, ty: TypeDescriptor },
    Import { module: String },

    Compound { statements: Vec<AstNode> },
    If {
        condition: Box<AstNode>,
        true_branch: Box<AstNode>,
        false_branch: Option<Box<AstNode>>,
    },
    Match { scrutinee: Box<AstNode>, cases: Vec<MatchCase> },
    Return { value: Option<Box<AstNode>> },
    CStyleFor {
        initializer: Option<Box<AstNode>>,
        condition: Option<Box<AstNode>>,
        incrementer: Option<Box<AstNode>>,
        body: Box<AstNode>,
    },
    ForIn {
        variable: Param,
        iterable: Box<AstNode>,
        body: Box<AstNode>,
    },
    ForMap {
        key: Param,
        value: Param,
        map: Box<AstNode>,
        body: Box<AstNode>,
    },
    While { condition: Box<AstNode>, body: Box<AstNode> },

    BinaryOp {
        op: BinaryOperator,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    UnaryOp { op: UnaryOperator, operand: Box<AstNode> },
    Assignment { name: String, value: Box<AstNode> },
    Call { name: String, args: Vec<AstNode> },
    MemberAccess { object: Box<AstNode>, member: String },
    StructInit { fields: Vec<StructInitField> },
    Pipe { left: Box<AstNode>, right: Box<AstNode> },
    Range { start: Box<AstNode>, end: Box<AstNode> },

    IntLiteral { value: i64 },
    FloatLiteral { value: f64 },
    StringLiteral { value: String },
    BoolLiteral { value: bool },
    ArrayLiteral { elements: Vec<AstNode> },
    Identifier { name: String },

    BindingPattern { name: String, ty: Option<TypeDescriptor> },
    Wildcard,

    AnonymousFunction {
        params: Vec<Param>,
        return_type: Option<TypeDescriptor>,
        body: Box<AstNode>,
    },
    PromiseThen { promise: Box<AstNode>, handler: Box<AstNode> },
    PromiseCatch { promise: Box<AstNode>, handler: Box<AstNode> },
    PromiseFinally { promise: Box<AstNode>, handler: Box<AstNode> },
    PromiseAll { promises: Vec<AstNode> },
    Await { promise: Box<AstNode> },
}

impl AstNodeKind {
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            AstNodeKind::BinaryOp { .. }
                | AstNodeKind::UnaryOp { .. }
                | AstNodeKind::Assignment { .. }
                | AstNodeKind::Call { .. }
                | AstNodeKind::MemberAccess { .. }
                | AstNodeKind::StructInit { .. }
                | AstNodeKind::Pipe { .. }
                | AstNodeKind::Range { .. }
                | AstNodeKind::IntLiteral { .. }
                | AstNodeKind::FloatLiteral { .. }
                | AstNodeKind::StringLiteral { .. }
                | AstNodeKind::BoolLiteral { .. }
                | AstNodeKind::ArrayLiteral { .. }
                | AstNodeKind::Identifier { .. }
                | AstNodeKind::AnonymousFunction { .. }
                | AstNodeKind::PromiseThen { .. }
                | AstNodeKind::PromiseCatch { .. }
                | AstNodeKind::PromiseFinally { .. }
                | AstNodeKind::PromiseAll { .. }
                | AstNodeKind::Await { .. }
        )
    }

    /// True for the literal kinds a match arm may use as a pattern.
    pub fn is_literal_pattern(&self) -> bool {
        matches!(
            self,
            AstNodeKind::IntLiteral { .. }
                | AstNodeKind::FloatLiteral { .. }
                | AstNodeKind::StringLiteral { .. }
                | AstNodeKind::BoolLiteral { .. }
        )
    }
}

use std::fmt;

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AstNodeKind::Program { .. } => "Program",
            AstNodeKind::Function { .. } => "Function",
            AstNodeKind::Variable { .. } => "Variable",
            AstNodeKind::Struct { .. } => "Struct",
            AstNodeKind::TypeAlias { .. } => "TypeAlias",
            AstNodeKind::Import { .. } => "Import",
            AstNodeKind::Compound { .. } => "Compound",
            AstNodeKind::If { .. } => "If",
            AstNodeKind::Match { .. } => "Match",
            AstNodeKind::Return { .. } => "Return",
            AstNodeKind::CStyleFor { .. } => "CStyleFor",
            AstNodeKind::ForIn { .. } => "ForIn",
            AstNodeKind::ForMap { .. } => "ForMap",
            AstNodeKind::While { .. } => "While",
            AstNodeKind::BinaryOp { .. } => "BinaryOp",
            AstNodeKind::UnaryOp { .. } => "UnaryOp",
            AstNodeKind::Assignment { .. } => "Assignment",
            AstNodeKind::Call { .. } => "Call",
            AstNodeKind::MemberAccess { .. } => "MemberAccess",
            AstNodeKind::StructInit { .. } => "StructInit",
            AstNodeKind::Pipe { .. } => "Pipe",
            AstNodeKind::Range { .. } => "Range",
            AstNodeKind::IntLiteral { .. } => "IntLiteral",
            AstNodeKind::FloatLiteral { .. } => "FloatLiteral",
            AstNodeKind::StringLiteral { .. } => "StringLiteral",
            AstNodeKind::BoolLiteral { .. } => "BoolLiteral",
            AstNodeKind::ArrayLiteral { .. } => "ArrayLiteral",
            AstNodeKind::Identifier { .. } => "Identifier",
            AstNodeKind::BindingPattern { .. } => "BindingPattern",
            AstNodeKind::Wildcard => "Wildcard",
            AstNodeKind::AnonymousFunction { .. } => "AnonymousFunction",
            AstNodeKind::PromiseThen { .. } => "PromiseThen",
            AstNodeKind::PromiseCatch { .. } => "PromiseCatch",
            AstNodeKind::PromiseFinally { .. } => "PromiseFinally",
            AstNodeKind::PromiseAll { .. } => "PromiseAll",
            AstNodeKind::Await { .. } => "Await",
        };
        write!(f, "{}", name)
    }
}
