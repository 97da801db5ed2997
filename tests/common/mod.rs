//! Shared AST builders for the lowering tests. The front end that would
//! normally produce these trees is outside the crate, so tests construct
//! them directly.

#![allow(dead_code)]

use rill_core::ast::{
    AstNode, AstNodeKind, BinaryOperator, MatchCase, Param, StructInitField, TypeDescriptor,
    VarKind,
};

pub fn program(declarations: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Program { declarations })
}

pub fn int(value: i64) -> AstNode {
    AstNode::new(AstNodeKind::IntLiteral { value })
}

pub fn float(value: f64) -> AstNode {
    AstNode::new(AstNodeKind::FloatLiteral { value })
}

pub fn string(value: &str) -> AstNode {
    AstNode::new(AstNodeKind::StringLiteral {
        value: value.to_string(),
    })
}

pub fn boolean(value: bool) -> AstNode {
    AstNode::new(AstNodeKind::BoolLiteral { value })
}

pub fn ident(name: &str) -> AstNode {
    AstNode::new(AstNodeKind::Identifier {
        name: name.to_string(),
    })
}

pub fn binop(op: BinaryOperator, left: AstNode, right: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn call(name: &str, args: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Call {
        name: name.to_string(),
        args,
    })
}

pub fn ret(value: Option<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Return {
        value: value.map(Box::new),
    })
}

pub fn compound(statements: Vec<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Compound { statements })
}

pub fn param(name: &str, ty: TypeDescriptor) -> Param {
    Param::new(name, Some(ty))
}

pub fn function(
    name: &str,
    params: Vec<Param>,
    return_type: Option<TypeDescriptor>,
    body: AstNode,
) -> AstNode {
    AstNode::new(AstNodeKind::Function {
        name: name.to_string(),
        params,
        return_type,
        guard: None,
        body: Box::new(body),
        is_async: false,
    })
}

pub fn guarded_function(
    name: &str,
    params: Vec<Param>,
    return_type: Option<TypeDescriptor>,
    guard: AstNode,
    body: AstNode,
) -> AstNode {
    AstNode::new(AstNodeKind::Function {
        name: name.to_string(),
        params,
        return_type,
        guard: Some(Box::new(guard)),
        body: Box::new(body),
        is_async: false,
    })
}

pub fn async_function(
    name: &str,
    params: Vec<Param>,
    return_type: Option<TypeDescriptor>,
    body: AstNode,
) -> AstNode {
    AstNode::new(AstNodeKind::Function {
        name: name.to_string(),
        params,
        return_type,
        guard: None,
        body: Box::new(body),
        is_async: true,
    })
}

pub fn let_var(name: &str, ty: Option<TypeDescriptor>, initializer: Option<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Variable {
        var_kind: VarKind::Let,
        name: name.to_string(),
        ty,
        initializer: initializer.map(Box::new),
    })
}

pub fn const_var(name: &str, ty: Option<TypeDescriptor>, initializer: Option<AstNode>) -> AstNode {
    AstNode::new(AstNodeKind::Variable {
        var_kind: VarKind::Const,
        name: name.to_string(),
        ty,
        initializer: initializer.map(Box::new),
    })
}

pub fn anon_fn(params: Vec<Param>, return_type: Option<TypeDescriptor>, body: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::AnonymousFunction {
        params,
        return_type,
        body: Box::new(body),
    })
}

pub fn match_stmt(scrutinee: AstNode, cases: Vec<MatchCase>) -> AstNode {
    AstNode::new(AstNodeKind::Match {
        scrutinee: Box::new(scrutinee),
        cases,
    })
}

pub fn case(pattern: AstNode, body: AstNode) -> MatchCase {
    MatchCase::new(pattern, None, body)
}

pub fn guarded_case(pattern: AstNode, guard: AstNode, body: AstNode) -> MatchCase {
    MatchCase::new(pattern, Some(guard), body)
}

pub fn wildcard() -> AstNode {
    AstNode::new(AstNodeKind::Wildcard)
}

pub fn binding(name: &str, ty: Option<TypeDescriptor>) -> AstNode {
    AstNode::new(AstNodeKind::BindingPattern {
        name: name.to_string(),
        ty,
    })
}

pub fn range(start: AstNode, end: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::Range {
        start: Box::new(start),
        end: Box::new(end),
    })
}

pub fn for_in(variable: Param, iterable: AstNode, body: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::ForIn {
        variable,
        iterable: Box::new(iterable),
        body: Box::new(body),
    })
}

pub fn struct_init(fields: Vec<StructInitField>) -> AstNode {
    AstNode::new(AstNodeKind::StructInit { fields })
}

pub fn init_field(name: &str, value: AstNode) -> StructInitField {
    StructInitField::Field {
        name: name.to_string(),
        value,
    }
}

pub fn init_spread(expr: AstNode) -> StructInitField {
    StructInitField::Spread { expr }
}

pub fn pipe(left: AstNode, right: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::Pipe {
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Lowers a program and panics on the fatal-error path, which none of
/// these tests expect to hit.
pub fn lower(program: AstNode) -> rill_core::CModule {
    rill_core::lower_ast_to_c(&program).expect("lowering should succeed")
}

/// Index of `needle` in `haystack`, asserting it is present.
pub fn offset_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("expected {:?} in lowered output:\n{}", needle, haystack))
}
