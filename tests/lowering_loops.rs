mod common;

use common::*;
use rill_core::ast::{AstNode, AstNodeKind, BinaryOperator, Param, TypeDescriptor, UnaryOperator};

fn say(arg: AstNode) -> AstNode {
    call("say", vec![arg])
}

#[test]
fn range_for_in_is_end_exclusive() {
    let program = program(vec![function(
        "count",
        vec![],
        None,
        compound(vec![for_in(
            Param::new("x", None),
            range(int(0), int(3)),
            compound(vec![say(ident("x"))]),
        )]),
    )]);

    let module = lower(program);
    let code = &module.code;

    // Bounds are decided once, at loop entry.
    offset_of(code, "int __range_start_0 = 0;");
    offset_of(code, "int __range_end_0 = 3;");
    // Strictly-less-than bound: iterates {0, 1, 2}, never 3.
    offset_of(code, "for (int x = __range_start_0; x < __range_end_0; x++) {");
    assert!(!code.contains("x <= __range_end_0"));
}

#[test]
fn range_bounds_are_expressions_evaluated_at_entry() {
    let program = program(vec![function(
        "spread_out",
        vec![param("limit", TypeDescriptor::int())],
        None,
        compound(vec![for_in(
            Param::new("i", None),
            range(int(1), binop(BinaryOperator::Mul, ident("limit"), int(2))),
            compound(vec![say(ident("i"))]),
        )]),
    )]);

    let module = lower(program);
    offset_of(&module.code, "int __range_end_0 = (limit * 2);");
}

#[test]
fn array_for_in_goes_through_the_iteration_capability() {
    let program = program(vec![function(
        "walk",
        vec![param(
            "items",
            TypeDescriptor::array(TypeDescriptor::string()),
        )],
        None,
        compound(vec![for_in(
            param("item", TypeDescriptor::string()),
            ident("items"),
            compound(vec![say(ident("item"))]),
        )]),
    )]);

    let module = lower(program);
    let code = &module.code;

    offset_of(code, "void* __arr_0 = items;");
    offset_of(code, "int __len_0 = rl_length(__arr_0);");
    offset_of(code, "for (int __i_0 = 0; __i_0 < __len_0; __i_0++) {");
    // Fetch-and-bind per iteration, cast to the declared element type.
    offset_of(code, "char* item = (char*)rl_get(__arr_0, __i_0);");
}

#[test]
fn map_for_in_uses_the_key_value_capability() {
    let key = param("k", TypeDescriptor::string());
    let value = param("v", TypeDescriptor::int());
    let body = compound(vec![say(ident("k"))]);
    let loop_stmt = AstNode::new(AstNodeKind::ForMap {
        key,
        value,
        map: Box::new(ident("scores")),
        body: Box::new(body),
    });
    let program = program(vec![function(
        "tally",
        vec![param(
            "scores",
            TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::int()),
        )],
        None,
        compound(vec![loop_stmt]),
    )]);

    let module = lower(program);
    let code = &module.code;

    offset_of(code, "void* __map_0 = scores;");
    offset_of(code, "void* __iter_0 = rl_map_iterator(__map_0);");
    offset_of(code, "char* k = (char*)rl_map_next_key(__iter_0);");
    offset_of(code, "int v = (int)rl_map_value_for(__iter_0);");
}

#[test]
fn while_lowers_directly() {
    let body = compound(vec![say(ident("n"))]);
    let loop_stmt = AstNode::new(AstNodeKind::While {
        condition: Box::new(binop(BinaryOperator::Gt, ident("n"), int(0))),
        body: Box::new(body),
    });
    let program = program(vec![function(
        "drain",
        vec![param("n", TypeDescriptor::int())],
        None,
        compound(vec![loop_stmt]),
    )]);

    let module = lower(program);
    offset_of(&module.code, "while ((n > 0)) {");
}

#[test]
fn c_style_for_lowers_header_inline() {
    let init = let_var("i", Some(TypeDescriptor::int()), Some(int(0)));
    let cond = binop(BinaryOperator::Lt, ident("i"), int(10));
    let inc = AstNode::new(AstNodeKind::Assignment {
        name: "i".to_string(),
        value: Box::new(binop(BinaryOperator::Add, ident("i"), int(1))),
    });
    let loop_stmt = AstNode::new(AstNodeKind::CStyleFor {
        initializer: Some(Box::new(init)),
        condition: Some(Box::new(cond)),
        incrementer: Some(Box::new(inc)),
        body: Box::new(compound(vec![say(ident("i"))])),
    });
    let program = program(vec![function("steps", vec![], None, compound(vec![loop_stmt]))]);

    let module = lower(program);
    offset_of(&module.code, "for (int i = 0; (i < 10); i = (i + 1)) {");
}

#[test]
fn unsupported_iterable_degrades_with_a_diagnostic() {
    let program = program(vec![function(
        "odd",
        vec![],
        None,
        compound(vec![for_in(
            Param::new("x", None),
            AstNode::new(AstNodeKind::UnaryOp {
                op: UnaryOperator::Neg,
                operand: Box::new(int(1)),
            }),
            compound(vec![]),
        )]),
    )]);

    let module = lower(program);
    offset_of(&module.code, "/* unsupported iterable */");
    assert_eq!(module.warning_count(), 1);
}
