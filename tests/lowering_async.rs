mod common;

use common::*;
use rill_core::ast::{AstNode, AstNodeKind, BinaryOperator, TypeDescriptor};

fn promise_then(promise: AstNode, handler: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::PromiseThen {
        promise: Box::new(promise),
        handler: Box::new(handler),
    })
}

fn promise_catch(promise: AstNode, handler: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::PromiseCatch {
        promise: Box::new(promise),
        handler: Box::new(handler),
    })
}

fn promise_finally(promise: AstNode, handler: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::PromiseFinally {
        promise: Box::new(promise),
        handler: Box::new(handler),
    })
}

fn await_expr(promise: AstNode) -> AstNode {
    AstNode::new(AstNodeKind::Await {
        promise: Box::new(promise),
    })
}

#[test]
fn preamble_declares_the_promise_runtime_contract() {
    let module = lower(program(vec![]));
    let code = &module.code;

    // Forward declarations only; the runtime itself is external.
    offset_of(code, "typedef struct rl_promise rl_promise_t;");
    offset_of(code, "rl_promise_t* rl_promise_resolve(void* value);");
    offset_of(code, "rl_promise_t* rl_promise_then(rl_promise_t* promise, rl_handler_t handler);");
    offset_of(code, "void* rl_promise_await(rl_promise_t* promise);");
    offset_of(code, "rl_promise_t* rl_promise_all(rl_promise_t** promises, int count);");
    assert!(!code.contains("rl_promise_then(rl_promise_t* promise, rl_handler_t handler) {"));
}

#[test]
fn async_function_returns_a_task_handle_and_sets_the_flag() {
    // The in-async flag routes string concats through a resolve wrapper,
    // which is how the flag's effect is observable in the output.
    let program = program(vec![
        async_function(
            "fetch_greeting",
            vec![param("name", TypeDescriptor::string())],
            Some(TypeDescriptor::string()),
            compound(vec![ret(Some(binop(
                BinaryOperator::Add,
                string("hi "),
                ident("name"),
            )))]),
        ),
        function(
            "plain",
            vec![param("name", TypeDescriptor::string())],
            Some(TypeDescriptor::string()),
            compound(vec![ret(Some(binop(
                BinaryOperator::Add,
                string("hi "),
                ident("name"),
            )))]),
        ),
    ]);

    let module = lower(program);
    let code = &module.code;

    offset_of(code, "// Async function - returns a promise");
    offset_of(code, "rl_promise_t* fetch_greeting(char* name) {");
    offset_of(
        code,
        "return rl_promise_resolve(rl_string_concat(\"hi \", name));",
    );
    // The flag is cleared when the async function ends.
    offset_of(code, "return rl_string_concat(\"hi \", name);");
}

#[test]
fn then_passes_the_hoisted_handler_through_an_opaque_cast() {
    let handler = anon_fn(
        vec![param("data", TypeDescriptor::string())],
        Some(TypeDescriptor::string()),
        compound(vec![ret(Some(ident("data")))]),
    );
    let program = program(vec![function(
        "pipeline",
        vec![param("p", TypeDescriptor::named("promise"))],
        None,
        compound(vec![promise_then(ident("p"), handler)]),
    )]);

    let module = lower(program);
    let code = &module.code;

    offset_of(code, "rl_promise_then(p, (rl_handler_t)__anon_fn_0);");
    // The handler's declared payload type is coerced to the opaque shape.
    offset_of(code, "void* __anon_fn_0(void* data);");
}

#[test]
fn catch_and_finally_lower_to_their_entry_points() {
    let catch_handler = anon_fn(
        vec![param("error", TypeDescriptor::string())],
        Some(TypeDescriptor::string()),
        compound(vec![ret(Some(ident("error")))]),
    );
    let finally_handler = anon_fn(vec![], None, compound(vec![call("cleanup", vec![])]));
    let program = program(vec![function(
        "pipeline",
        vec![param("p", TypeDescriptor::named("promise"))],
        None,
        compound(vec![
            promise_catch(ident("p"), catch_handler),
            promise_finally(ident("p"), finally_handler),
        ]),
    )]);

    let module = lower(program);
    let code = &module.code;

    offset_of(code, "rl_promise_catch(p, (rl_handler_t)__anon_fn_0);");
    offset_of(code, "rl_promise_finally(p, (rl_handler_t)__anon_fn_1);");

    // A zero-parameter finally handler still gets the opaque payload
    // parameter and a synthesized return so it fits the handler shape.
    offset_of(code, "void* __anon_fn_1(void* value) {");
    offset_of(code, "return NULL;");
}

#[test]
fn non_closure_handlers_degrade_to_null_with_a_diagnostic() {
    let program = program(vec![function(
        "pipeline",
        vec![param("p", TypeDescriptor::named("promise"))],
        None,
        compound(vec![promise_then(ident("p"), ident("handler"))]),
    )]);

    let module = lower(program);
    offset_of(&module.code, "rl_promise_then(p, NULL);");
    assert_eq!(module.warning_count(), 1);
}

#[test]
fn promise_all_counts_its_literal_list_at_lowering_time() {
    let all = AstNode::new(AstNodeKind::PromiseAll {
        promises: vec![call("fetch_a", vec![]), call("fetch_b", vec![]), ident("c")],
    });
    let program = program(vec![function(
        "gather",
        vec![param("c", TypeDescriptor::named("promise"))],
        None,
        compound(vec![all]),
    )]);

    let module = lower(program);
    offset_of(
        &module.code,
        "rl_promise_all((rl_promise_t*[]){fetch_a(), fetch_b(), c}, 3);",
    );
}

#[test]
fn await_lowers_to_a_single_blocking_fetch() {
    let program = program(vec![function(
        "wait_for",
        vec![param("p", TypeDescriptor::named("promise"))],
        None,
        compound(vec![let_var(
            "value",
            None,
            Some(await_expr(ident("p"))),
        )]),
    )]);

    let module = lower(program);
    offset_of(&module.code, "void* value = rl_promise_await(p);");
}
