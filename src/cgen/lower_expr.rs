//! file: src/cgen/lower_expr.rs
//! description: expression lowering.
//!
//! Lowers expression nodes into C text on the context sink. Statement and
//! declaration lowering call into this module for every right-hand side,
//! condition, argument and initializer.

use crate::ast::{AstNode, AstNodeKind, BinaryOperator, StructInitField, UnaryOperator};
use crate::error::Level;

use super::lower_anon::{self, HandlerShape};

pub(crate) fn lower_expression(ctx: &mut super::LoweringContext, node: &AstNode) {
    match node.get_kind() {
        AstNodeKind::IntLiteral { value } => {
            ctx.emit(&value.to_string());
        }
        AstNodeKind::FloatLiteral { value } => {
            ctx.emit(&float_literal(*value));
        }
        AstNodeKind::StringLiteral { value } => {
            ctx.emit(&quote_c_string(value));
        }
        AstNodeKind::BoolLiteral { value } => {
            ctx.emit(if *value { "true" } else { "false" });
        }
        AstNodeKind::ArrayLiteral { elements } => {
            // Brace initializer; only meaningful in initializer position,
            // same as the struct-init emission below.
            ctx.emit("{");
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    ctx.emit(", ");
                }
                lower_expression(ctx, element);
            }
            ctx.emit("}");
        }
        AstNodeKind::Identifier { name } => {
            ctx.emit(name);
        }
        AstNodeKind::MemberAccess { object, member } => {
            lower_expression(ctx, object);
            ctx.emit(&format!(".{}", member));
        }
        AstNodeKind::BinaryOp { op, left, right } => {
            lower_binary_op(ctx, *op, left, right);
        }
        AstNodeKind::UnaryOp { op, operand } => {
            ctx.emit("(");
            ctx.emit(match op {
                UnaryOperator::Not => "!",
                UnaryOperator::Neg => "-",
            });
            lower_expression(ctx, operand);
            ctx.emit(")");
        }
        AstNodeKind::Assignment { name, value } => {
            ctx.emit(&format!("{} = ", name));
            lower_expression(ctx, value);
        }
        AstNodeKind::Call { name, args } => {
            ctx.emit(&format!("{}(", name));
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    ctx.emit(", ");
                }
                lower_expression(ctx, arg);
            }
            ctx.emit(")");
        }
        AstNodeKind::StructInit { fields } => {
            lower_struct_init(ctx, fields);
        }
        AstNodeKind::Pipe { left, right } => {
            lower_pipe(ctx, left, right);
        }
        AstNodeKind::AnonymousFunction { params, return_type, body } => {
            lower_anon::lower_anonymous_function(
                ctx,
                params,
                return_type.as_ref(),
                body,
                HandlerShape::Plain,
            );
        }
        AstNodeKind::PromiseThen { promise, handler } => {
            lower_promise_combinator(ctx, "rl_promise_then", promise, handler);
        }
        AstNodeKind::PromiseCatch { promise, handler } => {
            lower_promise_combinator(ctx, "rl_promise_catch", promise, handler);
        }
        AstNodeKind::PromiseFinally { promise, handler } => {
            lower_promise_combinator(ctx, "rl_promise_finally", promise, handler);
        }
        AstNodeKind::PromiseAll { promises } => {
            // The count comes from the literal list length at lowering
            // time, not from any runtime check.
            ctx.emit("rl_promise_all((rl_promise_t*[]){");
            for (i, promise) in promises.iter().enumerate() {
                if i > 0 {
                    ctx.emit(", ");
                }
                lower_expression(ctx, promise);
            }
            ctx.emit(&format!("}}, {})", promises.len()));
        }
        AstNodeKind::Await { promise } => {
            ctx.emit("rl_promise_await(");
            lower_expression(ctx, promise);
            ctx.emit(")");
        }
        other => {
            ctx.emit("/* unsupported expression */");
            ctx.diagnose(
                Level::Warning,
                format!("no lowering rule for {} in expression position", other),
                "rill.cgen.lower_expr",
            );
        }
    }
}

fn lower_binary_op(
    ctx: &mut super::LoweringContext,
    op: BinaryOperator,
    left: &AstNode,
    right: &AstNode,
) {
    // Addition with a syntactic string-literal operand is concatenation.
    // The check is on node kind, not resolved type, so a variable holding
    // a string is not detected.
    let is_string_literal = |node: &AstNode| {
        matches!(node.get_kind(), AstNodeKind::StringLiteral { .. })
    };
    if op == BinaryOperator::Add && (is_string_literal(left) || is_string_literal(right)) {
        if ctx.in_async_function {
            ctx.emit("rl_promise_resolve(rl_string_concat(");
            lower_expression(ctx, left);
            ctx.emit(", ");
            lower_expression(ctx, right);
            ctx.emit("))");
        } else {
            ctx.emit("rl_string_concat(");
            lower_expression(ctx, left);
            ctx.emit(", ");
            lower_expression(ctx, right);
            ctx.emit(")");
        }
        return;
    }

    ctx.emit("(");
    lower_expression(ctx, left);
    ctx.emit(match op {
        BinaryOperator::Add => " + ",
        BinaryOperator::Sub => " - ",
        BinaryOperator::Mul => " * ",
        BinaryOperator::Div => " / ",
        BinaryOperator::Mod => " % ",
        BinaryOperator::Eq => " == ",
        BinaryOperator::Ne => " != ",
        BinaryOperator::Lt => " < ",
        BinaryOperator::Le => " <= ",
        BinaryOperator::Gt => " > ",
        BinaryOperator::Ge => " >= ",
        BinaryOperator::And => " && ",
        BinaryOperator::Or => " || ",
    });
    lower_expression(ctx, right);
    ctx.emit(")");
}

/// Flattens the written field order, inlining spread entries, then emits a
/// designated-initializer list. A name appearing twice is emitted twice;
/// the later one wins in C, which is the documented order-dependent
/// behavior, not a guarantee.
fn lower_struct_init(ctx: &mut super::LoweringContext, fields: &[StructInitField]) {
    let mut flat: Vec<(&str, &AstNode)> = Vec::new();
    collect_init_fields(ctx, fields, &mut flat);

    ctx.emit("{ ");
    for (i, (name, value)) in flat.iter().enumerate() {
        if i > 0 {
            ctx.emit(", ");
        }
        ctx.emit(&format!(".{} = ", name));
        lower_expression(ctx, value);
    }
    ctx.emit(" }");
}

fn collect_init_fields<'a>(
    ctx: &mut super::LoweringContext,
    fields: &'a [StructInitField],
    flat: &mut Vec<(&'a str, &'a AstNode)>,
) {
    for field in fields {
        match field {
            StructInitField::Field { name, value } => flat.push((name.as_str(), value)),
            StructInitField::Spread { expr } => match expr.get_kind() {
                AstNodeKind::StructInit { fields: inner } => {
                    collect_init_fields(ctx, inner, flat);
                }
                other => {
                    ctx.diagnose(
                        Level::Warning,
                        format!("spread of {} is not a struct initialization; skipped", other),
                        "rill.cgen.lower_expr.struct_init",
                    );
                }
            },
        }
    }
}

/// `left |> right` treats `left` as the implicit first argument of `right`.
fn lower_pipe(ctx: &mut super::LoweringContext, left: &AstNode, right: &AstNode) {
    match right.get_kind() {
        AstNodeKind::Call { name, args } => {
            ctx.emit(&format!("{}(", name));
            lower_expression(ctx, left);
            for arg in args {
                ctx.emit(", ");
                lower_expression(ctx, arg);
            }
            ctx.emit(")");
        }
        AstNodeKind::Identifier { name } => {
            ctx.emit(&format!("{}(", name));
            lower_expression(ctx, left);
            ctx.emit(")");
        }
        other => {
            // Degrade to the left side alone so the declaration still lowers.
            lower_expression(ctx, left);
            ctx.diagnose(
                Level::Warning,
                format!("pipe target {} is not callable; piped value passed through", other),
                "rill.cgen.lower_expr.pipe",
            );
        }
    }
}

fn lower_promise_combinator(
    ctx: &mut super::LoweringContext,
    entry_point: &str,
    promise: &AstNode,
    handler: &AstNode,
) {
    ctx.emit(&format!("{}(", entry_point));
    lower_expression(ctx, promise);
    ctx.emit(", ");
    if let AstNodeKind::AnonymousFunction { params, return_type, body } = handler.get_kind() {
        // Handlers share one function-pointer shape regardless of their
        // declared payload type.
        ctx.emit("(rl_handler_t)");
        lower_anon::lower_anonymous_function(
            ctx,
            params,
            return_type.as_ref(),
            body,
            HandlerShape::OpaqueHandler,
        );
    } else {
        ctx.emit("NULL");
        ctx.diagnose(
            Level::Warning,
            format!("{} handler is not an anonymous function; NULL passed", entry_point),
            "rill.cgen.lower_expr.promise",
        );
    }
    ctx.emit(")");
}

/// Renders an f64 as a C floating literal, keeping a decimal point so the
/// emitted token stays a double.
fn float_literal(value: f64) -> String {
    let text = format!("{}", value);
    if text.contains('.') || text.contains('e') || text.contains("inf") || text.contains("NaN") {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Quotes and escapes a string literal for C source.
fn quote_c_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
