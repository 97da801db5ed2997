//! file: src/cgen/lower_decl.rs
//! description: declaration lowering and final unit assembly.
//!
//! Programs, functions, variables, structs, type aliases and imports. The
//! program walk buffers the lowered declarations first so that every
//! closure hoisted along the way can be emitted (declarations before
//! bodies) ahead of the code that references it.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::{AstNode, AstNodeKind, Param, StructField, TypeDescriptor, VarKind};
use crate::error::{Level, RillErrorExt};
use crate::symtab::SymbolKind;

use super::ctype::{c_type_for, zero_value_for};
use super::err::InternalLoweringError;
use super::lower_expr::lower_expression;
use super::lower_stmt;

/// The fixed external contract every produced unit depends on: the promise
/// runtime entry points, the string-concatenation helper and the
/// collection iteration capability. Declarations only; the implementations
/// live in the runtime the build step links against.
const PREAMBLE: &str = "\
#include <stdio.h>
#include <stdlib.h>
#include <string.h>
#include <stdbool.h>

// Opaque payload used wherever the source type is erased
typedef void* rl_any_t;

// External promise runtime contract
typedef struct rl_promise rl_promise_t;
typedef void* (*rl_handler_t)(void* value);

rl_promise_t* rl_promise_resolve(void* value);
rl_promise_t* rl_promise_then(rl_promise_t* promise, rl_handler_t handler);
rl_promise_t* rl_promise_catch(rl_promise_t* promise, rl_handler_t handler);
rl_promise_t* rl_promise_finally(rl_promise_t* promise, rl_handler_t handler);
void* rl_promise_await(rl_promise_t* promise);
rl_promise_t* rl_promise_all(rl_promise_t** promises, int count);

// External string and collection helpers
char* rl_string_concat(const char* left, const char* right);
int rl_length(void* collection);
void* rl_get(void* collection, int index);
void* rl_map_iterator(void* map);
void* rl_map_next_key(void* iterator);
void* rl_map_value_for(void* iterator);

";

lazy_static! {
    /// The recognized composition bases and their fixed field sets. This
    /// is deliberately not a general struct registry: composing from any
    /// other name degrades to a comment.
    static ref COMPOSED_BASES: HashMap<&'static str, &'static [(&'static str, &'static str)]> = {
        let mut bases: HashMap<&'static str, &'static [(&'static str, &'static str)]> =
            HashMap::new();
        bases.insert("Entity", &[("id", "char*"), ("name", "char*")] as &[_]);
        bases.insert(
            "Timestamps",
            &[("created_at", "int"), ("updated_at", "int")] as &[_],
        );
        bases
    };
}

/// Lowers a whole program into the context sink: preamble, hoisted-closure
/// declarations and bodies, then the top-level declarations in source
/// order. The root must be a Program node; anything else is an internal
/// error with no meaningful partial output.
pub(crate) fn lower_program(
    ctx: &mut super::LoweringContext,
    node: &AstNode,
) -> Result<(), Box<dyn RillErrorExt>> {
    let AstNodeKind::Program { declarations } = node.get_kind() else {
        return Err(Box::new(InternalLoweringError::with(
            Level::Critical,
            format!("expected a Program root, found {}", node.get_kind()),
            "rill.cgen.lower_decl.lower_program".to_string(),
            node.get_location().cloned(),
            node.get_span().cloned(),
        )));
    };

    // Lower every declaration into a side buffer first; hoisted closures
    // register themselves on the context while this runs.
    let saved = ctx.swap_sink(String::new());
    for declaration in declarations {
        super::lower_statement(ctx, declaration);
    }
    let declarations_text = ctx.swap_sink(saved);

    ctx.emit(PREAMBLE);

    if !ctx.hoisted_fns().is_empty() {
        ctx.emit("// Hoisted anonymous functions\n");
        let hoisted = ctx.hoisted_fns().to_vec();
        for hoisted_fn in &hoisted {
            ctx.emit(&format!(
                "{} {}({});\n",
                hoisted_fn.return_type, hoisted_fn.name, hoisted_fn.param_list
            ));
        }
        ctx.emit("\n");
        for hoisted_fn in &hoisted {
            ctx.emit(&format!(
                "{} {}({}) {}\n\n",
                hoisted_fn.return_type, hoisted_fn.name, hoisted_fn.param_list, hoisted_fn.body
            ));
        }
    }

    ctx.emit(&declarations_text);
    Ok(())
}

pub(crate) fn lower_function(
    ctx: &mut super::LoweringContext,
    name: &str,
    params: &[Param],
    return_type: Option<&TypeDescriptor>,
    guard: Option<&AstNode>,
    body: &AstNode,
    is_async: bool,
) {
    if is_async {
        ctx.in_async_function = true;
        ctx.emit("// Async function - returns a promise\n");
        ctx.indent();
    }

    // An async function returns a task handle no matter what the source
    // declared.
    let c_return_type = if is_async {
        "rl_promise_t*".to_string()
    } else {
        c_type_for(return_type)
    };

    ctx.emit(&format!("{} {}(", c_return_type, name));

    if !ctx
        .symtab
        .declare(name, SymbolKind::Function, return_type.cloned())
    {
        ctx.diagnose(
            Level::Warning,
            format!("function '{}' conflicts with an existing symbol; original kept", name),
            "rill.cgen.lower_decl.lower_function",
        );
    }

    ctx.symtab.enter_scope();

    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            ctx.emit(", ");
        }
        ctx.emit(&format!("{} {}", c_type_for(param.ty.as_ref()), param.name));
        if !ctx
            .symtab
            .declare(&param.name, SymbolKind::Variable, param.ty.clone())
        {
            ctx.diagnose(
                Level::Warning,
                format!("duplicate parameter '{}' in function '{}'", param.name, name),
                "rill.cgen.lower_decl.lower_function",
            );
        }
    }

    ctx.emit(") {\n");
    ctx.increase_indent();

    if let Some(guard) = guard {
        lower_guard_clause(ctx, name, guard, &c_return_type);
    }

    if let AstNodeKind::Compound { .. } = body.get_kind() {
        lower_stmt::lower_compound_contents(ctx, body);
    } else {
        ctx.indent();
        super::lower_statement(ctx, body);
    }

    ctx.symtab.leave_scope();

    ctx.decrease_indent();
    ctx.indent();
    ctx.emit("}\n\n");

    if is_async {
        ctx.in_async_function = false;
    }
}

/// The guard is a soft-fail: when it does not hold, the generated function
/// logs and returns a type-appropriate zero value instead of running its
/// body. Nothing about a failed guard is a compile-time error.
fn lower_guard_clause(
    ctx: &mut super::LoweringContext,
    function_name: &str,
    guard: &AstNode,
    c_return_type: &str,
) {
    ctx.indent();
    ctx.emit("// Guard clause\n");
    ctx.indent();
    ctx.emit("if (!(");
    lower_expression(ctx, guard);
    ctx.emit(")) {\n");
    ctx.increase_indent();

    ctx.indent();
    ctx.emit(&format!(
        "fprintf(stderr, \"Guard condition failed for function {}\\n\");\n",
        function_name
    ));

    ctx.indent();
    let zero = zero_value_for(c_return_type);
    if zero.is_empty() {
        ctx.emit("return;\n");
    } else {
        ctx.emit(&format!("return {};\n", zero));
    }

    ctx.decrease_indent();
    ctx.indent();
    ctx.emit("}\n\n");
}

/// Lowers a variable declaration followed by `;`.
pub(crate) fn lower_variable(ctx: &mut super::LoweringContext, node: &AstNode) {
    lower_variable_inline(ctx, node);
    ctx.emit(";\n");
}

/// Lowers a variable declaration without the trailing semicolon, for use
/// inside a C-style for initializer as well as at statement position.
pub(crate) fn lower_variable_inline(ctx: &mut super::LoweringContext, node: &AstNode) {
    let AstNodeKind::Variable {
        var_kind,
        name,
        ty,
        initializer,
    } = node.get_kind()
    else {
        return;
    };

    // Explicit type wins; otherwise infer from the initializer's literal
    // kind; no information at all means an opaque pointer.
    let inferred = match (ty, initializer.as_deref()) {
        (Some(ty), _) => c_type_for(Some(ty)),
        (None, Some(init)) => match init.get_kind() {
            AstNodeKind::IntLiteral { .. } => "int".to_string(),
            AstNodeKind::FloatLiteral { .. } => "float".to_string(),
            AstNodeKind::StringLiteral { .. } => "char*".to_string(),
            AstNodeKind::BoolLiteral { .. } => "int".to_string(),
            AstNodeKind::AnonymousFunction { .. } => String::new(), // handled below
            _ => "void*".to_string(),
        },
        (None, None) => "void*".to_string(),
    };

    let const_prefix = match var_kind {
        VarKind::Const => "const ",
        VarKind::Let => "",
    };

    // An anonymous-function initializer declares a function pointer with
    // the closure's parameter and return types.
    if let Some(init) = initializer.as_deref() {
        if let AstNodeKind::AnonymousFunction {
            params,
            return_type,
            ..
        } = init.get_kind()
        {
            let param_types = params
                .iter()
                .map(|p| c_type_for(p.ty.as_ref()))
                .collect::<Vec<_>>()
                .join(", ");
            ctx.emit(&format!(
                "{}{} (*{})({})",
                const_prefix,
                c_type_for(return_type.as_ref()),
                name,
                param_types
            ));
        } else {
            ctx.emit(&format!("{}{} {}", const_prefix, inferred, name));
        }
    } else {
        ctx.emit(&format!("{}{} {}", const_prefix, inferred, name));
    }

    // The name is visible before its own initializer is lowered, so a
    // self-referencing initializer resolves. Sound only for function
    // values; preserved as the source language allows it.
    if !ctx.symtab.declare(name, SymbolKind::Variable, ty.clone()) {
        ctx.diagnose(
            Level::Warning,
            format!("variable '{}' already declared in this scope; original kept", name),
            "rill.cgen.lower_decl.lower_variable",
        );
    }

    if let Some(init) = initializer.as_deref() {
        ctx.emit(" = ");
        lower_expression(ctx, init);
    }
}

pub(crate) fn lower_struct(
    ctx: &mut super::LoweringContext,
    name: &str,
    composition: &[String],
    fields: &[StructField],
) {
    ctx.emit(&format!("struct {} {{\n", name));

    if !ctx.symtab.declare(name, SymbolKind::Struct, None) {
        ctx.diagnose(
            Level::Warning,
            format!("struct '{}' conflicts with an existing symbol; original kept", name),
            "rill.cgen.lower_decl.lower_struct",
        );
    }

    ctx.increase_indent();

    // Composed fields come first, own fields after. Only the fixed base
    // set is known structurally; anything else degrades to a comment.
    for base in composition {
        ctx.indent();
        ctx.emit(&format!("// Inherit from {}\n", base));
        match COMPOSED_BASES.get(base.as_str()) {
            Some(base_fields) => {
                for (field_name, field_type) in base_fields.iter() {
                    ctx.indent();
                    ctx.emit(&format!("{} {};\n", field_type, field_name));
                }
            }
            None => {
                ctx.indent();
                ctx.emit(&format!("// Fields from {} would be included here\n", base));
                ctx.diagnose(
                    Level::Warning,
                    format!("unknown composition base '{}' for struct '{}'", base, name),
                    "rill.cgen.lower_decl.lower_struct",
                );
            }
        }
    }

    for field in fields {
        ctx.indent();
        ctx.emit(&format!("{} {};\n", c_type_for(Some(&field.ty)), field.name));
    }

    ctx.decrease_indent();
    ctx.indent();
    ctx.emit("};\n\n");
}

pub(crate) fn lower_type_alias(
    ctx: &mut super::LoweringContext,
    name: &str,
    ty: &TypeDescriptor,
) {
    let base_type = c_type_for(Some(ty));
    ctx.emit(&format!("// Type alias: {} -> {}\n", name, base_type));
    ctx.indent();
    ctx.emit(&format!("typedef {} {};\n\n", base_type, name));

    if !ctx
        .symtab
        .declare(name, SymbolKind::TypeAlias, Some(ty.clone()))
    {
        ctx.diagnose(
            Level::Warning,
            format!("type alias '{}' conflicts with an existing symbol; original kept", name),
            "rill.cgen.lower_decl.lower_type_alias",
        );
    }
}

pub(crate) fn lower_import(ctx: &mut super::LoweringContext, module: &str) {
    ctx.emit(&format!("#include \"{}\"\n", module));
}
