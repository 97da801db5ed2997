//! Anonymous-function hoisting.
//!
//! Each anonymous function literal is lowered into a freshly named
//! top-level function: the body is captured into a side buffer, the
//! signature and body text are registered on the context, and the
//! expression occurrence is replaced by the generated name. Free variables
//! are not captured — a hoisted function cannot see its enclosing scope.

use crate::ast::{AstNode, AstNodeKind, Param, TypeDescriptor};
use crate::symtab::SymbolKind;

use super::ctype::c_type_for;
use super::lower_stmt;
use super::lowering_context::HoistedFn;

/// How the hoisted function's signature is rendered. Async handlers are
/// uniformly coerced to the opaque `void* (*)(void*)` shape so a single
/// function-pointer type can represent every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandlerShape {
    Plain,
    OpaqueHandler,
}

pub(crate) fn lower_anonymous_function(
    ctx: &mut super::LoweringContext,
    params: &[Param],
    return_type: Option<&TypeDescriptor>,
    body: &AstNode,
    shape: HandlerShape,
) {
    let name = ctx.next_anon_name();

    let (c_return_type, param_list) = match shape {
        HandlerShape::Plain => {
            let ret = c_type_for(return_type);
            let list = if params.is_empty() {
                "void".to_string()
            } else {
                params
                    .iter()
                    .map(|p| format!("{} {}", c_type_for(p.ty.as_ref()), p.name))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            (ret, list)
        }
        HandlerShape::OpaqueHandler => {
            let list = if params.is_empty() {
                // The payload parameter still exists in the coerced shape;
                // a handler that declared none simply ignores it.
                "void* value".to_string()
            } else {
                params
                    .iter()
                    .map(|p| format!("void* {}", p.name))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            ("void*".to_string(), list)
        }
    };

    // Parameters open a scope for the duration of the body, same as named
    // functions. Nothing from the enclosing scopes is re-declared here, so
    // outer locals resolve but have no storage in the hoisted function --
    // the no-capture limitation.
    ctx.symtab.enter_scope();
    for param in params {
        ctx.symtab
            .declare(&param.name, SymbolKind::Variable, param.ty.clone());
    }

    // Capture the body at top-level indentation regardless of where the
    // literal occurred.
    let saved_sink = ctx.swap_sink(String::new());
    let saved_indent = ctx.indentation();
    ctx.set_indentation(0);

    ctx.emit("{\n");
    ctx.increase_indent();
    if let AstNodeKind::Compound { .. } = body.get_kind() {
        lower_stmt::lower_compound_contents(ctx, body);
    } else {
        ctx.indent();
        super::lower_statement(ctx, body);
    }
    if shape == HandlerShape::OpaqueHandler && coerced_body_needs_return(return_type) {
        ctx.indent();
        ctx.emit("return NULL;\n");
    }
    ctx.decrease_indent();
    ctx.emit("}");

    let body_text = ctx.swap_sink(saved_sink);
    ctx.set_indentation(saved_indent);
    ctx.symtab.leave_scope();

    ctx.register_anon(HoistedFn {
        name: name.clone(),
        return_type: c_return_type,
        param_list,
        body: body_text,
    });

    // The expression position reduces to a reference to the hoisted name.
    ctx.emit(&name);
}

/// A handler whose declared return type is void gains a trailing
/// `return NULL;` once coerced to the opaque shape.
fn coerced_body_needs_return(declared: Option<&TypeDescriptor>) -> bool {
    match declared {
        None => true,
        Some(ty) => ty.name() == "void",
    }
}
