//! Resolution from source-language type descriptors to C type text.

use crate::ast::TypeDescriptor;

/// Converts a Rill type to its C representation. Never fails: a missing
/// type means `void`, and any unrecognized name is treated as a
/// user-defined aggregate.
pub fn c_type_for(ty: Option<&TypeDescriptor>) -> String {
    let Some(ty) = ty else {
        return "void".to_string();
    };

    match ty.name() {
        "int" => "int".to_string(),
        "float" => "float".to_string(),
        // C has no bool of its own at the ABI this targets; use int.
        "bool" => "int".to_string(),
        "string" => "char*".to_string(),
        "void" => "void".to_string(),
        "array" => {
            if let Some(element) = ty.element_type() {
                format!("{}*", c_type_for(Some(element)))
            } else {
                "void*".to_string()
            }
        }
        // No concrete map representation exists in the target runtime;
        // callers receive an untyped handle.
        "map" => "void*".to_string(),
        name => format!("struct {}", name),
    }
}

/// The type-appropriate zero value used by soft-fail guard returns.
/// Returns an empty string for `void` (a bare `return;`).
pub fn zero_value_for(c_type: &str) -> String {
    match c_type {
        "void" => String::new(),
        "int" => "0".to_string(),
        "float" => "0.0".to_string(),
        "char*" => "NULL".to_string(),
        other => format!("({}){{0}}", other),
    }
}
