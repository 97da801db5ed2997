pub mod ast;
pub mod cgen;
pub mod error;
pub mod location;
pub mod reports;
pub mod symtab;

pub use ast::{AstNode, AstNodeKind, BinaryOperator, TypeDescriptor, UnaryOperator};
pub use cgen::{lower_ast_to_c, CModule};
pub use error::{Level, RillErrorExt};
pub use location::{Location, Span};
pub use reports::{render_report, Diagnostic};
pub use symtab::{Symbol, SymbolKind, SymbolTable};

pub fn generate_error_report<E: RillErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("RILL | {} | {} | {}", level, location, message)
}
