//! The Rill AST: pure data produced by the front end and consumed read-only
//! by the lowering engine.

mod kind;
mod node;
mod types;

pub use kind::{
    AstNodeKind, BinaryOperator, MatchCase, Param, StructField, StructInitField, UnaryOperator,
    VarKind,
};
pub use node::AstNode;
pub use types::TypeDescriptor;
