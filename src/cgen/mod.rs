//! The lowering engine: a single depth-first walk over a Rill AST that
//! emits a C translation unit. One fresh `LoweringContext` per invocation;
//! nothing is shared across compilations.

pub mod err;

mod ctype;
mod lower_anon;
mod lower_decl;
mod lower_expr;
mod lower_stmt;
mod lowering_context;

pub use lowering_context::{HoistedFn, LoweringContext};

use crate::ast::{AstNode, AstNodeKind};
use crate::error::RillErrorExt;
use crate::reports::Diagnostic;

/// The lowered translation unit plus everything recoverable that happened
/// along the way.
#[derive(Debug)]
pub struct CModule {
    /// The complete C source text.
    pub code: String,
    diagnostics: Vec<Diagnostic>,
}

impl CModule {
    /// Non-fatal diagnostics in the order they were recorded.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Writes the translation unit to `path`; the packaging step that
    /// compiles and runs it is outside this crate.
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(path, &self.code)
    }
}

impl std::fmt::Display for CModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Lowers a program AST into C text. The root must be a Program node;
/// anything else is a fatal internal error. Recoverable findings are
/// collected on the returned module instead of failing the run.
pub fn lower_ast_to_c(ast: &AstNode) -> Result<CModule, Box<dyn RillErrorExt>> {
    let mut ctx = LoweringContext::new();
    lower_decl::lower_program(&mut ctx, ast)?;
    Ok(CModule {
        code: ctx.take_output(),
        diagnostics: ctx.take_diagnostics(),
    })
}

/// Statement-level dispatch. Declarations may appear anywhere a statement
/// can; anything that is neither a declaration nor a control-flow form is
/// lowered as an expression statement.
pub(crate) fn lower_statement(ctx: &mut LoweringContext, node: &AstNode) {
    match node.get_kind() {
        AstNodeKind::Function {
            name,
            params,
            return_type,
            guard,
            body,
            is_async,
        } => {
            lower_decl::lower_function(
                ctx,
                name,
                params,
                return_type.as_ref(),
                guard.as_deref(),
                body,
                *is_async,
            );
        }
        AstNodeKind::Variable { .. } => {
            lower_decl::lower_variable(ctx, node);
        }
        AstNodeKind::Struct {
            name,
            composition,
            fields,
        } => {
            lower_decl::lower_struct(ctx, name, composition, fields);
        }
        AstNodeKind::TypeAlias { name, ty } => {
            lower_decl::lower_type_alias(ctx, name, ty);
        }
        AstNodeKind::Import { module } => {
            lower_decl::lower_import(ctx, module);
        }
        AstNodeKind::If {
            condition,
            true_branch,
            false_branch,
        } => {
            lower_stmt::lower_if(ctx, condition, true_branch, false_branch.as_deref());
        }
        AstNodeKind::Match { scrutinee, cases } => {
            lower_stmt::lower_match(ctx, scrutinee, cases);
        }
        AstNodeKind::Return { value } => {
            lower_stmt::lower_return(ctx, value.as_deref());
        }
        AstNodeKind::Compound { .. } => {
            lower_stmt::lower_compound(ctx, node);
        }
        AstNodeKind::CStyleFor {
            initializer,
            condition,
            incrementer,
            body,
        } => {
            lower_stmt::lower_c_style_for(
                ctx,
                initializer.as_deref(),
                condition.as_deref(),
                incrementer.as_deref(),
                body,
            );
        }
        AstNodeKind::ForIn {
            variable,
            iterable,
            body,
        } => {
            lower_stmt::lower_for_in(ctx, variable, iterable, body);
        }
        AstNodeKind::ForMap {
            key,
            value,
            map,
            body,
        } => {
            lower_stmt::lower_for_map(ctx, key, value, map, body);
        }
        AstNodeKind::While { condition, body } => {
            lower_stmt::lower_while(ctx, condition, body);
        }
        AstNodeKind::Program { .. } => {
            ctx.emit("/* unsupported statement */;\n");
            ctx.diagnose(
                crate::error::Level::Warning,
                "nested Program node has no statement lowering",
                "rill.cgen.lower_statement",
            );
        }
        _ => {
            lower_expr::lower_expression(ctx, node);
            ctx.emit(";\n");
        }
    }
}
