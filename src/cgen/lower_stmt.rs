//! file: src/cgen/lower_stmt.rs
//! description: statement lowering.
//!
//! Lowers compound statements, control flow and loops. Scope discipline is
//! stack-shaped: every `enter_scope` here is matched by exactly one
//! `leave_scope` on every path out of the construct.

use crate::ast::{AstNode, AstNodeKind, MatchCase, Param};
use crate::error::Level;
use crate::symtab::SymbolKind;

use super::ctype::c_type_for;
use super::lower_decl;
use super::lower_expr::lower_expression;

/// Generates a compound statement with braces.
pub(crate) fn lower_compound(ctx: &mut super::LoweringContext, node: &AstNode) {
    ctx.emit("{\n");
    ctx.increase_indent();
    lower_compound_contents(ctx, node);
    ctx.decrease_indent();
    ctx.indent();
    ctx.emit("}\n");
}

/// Generates the contents of a compound statement without the braces. A
/// `return` terminates lowering of the remaining statements in the block;
/// dead code after it is dropped, not emitted.
pub(crate) fn lower_compound_contents(ctx: &mut super::LoweringContext, node: &AstNode) {
    let AstNodeKind::Compound { statements } = node.get_kind() else {
        ctx.indent();
        super::lower_statement(ctx, node);
        return;
    };

    ctx.symtab.enter_scope();

    for stmt in statements {
        ctx.indent();
        if let AstNodeKind::Compound { .. } = stmt.get_kind() {
            lower_compound(ctx, stmt);
        } else {
            super::lower_statement(ctx, stmt);
        }

        if let AstNodeKind::Return { .. } = stmt.get_kind() {
            break;
        }
    }

    ctx.symtab.leave_scope();
}

pub(crate) fn lower_if(
    ctx: &mut super::LoweringContext,
    condition: &AstNode,
    true_branch: &AstNode,
    false_branch: Option<&AstNode>,
) {
    ctx.emit("if (");
    lower_expression(ctx, condition);
    ctx.emit(") {\n");
    ctx.increase_indent();
    lower_branch(ctx, true_branch);
    ctx.decrease_indent();
    ctx.indent();

    if let Some(false_branch) = false_branch {
        ctx.emit("} else {\n");
        ctx.increase_indent();
        lower_branch(ctx, false_branch);
        ctx.decrease_indent();
        ctx.indent();
    }

    ctx.emit("}\n");
}

/// A branch body may be a block or a single statement; blocks get their
/// own scope through compound lowering.
fn lower_branch(ctx: &mut super::LoweringContext, body: &AstNode) {
    if let AstNodeKind::Compound { .. } = body.get_kind() {
        lower_compound_contents(ctx, body);
    } else {
        ctx.indent();
        super::lower_statement(ctx, body);
    }
}

/// Lowers a match statement to an if/else-if chain. The scrutinee is
/// evaluated exactly once into a temporary; cases are tried in declaration
/// order and the first match wins. Reachability is not special-cased: an
/// unconditional case ahead of a literal one simply leaves the literal arm
/// dead in the chain.
pub(crate) fn lower_match(
    ctx: &mut super::LoweringContext,
    scrutinee: &AstNode,
    cases: &[MatchCase],
) {
    ctx.emit("{\n");
    ctx.increase_indent();

    ctx.indent();
    ctx.emit("// Match statement\n");

    let tmp = ctx.temp_var_name();
    let scrutinee_type = scrutinee_c_type(ctx, scrutinee);
    ctx.indent();
    ctx.emit(&format!("{} {} = ", scrutinee_type, tmp));
    lower_expression(ctx, scrutinee);
    ctx.emit(";\n");

    for (i, case) in cases.iter().enumerate() {
        ctx.indent();
        if i > 0 {
            ctx.emit("else ");
        }

        // Binding patterns introduce a scoped name for the case body.
        let binding = match case.pattern.get_kind() {
            AstNodeKind::BindingPattern { name, ty } => Some((name.clone(), ty.clone())),
            _ => None,
        };
        if binding.is_some() {
            ctx.symtab.enter_scope();
        }

        ctx.emit("if (");
        match case.pattern.get_kind() {
            AstNodeKind::BindingPattern { .. } | AstNodeKind::Wildcard => {
                // Always matches; the chain position alone decides.
                ctx.emit("1");
            }
            _ => {
                ctx.emit(&format!("{} == ", tmp));
                lower_expression(ctx, &case.pattern);
            }
        }
        if let Some(guard) = &case.guard {
            ctx.emit(" && (");
            lower_expression(ctx, guard);
            ctx.emit(")");
        }
        ctx.emit(") {\n");
        ctx.increase_indent();

        if let Some((name, ty)) = &binding {
            let bind_type = match ty {
                Some(ty) => c_type_for(Some(ty)),
                None => scrutinee_type.clone(),
            };
            ctx.indent();
            ctx.emit(&format!("{} {} = {};\n", bind_type, name, tmp));
            ctx.symtab.declare(name, SymbolKind::Variable, ty.clone());
        }

        lower_branch(ctx, &case.body);

        ctx.decrease_indent();
        ctx.indent();
        ctx.emit("}\n");

        if binding.is_some() {
            ctx.symtab.leave_scope();
        }
    }

    ctx.decrease_indent();
    ctx.indent();
    ctx.emit("}\n");
}

/// Syntax-driven type pick for the scrutinee temporary: literal kinds map
/// directly, identifiers consult the symbol table, anything else falls
/// back to int.
fn scrutinee_c_type(ctx: &super::LoweringContext, scrutinee: &AstNode) -> String {
    match scrutinee.get_kind() {
        AstNodeKind::IntLiteral { .. } | AstNodeKind::BoolLiteral { .. } => "int".to_string(),
        AstNodeKind::FloatLiteral { .. } => "float".to_string(),
        AstNodeKind::StringLiteral { .. } => "char*".to_string(),
        AstNodeKind::Identifier { name } => match ctx.symtab.lookup(name) {
            Some(symbol) => c_type_for(symbol.ty()),
            None => "int".to_string(),
        },
        _ => "int".to_string(),
    }
}

pub(crate) fn lower_return(ctx: &mut super::LoweringContext, value: Option<&AstNode>) {
    ctx.emit("return");
    if let Some(value) = value {
        ctx.emit(" ");
        lower_expression(ctx, value);
    }
    ctx.emit(";\n");
}

pub(crate) fn lower_c_style_for(
    ctx: &mut super::LoweringContext,
    initializer: Option<&AstNode>,
    condition: Option<&AstNode>,
    incrementer: Option<&AstNode>,
    body: &AstNode,
) {
    // The loop gets its own scope only when the initializer declares a
    // variable.
    let needs_scope = matches!(
        initializer.map(AstNode::get_kind),
        Some(AstNodeKind::Variable { .. })
    );
    if needs_scope {
        ctx.symtab.enter_scope();
    }

    ctx.emit("for (");
    if let Some(initializer) = initializer {
        if let AstNodeKind::Variable { .. } = initializer.get_kind() {
            lower_decl::lower_variable_inline(ctx, initializer);
        } else {
            lower_expression(ctx, initializer);
        }
    }
    ctx.emit("; ");
    if let Some(condition) = condition {
        lower_expression(ctx, condition);
    }
    ctx.emit("; ");
    if let Some(incrementer) = incrementer {
        lower_expression(ctx, incrementer);
    }
    ctx.emit(") {\n");
    ctx.increase_indent();
    lower_branch(ctx, body);
    ctx.decrease_indent();
    ctx.indent();
    ctx.emit("}\n");

    if needs_scope {
        ctx.symtab.leave_scope();
    }
}

pub(crate) fn lower_for_in(
    ctx: &mut super::LoweringContext,
    variable: &Param,
    iterable: &AstNode,
    body: &AstNode,
) {
    ctx.symtab.enter_scope();
    ctx.symtab
        .declare(&variable.name, SymbolKind::Variable, variable.ty.clone());

    match iterable.get_kind() {
        AstNodeKind::Range { start, end } => {
            // Both bounds are evaluated once, at loop entry; the end is
            // exclusive. Later changes to whatever the bound expressions
            // read do not move the bound.
            let suffix = ctx.next_temp_suffix();
            let start_var = format!("__range_start_{}", suffix);
            let end_var = format!("__range_end_{}", suffix);

            ctx.emit(&format!("int {} = ", start_var));
            lower_expression(ctx, start);
            ctx.emit(";\n");

            ctx.indent();
            ctx.emit(&format!("int {} = ", end_var));
            lower_expression(ctx, end);
            ctx.emit(";\n");

            ctx.indent();
            ctx.emit(&format!(
                "for (int {name} = {start}; {name} < {end}; {name}++) {{\n",
                name = variable.name,
                start = start_var,
                end = end_var,
            ));
            ctx.increase_indent();
            lower_branch(ctx, body);
            ctx.decrease_indent();
            ctx.indent();
            ctx.emit("}\n");
        }
        AstNodeKind::Identifier { .. } | AstNodeKind::ArrayLiteral { .. } => {
            // Sequence iteration goes through the external iteration
            // capability: take the length once, then fetch-and-bind per
            // index.
            let suffix = ctx.next_temp_suffix();
            let array_var = format!("__arr_{}", suffix);
            let length_var = format!("__len_{}", suffix);
            let index_var = format!("__i_{}", suffix);

            ctx.emit(&format!("void* {} = ", array_var));
            lower_expression(ctx, iterable);
            ctx.emit(";\n");

            ctx.indent();
            ctx.emit(&format!("int {} = rl_length({});\n", length_var, array_var));

            ctx.indent();
            ctx.emit(&format!(
                "for (int {i} = 0; {i} < {len}; {i}++) {{\n",
                i = index_var,
                len = length_var,
            ));
            ctx.increase_indent();

            let element_type = match &variable.ty {
                Some(ty) => c_type_for(Some(ty)),
                None => "void*".to_string(),
            };
            ctx.indent();
            ctx.emit(&format!(
                "{ty} {name} = ({ty})rl_get({arr}, {i});\n",
                ty = element_type,
                name = variable.name,
                arr = array_var,
                i = index_var,
            ));

            lower_branch(ctx, body);
            ctx.decrease_indent();
            ctx.indent();
            ctx.emit("}\n");
        }
        other => {
            ctx.emit("/* unsupported iterable */;\n");
            ctx.diagnose(
                Level::Warning,
                format!("cannot iterate a {} with for..in", other),
                "rill.cgen.lower_stmt.for_in",
            );
        }
    }

    ctx.symtab.leave_scope();
}

pub(crate) fn lower_for_map(
    ctx: &mut super::LoweringContext,
    key: &Param,
    value: &Param,
    map: &AstNode,
    body: &AstNode,
) {
    ctx.symtab.enter_scope();
    ctx.symtab
        .declare(&key.name, SymbolKind::Variable, key.ty.clone());
    ctx.symtab
        .declare(&value.name, SymbolKind::Variable, value.ty.clone());

    let suffix = ctx.next_temp_suffix();
    let map_var = format!("__map_{}", suffix);
    let iter_var = format!("__iter_{}", suffix);
    let length_var = format!("__len_{}", suffix);
    let index_var = format!("__i_{}", suffix);

    ctx.emit(&format!("void* {} = ", map_var));
    lower_expression(ctx, map);
    ctx.emit(";\n");

    ctx.indent();
    ctx.emit(&format!("void* {} = rl_map_iterator({});\n", iter_var, map_var));
    ctx.indent();
    ctx.emit(&format!("int {} = rl_length({});\n", length_var, map_var));

    ctx.indent();
    ctx.emit(&format!(
        "for (int {i} = 0; {i} < {len}; {i}++) {{\n",
        i = index_var,
        len = length_var,
    ));
    ctx.increase_indent();

    let key_type = match &key.ty {
        Some(ty) => c_type_for(Some(ty)),
        None => "char*".to_string(),
    };
    let value_type = match &value.ty {
        Some(ty) => c_type_for(Some(ty)),
        None => "void*".to_string(),
    };
    ctx.indent();
    ctx.emit(&format!(
        "{ty} {name} = ({ty})rl_map_next_key({iter});\n",
        ty = key_type,
        name = key.name,
        iter = iter_var,
    ));
    ctx.indent();
    ctx.emit(&format!(
        "{ty} {name} = ({ty})rl_map_value_for({iter});\n",
        ty = value_type,
        name = value.name,
        iter = iter_var,
    ));

    lower_branch(ctx, body);
    ctx.decrease_indent();
    ctx.indent();
    ctx.emit("}\n");

    ctx.symtab.leave_scope();
}

pub(crate) fn lower_while(
    ctx: &mut super::LoweringContext,
    condition: &AstNode,
    body: &AstNode,
) {
    ctx.emit("while (");
    lower_expression(ctx, condition);
    ctx.emit(") {\n");
    ctx.increase_indent();
    lower_branch(ctx, body);
    ctx.decrease_indent();
    ctx.indent();
    ctx.emit("}\n");
}
