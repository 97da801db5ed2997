//! file: src/cgen/lowering_context.rs
//! description: shared lowering context used during AST->C lowering.
//!
//! `LoweringContext` owns the mutable state that one compilation threads
//! through the tree walk: the output sink, the symbol table, indentation
//! and name counters, the in-async flag, the hoisted-closure registry and
//! the collected diagnostics. A fresh context is created per invocation
//! and dropped once the final declaration has been lowered.

use crate::error::Level;
use crate::reports::Diagnostic;
use crate::symtab::SymbolTable;

/// A closure lifted out of expression position into a top-level function.
/// `param_list` is the already-rendered C parameter list; `body` is the
/// rendered body block including its braces.
#[derive(Debug, Clone, PartialEq)]
pub struct HoistedFn {
    pub name: String,
    pub return_type: String,
    pub param_list: String,
    pub body: String,
}

pub struct LoweringContext {
    out: String,
    pub(crate) symtab: SymbolTable,
    indentation: usize,
    temp_var_count: usize,
    label_count: usize,
    pub(crate) in_async_function: bool,
    anon_fns: Vec<HoistedFn>,
    anon_fn_count: usize,
    diagnostics: Vec<Diagnostic>,
}

impl LoweringContext {
    /// Create an empty lowering context.
    pub fn new() -> Self {
        LoweringContext {
            out: String::new(),
            symtab: SymbolTable::new(),
            indentation: 0,
            temp_var_count: 0,
            label_count: 0,
            in_async_function: false,
            anon_fns: Vec::new(),
            anon_fn_count: 0,
            diagnostics: Vec::new(),
        }
    }

    /// ------- Output Sink -------

    pub fn emit(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Emits the current indentation (four spaces per level).
    pub fn indent(&mut self) {
        for _ in 0..self.indentation {
            self.out.push_str("    ");
        }
    }

    pub fn increase_indent(&mut self) {
        self.indentation += 1;
    }

    pub fn decrease_indent(&mut self) {
        if self.indentation > 0 {
            self.indentation -= 1;
        }
    }

    pub fn indentation(&self) -> usize {
        self.indentation
    }

    pub(crate) fn set_indentation(&mut self, level: usize) {
        self.indentation = level;
    }

    /// Replaces the output sink, returning the previous one. Lowering uses
    /// this to capture closure bodies and the declaration stream into side
    /// buffers before assembling the final unit.
    pub(crate) fn swap_sink(&mut self, sink: String) -> String {
        std::mem::replace(&mut self.out, sink)
    }

    pub(crate) fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    /// ------- Generated Names -------

    /// Returns a fresh temporary-variable name; never reused within one
    /// context.
    pub fn temp_var_name(&mut self) -> String {
        let name = format!("__temp_{}", self.temp_var_count);
        self.temp_var_count += 1;
        name
    }

    /// Returns the next temporary suffix without rendering a name, for
    /// sites that derive several related temporaries from one suffix.
    pub fn next_temp_suffix(&mut self) -> usize {
        let n = self.temp_var_count;
        self.temp_var_count += 1;
        n
    }

    /// Returns a fresh label name. Reserved by the context contract; the
    /// C emitter currently consumes only temporary names.
    pub fn label_name(&mut self) -> String {
        let name = format!("__label_{}", self.label_count);
        self.label_count += 1;
        name
    }

    /// ------- Hoisted Closures -------

    pub(crate) fn next_anon_name(&mut self) -> String {
        let name = format!("__anon_fn_{}", self.anon_fn_count);
        self.anon_fn_count += 1;
        name
    }

    pub(crate) fn register_anon(&mut self, hoisted: HoistedFn) {
        self.anon_fns.push(hoisted);
    }

    pub fn hoisted_fns(&self) -> &[HoistedFn] {
        &self.anon_fns
    }

    /// ------- Diagnostics -------

    pub(crate) fn diagnose(&mut self, level: Level, message: impl Into<String>, issuer: &str) {
        let message = message.into();
        if level == Level::Warning {
            log::warn!("{}: {}", issuer, message);
        }
        self.diagnostics.push(Diagnostic::new(level, message, issuer));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Default for LoweringContext {
    fn default() -> Self {
        Self::new()
    }
}
