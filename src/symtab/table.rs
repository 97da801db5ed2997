use super::symbol::{Symbol, SymbolKind};
use crate::ast::TypeDescriptor;
use std::collections::HashMap;

// A single scope: name -> symbol. Within one scope names are unique; the
// first binding wins on collision.
type Scope = HashMap<String, Symbol>;

pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    /// ------- Scope Helpers -------

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the current scope, discarding its bindings. Popping the root
    /// scope is a silent no-op, never an error.
    pub fn leave_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn is_global_scope(&self) -> bool {
        self.scopes.len() == 1
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// ------- Symbol Helpers -------

    /// Inserts a symbol into the current scope. On a name collision the
    /// original binding is kept, the conflict is logged, and `false` is
    /// returned so the caller can record a diagnostic.
    pub fn declare(&mut self, name: &str, kind: SymbolKind, ty: Option<TypeDescriptor>) -> bool {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(name) {
                log::warn!("symbol '{}' already defined in current scope", name);
                return false;
            }
            scope.insert(name.to_string(), Symbol::new(name.to_string(), kind, ty));
        }
        true
    }

    /// Walks from the current scope to the root and returns the first
    /// binding for `name`, or `None` if no scope binds it.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        for scope in self.scopes.iter().rev() {
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
        }
        None
    }

    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map(|scope| scope.contains_key(name))
            .unwrap_or(false)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
