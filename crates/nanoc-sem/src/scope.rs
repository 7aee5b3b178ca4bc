//! The symbol table: a stack of scopes ("ribs"), each holding the variables
//! declared directly inside it, plus a single global table of functions
//! (this language has no nested function declarations).

use indexmap::IndexMap;
use nanoc_util::index_vec::IndexVec;
use nanoc_util::{define_idx, Symbol};

use crate::types::{Function, Variable};

define_idx!(RibId);

/// A single lexical scope: its own bindings plus a link to the scope that
/// encloses it. The root rib (`parent: None`) is the global scope.
#[derive(Debug)]
pub struct Rib {
    bindings: IndexMap<Symbol, Variable>,
    parent: Option<RibId>,
}

/// The scope stack plus the (always-global) function table. Grounded on a
/// rib/scope-tree structure: scopes are nodes in an arena addressed by a
/// typed index, not parent-linked heap allocations walked through raw
/// pointers, and the "current scope" is tracked as a single index rather
/// than cloned/copied `Scope` handles.
pub struct SymbolTable {
    ribs: IndexVec<RibId, Rib>,
    current: RibId,
    functions: IndexMap<Symbol, Function>,
    current_function: Option<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut ribs = IndexVec::new();
        let root = ribs.push(Rib {
            bindings: IndexMap::new(),
            parent: None,
        });
        SymbolTable {
            ribs,
            current: root,
            functions: IndexMap::new(),
            current_function: None,
        }
    }

    pub fn enter_scope(&mut self) {
        let rib = self.ribs.push(Rib {
            bindings: IndexMap::new(),
            parent: Some(self.current),
        });
        self.current = rib;
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.ribs[self.current].parent {
            self.current = parent;
        }
    }

    /// Binds `var` in the current (innermost) scope. Returns the name on
    /// conflict so the caller can build the "ya declarada" diagnostic with
    /// its own line/column.
    pub fn define_variable(&mut self, var: Variable) -> Result<(), Variable> {
        let rib = &mut self.ribs[self.current];
        if rib.bindings.contains_key(&var.name) {
            return Err(var);
        }
        rib.bindings.insert(var.name, var);
        Ok(())
    }

    /// Walks from the current scope out to the global scope, returning the
    /// nearest binding.
    pub fn get_variable(&self, name: Symbol) -> Option<&Variable> {
        let mut rib_id = self.current;
        loop {
            let rib = &self.ribs[rib_id];
            if let Some(var) = rib.bindings.get(&name) {
                return Some(var);
            }
            rib_id = rib.parent?;
        }
    }

    /// Marks a variable as initialized after an assignment. Like
    /// `get_variable`, this must search outward from the current scope —
    /// assigning to a variable declared in an enclosing block is normal.
    pub fn mark_initialized(&mut self, name: Symbol) {
        let mut rib_id = self.current;
        loop {
            let rib = &mut self.ribs[rib_id];
            if let Some(var) = rib.bindings.get_mut(&name) {
                var.initialized = true;
                return;
            }
            match rib.parent {
                Some(parent) => rib_id = parent,
                None => return,
            }
        }
    }

    pub fn define_function(&mut self, func: Function) -> Result<(), Function> {
        if self.functions.contains_key(&func.name) {
            return Err(func);
        }
        self.functions.insert(func.name, func);
        Ok(())
    }

    pub fn get_function(&self, name: Symbol) -> Option<&Function> {
        self.functions.get(&name)
    }

    pub fn has_function(&self, name: Symbol) -> bool {
        self.functions.contains_key(&name)
    }

    pub fn current_function(&self) -> Option<&Function> {
        self.current_function
            .and_then(|name| self.functions.get(&name))
    }

    pub fn set_current_function(&mut self, name: Option<Symbol>) {
        self.current_function = name;
    }

    /// Adds a parameter to the function currently being declared, keeping
    /// the function table's own copy of the parameter list in sync with the
    /// variable bound in the function's scope.
    pub fn add_parameter_to_current_function(&mut self, var: Variable) {
        if let Some(name) = self.current_function {
            if let Some(func) = self.functions.get_mut(&name) {
                func.parameters.push(var);
            }
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn var(name: &str, ty: DataType) -> Variable {
        Variable::new(Symbol::intern(name), ty, false, 1, 1)
    }

    #[test]
    fn resolves_through_enclosing_scopes() {
        let mut table = SymbolTable::new();
        table.define_variable(var("outer", DataType::Int)).unwrap();
        table.enter_scope();
        table.define_variable(var("inner", DataType::Float)).unwrap();
        assert!(table.get_variable(Symbol::intern("outer")).is_some());
        assert!(table.get_variable(Symbol::intern("inner")).is_some());
        table.exit_scope();
        assert!(table.get_variable(Symbol::intern("inner")).is_none());
    }

    #[test]
    fn rejects_duplicate_definition_in_same_scope() {
        let mut table = SymbolTable::new();
        table.define_variable(var("x", DataType::Int)).unwrap();
        assert!(table.define_variable(var("x", DataType::Float)).is_err());
    }

    #[test]
    fn shadowing_in_a_nested_scope_is_allowed() {
        let mut table = SymbolTable::new();
        table.define_variable(var("x", DataType::Int)).unwrap();
        table.enter_scope();
        assert!(table.define_variable(var("x", DataType::Float)).is_ok());
    }
}
