//! Scope-aware symbol table used during compilation.

use std::collections::HashMap;

use brook_common::Type;

/// A named, typed, addressed storage location.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Source name of the variable.
    pub name: String,
    /// Declared type. `Unknown` until the first assignment binds it.
    pub ty: Type,
    /// Slot in the VM's flat memory. Permanent for the whole compilation.
    pub address: usize,
}

/// A stack of lexical scopes mapping names to symbols.
///
/// Addresses come from one monotonically increasing counter shared
/// across the whole compilation. An address, once allocated, is never
/// reused, even after its owning scope exits, so two sequential blocks
/// never alias each other's storage.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
    next_address: usize,
}

impl SymbolTable {
    /// Create a table with the bottom frame already in place. The bottom
    /// frame is never removed.
    pub fn new() -> Self {
        let mut table = Self {
            scopes: Vec::new(),
            next_address: 0,
        };
        table.enter_scope();
        table
    }

    /// Push a new empty scope frame.
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope frame.
    ///
    /// Exiting the bottom frame is never legitimate; the call degrades
    /// to a logged no-op instead of unbalancing the table.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        } else {
            log::warn!("attempted to exit the global scope");
        }
    }

    /// Register `name` in the innermost scope and allocate its address.
    ///
    /// Returns the allocated address, or `None` if the name already
    /// exists in the innermost frame. Shadowing an outer-scope name is
    /// permitted.
    pub fn add_symbol(&mut self, name: &str, ty: Type) -> Option<usize> {
        let scope = self
            .scopes
            .last_mut()
            .expect("the bottom frame is never removed");
        if scope.contains_key(name) {
            return None;
        }

        let address = self.next_address;
        self.next_address += 1;
        scope.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                ty,
                address,
            },
        );
        Some(address)
    }

    /// Find `name`, scanning frames innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Mutable variant of [`SymbolTable::lookup`], used to bind an
    /// `Unknown` symbol type on first assignment.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
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

    #[test]
    fn add_then_lookup() {
        let mut table = SymbolTable::new();
        let address = table.add_symbol("x", Type::Integer).unwrap();
        let symbol = table.lookup("x").unwrap();
        assert_eq!(symbol.name, "x");
        assert_eq!(symbol.ty, Type::Integer);
        assert_eq!(symbol.address, address);
    }

    #[test]
    fn lookup_missing_name() {
        let table = SymbolTable::new();
        assert!(table.lookup("ghost").is_none());
    }

    #[test]
    fn duplicate_in_same_scope_rejected() {
        let mut table = SymbolTable::new();
        assert!(table.add_symbol("x", Type::Integer).is_some());
        assert!(table.add_symbol("x", Type::Float).is_none());
        // The original binding is untouched.
        assert_eq!(table.lookup("x").unwrap().ty, Type::Integer);
    }

    #[test]
    fn shadowing_in_inner_scope() {
        let mut table = SymbolTable::new();
        let outer = table.add_symbol("x", Type::Integer).unwrap();

        table.enter_scope();
        let inner = table.add_symbol("x", Type::String).unwrap();
        assert_ne!(outer, inner);
        assert_eq!(table.lookup("x").unwrap().ty, Type::String);

        table.exit_scope();
        // Back to the outer binding.
        assert_eq!(table.lookup("x").unwrap().ty, Type::Integer);
        assert_eq!(table.lookup("x").unwrap().address, outer);
    }

    #[test]
    fn outer_names_visible_from_inner_scope() {
        let mut table = SymbolTable::new();
        table.add_symbol("x", Type::Integer).unwrap();
        table.enter_scope();
        assert!(table.lookup("x").is_some());
    }

    #[test]
    fn addresses_never_reused_after_scope_exit() {
        let mut table = SymbolTable::new();

        table.enter_scope();
        let first = table.add_symbol("a", Type::Integer).unwrap();
        table.exit_scope();

        table.enter_scope();
        let second = table.add_symbol("b", Type::Integer).unwrap();
        table.exit_scope();

        assert_eq!(first, 0);
        assert_eq!(second, 1);
    }

    #[test]
    fn exit_global_scope_is_a_no_op() {
        let mut table = SymbolTable::new();
        table.add_symbol("x", Type::Integer).unwrap();
        table.exit_scope();
        table.exit_scope();
        // The bottom frame and its contents survive.
        assert!(table.lookup("x").is_some());
        // And the table still accepts new symbols.
        assert!(table.add_symbol("y", Type::Float).is_some());
    }

    #[test]
    fn lookup_mut_rebinds_type() {
        let mut table = SymbolTable::new();
        table.add_symbol("x", Type::Unknown).unwrap();
        table.lookup_mut("x").unwrap().ty = Type::Float;
        assert_eq!(table.lookup("x").unwrap().ty, Type::Float);
    }
}
