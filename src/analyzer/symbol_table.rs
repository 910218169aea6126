use std::collections::HashMap;

use crate::Position;

use super::value::TypedValue;

/// Index of a scope inside the [`SymbolTable`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub fixed: bool,
    pub declared_at: Position,
    pub value: TypedValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    pub params: Vec<String>,
    pub declared_at: Position,
}

impl FunctionSymbol {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub variables: HashMap<String, Symbol>,
}

/// Nested variable scopes plus the global function namespace.
///
/// Scopes live in an arena and point at their parent by index. Leaving a
/// scope only moves `current` back to the parent, so finished scopes stay
/// readable for tooling after the run.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
    functions: HashMap<String, FunctionSymbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
            current: ScopeId::GLOBAL,
            functions: HashMap::new(),
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn is_global(&self) -> bool {
        self.current == ScopeId::GLOBAL
    }

    /// Opens a child of the current scope and makes it current.
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(self.current),
            variables: HashMap::new(),
        });
        self.current = id;
        tracing::trace!(scope = id.0, "entered scope");
        id
    }

    /// Makes the parent of the current scope current again. The global scope has no parent.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0].parent {
            tracing::trace!(scope = self.current.0, "left scope");
            self.current = parent;
        }
    }

    /// Declares `name` in the current scope with an `Empty` value.
    ///
    /// Returns `false` when the name already exists in this very scope.
    /// Outer bindings may be shadowed.
    pub fn define_variable(&mut self, name: &str, fixed: bool, declared_at: Position) -> bool {
        let scope = &mut self.scopes[self.current.0];
        if scope.variables.contains_key(name) {
            return false;
        }

        scope.variables.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                fixed,
                declared_at,
                value: TypedValue::Empty,
            },
        );
        true
    }

    fn resolve(&self, name: &str) -> Option<ScopeId> {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = &self.scopes[id.0];
            if scope.variables.contains_key(name) {
                return Some(id);
            }
            cursor = scope.parent;
        }
        None
    }

    /// Innermost binding of `name`, searching outward to the global scope.
    pub fn lookup_variable(&self, name: &str) -> Option<&Symbol> {
        let id = self.resolve(name)?;
        self.scopes[id.0].variables.get(name)
    }

    pub fn lookup_variable_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let id = self.resolve(name)?;
        self.scopes[id.0].variables.get_mut(name)
    }

    /// Binding of `name` in the global scope only.
    pub fn lookup_global_variable(&self, name: &str) -> Option<&Symbol> {
        self.scopes[ScopeId::GLOBAL.0].variables.get(name)
    }

    /// Registers a function in the global namespace, whatever the current scope.
    ///
    /// Returns `false` when a function of that name already exists.
    pub fn define_function(&mut self, name: &str, params: Vec<String>, declared_at: Position) -> bool {
        if self.functions.contains_key(name) {
            return false;
        }

        self.functions.insert(
            name.to_string(),
            FunctionSymbol {
                name: name.to_string(),
                params,
                declared_at,
            },
        );
        true
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSymbol> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionSymbol> {
        self.functions.values()
    }
}
