//! Block scopes recorded during parsing.
//!
//! Every parsed block owns exactly one scope. Scopes are stored in a
//! [`ScopeTable`] owned by the compilation unit and referenced by index:
//! a [`Variable`](crate::node::Variable) that resolved to a block-local
//! declaration holds the [`ScopeId`] of the declaring scope, never the
//! scope itself.

use rustc_hash::FxHashSet;
use std::fmt;

/// Index of a scope inside its [`ScopeTable`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The set of names declared block-locally (`let`/`const`) in one block.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    /// The enclosing scope (None for the main block).
    pub parent: Option<ScopeId>,
    declarations: FxHashSet<String>,
    /// Declaration order, for stable diagnostics and debug output.
    order: Vec<String>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            parent,
            declarations: FxHashSet::default(),
            order: Vec::new(),
        }
    }

    pub fn declares(&self, name: &str) -> bool {
        self.declarations.contains(name)
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// All scopes created while parsing one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Allocate a fresh, empty scope.
    pub fn alloc(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, parent));
        id
    }

    /// Record a block-local declaration. Returns false if the name was
    /// already declared in this scope.
    pub fn declare(&mut self, id: ScopeId, name: &str) -> bool {
        let scope = &mut self.scopes[id.index()];
        if scope.declarations.insert(name.to_string()) {
            scope.order.push(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    pub fn declares(&self, id: ScopeId, name: &str) -> bool {
        self.get(id).map_or(false, |scope| scope.declares(name))
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }
}
