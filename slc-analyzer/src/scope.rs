use slc_ast::TypeExpr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Param,
}

#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub name: String,
    pub ty: TypeExpr,
    pub kind: SymbolKind,
}

/// A lexical scope chain. Each block/method/function pushes one; lookup
/// walks outward to the global scope.
#[derive(Debug, Default)]
pub struct Scope {
    symbols: std::collections::HashMap<String, SymbolInfo>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(self) -> Self {
        Scope { symbols: std::collections::HashMap::new(), parent: Some(Box::new(self)) }
    }

    /// Pop back to the parent scope, discarding this one. Returns the
    /// global scope unchanged if there is no parent (should not happen in
    /// well-formed analysis, but avoids a panic on malformed recursion).
    pub fn pop(self) -> Self {
        match self.parent {
            Some(parent) => *parent,
            None => Scope::new(),
        }
    }

    pub fn define(&mut self, name: impl Into<String>, info: SymbolInfo) {
        self.symbols.insert(name.into(), info);
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolInfo> {
        if let Some(info) = self.symbols.get(name) {
            return Some(info);
        }
        self.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// All names visible from this scope, innermost first — used to build
    /// "did you mean" candidate lists.
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.symbols.keys().cloned().collect();
        if let Some(parent) = &self.parent {
            names.extend(parent.visible_names());
        }
        names
    }
}
