use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::scan::scan_source;

/// Kind of type declaration picked up by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Interface,
    Struct,
    Enum,
}

impl SymbolKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "struct" => Some(Self::Struct),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.keyword())
    }
}

/// A declared type and the namespace that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedSymbol {
    pub name: String,
    pub namespace: String,
    pub kind: SymbolKind,
}

impl IndexedSymbol {
    /// Detail text shown next to the symbol in completion lists.
    pub fn detail(&self) -> String {
        format!("from {}", self.namespace)
    }
}

/// Symbol name to declaring namespace. Names are unique; the last insertion wins.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    symbols: BTreeMap<String, IndexedSymbol>,
    files_scanned: usize,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol, returning the entry it replaced.
    pub fn insert(&mut self, symbol: IndexedSymbol) -> Option<IndexedSymbol> {
        let previous = self.symbols.insert(symbol.name.clone(), symbol);
        if let Some(prev) = &previous {
            if let Some(current) = self.symbols.get(&prev.name) {
                if current.namespace != prev.namespace {
                    debug!(
                        "symbol {} redeclared: {} replaces {}",
                        prev.name, current.namespace, prev.namespace
                    );
                }
            }
        }
        previous
    }

    /// Scan one source file into the index. Returns how many declarations were found.
    pub fn extend_from_source(&mut self, text: &str) -> usize {
        let symbols = scan_source(text);
        let found = symbols.len();
        for symbol in symbols {
            self.insert(symbol);
        }
        self.files_scanned += 1;
        found
    }

    pub fn namespace_of(&self, name: &str) -> Option<&str> {
        self.symbols.get(name).map(|s| s.namespace.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    /// Symbols ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedSymbol> {
        self.symbols.values()
    }
}

impl Extend<IndexedSymbol> for SymbolIndex {
    fn extend<T: IntoIterator<Item = IndexedSymbol>>(&mut self, iter: T) {
        for symbol in iter {
            self.insert(symbol);
        }
    }
}
