//! Interned symbol names
//!
//! Symbol names are stored once in a global registry. A `Symbol` is a slotmap
//! key plus a shared handle to the name, so equality and hashing work on the
//! key and never touch the string.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use slotmap::{DefaultKey, Key, SlotMap};

use crate::Expr;

/// An interned symbol name
#[derive(Clone)]
pub struct Symbol {
    key: DefaultKey,
    name: Arc<str>,
}

impl Symbol {
    /// Intern `name` (or fetch the existing entry) and return its symbol
    pub fn new(name: &str) -> Self {
        get_or_intern(name)
    }

    /// The symbol's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable numeric id of this symbol within the process
    pub fn id(&self) -> u64 {
        self.key.data().as_ffi()
    }

    /// Build a fresh `Symbol` terminal node for this name
    pub fn to_expr(&self) -> Expr {
        Expr::from_symbol(self.clone())
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        &*self.name == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        &*self.name == *other
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.name)
    }
}

#[derive(Default)]
struct SymbolRegistry {
    // Name -> key, FxHash since symbol names are short
    by_name: FxHashMap<Arc<str>, DefaultKey>,
    names: SlotMap<DefaultKey, Arc<str>>,
}

static REGISTRY: LazyLock<RwLock<SymbolRegistry>> =
    LazyLock::new(|| RwLock::new(SymbolRegistry::default()));

/// Look up `name`, interning it on first use
pub(crate) fn get_or_intern(name: &str) -> Symbol {
    if let Some(symbol) = lookup(name) {
        return symbol;
    }

    // The registry only ever grows, so a poisoned lock still holds consistent data
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    // Another thread may have interned the name between the two lock acquisitions
    if let Some(&key) = registry.by_name.get(name) {
        return Symbol {
            key,
            name: Arc::clone(&registry.names[key]),
        };
    }

    let name: Arc<str> = Arc::from(name);
    let key = registry.names.insert(Arc::clone(&name));
    registry.by_name.insert(Arc::clone(&name), key);
    Symbol { key, name }
}

fn lookup(name: &str) -> Option<Symbol> {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    registry.by_name.get(name).map(|&key| Symbol {
        key,
        name: Arc::clone(&registry.names[key]),
    })
}

/// Convenience function to create a `Symbol`
pub fn symb(name: &str) -> Symbol {
    Symbol::new(name)
}

/// Check whether `name` has been interned yet
pub fn symbol_exists(name: &str) -> bool {
    lookup(name).is_some()
}
