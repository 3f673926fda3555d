//! Interned record-field keys.
//!
//! Map lookup compares keys by token identity, never by string content.
//! The compiler assigns every distinct field name one [`Symbol`] through
//! the process-wide interner; generated code calls [`symbol`] once per
//! name (typically from static initializers) and passes the token around
//! as a plain `Copy` value.
//!
//! Interning is deterministic and collision-free: the same name always
//! yields the same token, distinct names always yield distinct tokens.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Interned, identity-comparable field-name token.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Symbol(NonZeroU32);

impl Symbol {
    /// The name this token was interned from.
    pub fn name(self) -> &'static str {
        interner().read().names[self.0.get() as usize - 1]
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name())
    }
}

struct Interner {
    /// Map from name content to its token.
    map: FxHashMap<&'static str, Symbol>,
    /// Token-indexed name storage (token N lives at index N - 1).
    names: Vec<&'static str>,
}

fn interner() -> &'static RwLock<Interner> {
    static INTERNER: OnceLock<RwLock<Interner>> = OnceLock::new();
    INTERNER.get_or_init(|| {
        RwLock::new(Interner {
            map: FxHashMap::default(),
            names: Vec::with_capacity(256),
        })
    })
}

/// Intern a field name, returning its stable token.
pub fn symbol(name: &str) -> Symbol {
    let lock = interner();

    // Fast path: already interned.
    {
        let guard = lock.read();
        if let Some(&sym) = guard.map.get(name) {
            return sym;
        }
    }

    let mut guard = lock.write();

    // Double-check after acquiring the write lock.
    if let Some(&sym) = guard.map.get(name) {
        return sym;
    }

    // Leak the name to get 'static lifetime; interned names live forever.
    let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());

    let Some(token) = u32::try_from(guard.names.len() + 1)
        .ok()
        .and_then(NonZeroU32::new)
    else {
        panic!("symbol interner exceeded capacity ({} names)", u32::MAX);
    };

    let sym = Symbol(token);
    guard.names.push(leaked);
    guard.map.insert(leaked, sym);
    sym
}

#[cfg(test)]
mod tests;
