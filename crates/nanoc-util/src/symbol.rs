//! String interning for identifiers.
//!
//! Every identifier the lexer scans is interned into a [`Symbol`]: a 4-byte
//! handle that compares in O(1) instead of carrying a heap-allocated
//! `String` through the symbol table on every lookup. Interned strings are
//! leaked onto a `'static` arena and never freed, which is fine for a
//! process that runs once per compilation and exits.

use std::fmt;
use std::sync::{OnceLock, RwLock};

use dashmap::DashMap;

/// A compact, interned identifier. Two symbols compare equal iff they were
/// interned from equal strings.
///
/// # Examples
///
/// ```
/// use nanoc_util::symbol::Symbol;
///
/// let a = Symbol::intern("total");
/// let b = Symbol::intern("total");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "total");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

static_assertions::assert_eq_size!(Symbol, u32);

impl Symbol {
    pub fn intern(text: &str) -> Symbol {
        interner().intern(text)
    }

    pub fn as_str(self) -> &'static str {
        interner().resolve(self)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread-safe interner: a concurrent map from text to index (`DashMap`,
/// matching the teacher's choice for this exact purpose) plus an
/// append-only reverse index from index back to text.
struct Interner {
    arena: bumpalo::Bump,
    by_text: DashMap<&'static str, u32, ahash::RandomState>,
    by_index: RwLock<Vec<&'static str>>,
}

// SAFETY: the arena only ever grows and leaked `&'static str`s are never
// invalidated; all mutable access to it is serialized by `by_index`'s lock.
unsafe impl Sync for Interner {}
unsafe impl Send for Interner {}

impl Interner {
    fn new() -> Self {
        Interner {
            arena: bumpalo::Bump::new(),
            by_text: DashMap::default(),
            by_index: RwLock::new(Vec::new()),
        }
    }

    fn intern(&self, text: &str) -> Symbol {
        if let Some(existing) = self.by_text.get(text) {
            return Symbol(*existing);
        }
        let mut by_index = self.by_index.write().expect("interner lock poisoned");
        // Re-check: another thread may have interned the same text while we
        // were waiting for the write lock.
        if let Some(existing) = self.by_text.get(text) {
            return Symbol(*existing);
        }
        let leaked = self.arena_alloc(text);
        let index = by_index.len() as u32;
        by_index.push(leaked);
        self.by_text.insert(leaked, index);
        Symbol(index)
    }

    fn arena_alloc(&self, text: &str) -> &'static str {
        let bytes = self.arena.alloc_slice_copy(text.as_bytes());
        // SAFETY: `bytes` was just copied from a valid UTF-8 `&str`, and the
        // arena is never deallocated or shrunk for the program's lifetime.
        unsafe { std::mem::transmute::<&str, &'static str>(std::str::from_utf8_unchecked(bytes)) }
    }

    fn resolve(&self, symbol: Symbol) -> &'static str {
        self.by_index.read().expect("interner lock poisoned")[symbol.0 as usize]
    }
}

fn interner() -> &'static Interner {
    static INTERNER: OnceLock<Interner> = OnceLock::new();
    INTERNER.get_or_init(Interner::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_same_symbol() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn different_text_interns_to_different_symbols() {
        let a = Symbol::intern("foo_distinct_1");
        let b = Symbol::intern("bar_distinct_2");
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "foo_distinct_1");
        assert_eq!(b.as_str(), "bar_distinct_2");
    }
}
