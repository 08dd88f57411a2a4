//! Name interning.
//!
//! Declaration names, packages, fq-names and file paths are interned once
//! while the model is built; the matcher only ever compares `Atom`s.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// Handle to an interned string. `Atom::NONE` is the empty string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

/// Names every store needs up front (`kotlin.Any` for supertype filtering,
/// `kotlin.Unit` as the default return type, the constructor name).
const PRELUDE: &[&str] = &[
    "kotlin",
    "kotlin.Any",
    "kotlin.Unit",
    "kotlin.Nothing",
    "kotlin.Int",
    "kotlin.Long",
    "kotlin.String",
    "kotlin.Boolean",
    "kotlin.Array",
    "<init>",
    "value",
];

/// ```
/// use mpp_common::interner::Interner;
/// let mut names = Interner::new();
/// let int = names.intern("kotlin.Int");
/// assert_eq!(names.intern("kotlin.Int"), int);
/// assert_eq!(names.resolve(int), "kotlin.Int");
/// ```
pub struct Interner {
    ids: FxHashMap<Arc<str>, Atom>,
    /// Slot 0 holds the empty string.
    strings: Vec<Arc<str>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let mut ids = FxHashMap::default();
        ids.insert(Arc::clone(&empty), Atom::NONE);
        Interner {
            ids,
            strings: vec![empty],
        }
    }

    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.ids.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let shared: Arc<str> = Arc::from(s);
        self.strings.push(Arc::clone(&shared));
        self.ids.insert(shared, atom);
        atom
    }

    /// Lookup without interning.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.ids.get(s).copied()
    }

    /// Unknown atoms resolve to the empty string.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings.get(atom.0 as usize).map_or("", |s| s)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Nothing interned beyond the empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }

    pub fn intern_common(&mut self) {
        for name in PRELUDE {
            self.intern(name);
        }
    }
}

#[cfg(test)]
#[path = "tests/interner_tests.rs"]
mod tests;
