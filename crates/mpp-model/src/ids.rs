//! Arena handles.

use serde::Serialize;
use std::fmt;

/// Index of a declaration in `DeclarationStore`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(pub u32);

/// Index of a module in `DeclarationStore`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleId(pub u32);

/// Index of a type parameter in `DeclarationStore`.
///
/// Type parameters are allocated before the declaration that owns them so
/// that the owner's signature can already refer to them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeParamId(pub u32);

impl DeclId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl ModuleId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TypeParamId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}
