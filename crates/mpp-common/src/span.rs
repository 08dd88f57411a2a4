//! Source anchors.
//!
//! The checker never reads source text; it only forwards the location the
//! host attached to a declaration into the diagnostics it produces.

use crate::interner::Atom;
use serde::Serialize;

/// Location of a declaration in its source file (byte offsets).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceAnchor {
    /// Interned file path; `Atom::NONE` when the host has no file.
    pub file: Atom,
    pub start: u32,
    pub length: u32,
}

impl SourceAnchor {
    pub const fn new(file: Atom, start: u32, length: u32) -> Self {
        Self {
            file,
            start,
            length,
        }
    }

    /// Exclusive end offset.
    #[inline]
    pub const fn end(self) -> u32 {
        self.start.saturating_add(self.length)
    }

    #[inline]
    pub const fn is_synthetic(self) -> bool {
        self.file.0 == 0 && self.length == 0
    }
}
