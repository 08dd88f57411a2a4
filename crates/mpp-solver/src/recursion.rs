//! Bounded recursion over host-provided declaration graphs.
//!
//! Nothing the host hands over is checked for cycles: a type alias may
//! expand to itself, an actual class can reach its own scope again through
//! an alias of a nested class, and types nest without bound. Every
//! recursive walk in the solver and checker goes through one of two guards:
//!
//! - [`RecursionGuard`] for keyed walks (alias names, class pairs), which
//!   detects re-entry of an active key and bounds depth and total work;
//! - [`DepthCounter`] for structural walks over one type, where the same
//!   `TypeId` legitimately shows up at several positions.
//!
//! Limits come from [`RecursionProfile`], which reads `mpp_common::limits`.
//! Debug builds panic when a guard is dropped while still holding entries.

use mpp_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Where a guard is used; selects its limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Expected/actual class pairs while matching nested class scopes.
    ClassScope,
    /// Alias names while expanding type aliases.
    AliasExpansion,
    /// Substitution, comparison and rendering of a single type.
    TypeStructure,
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::ClassScope => limits::MAX_CLASS_SCOPE_DEPTH,
            Self::AliasExpansion => limits::MAX_ALIAS_EXPANSION_DEPTH,
            Self::TypeStructure => limits::MAX_TYPE_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::Custom { max_iterations, .. } => max_iterations,
            _ => limits::MAX_GUARD_ITERATIONS,
        }
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is active further up the stack.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub const fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

/// Keyed guard: cycle detection plus depth and iteration limits.
///
/// Every `Entered` must be paired with a `leave` of the same key. Callers
/// that do not need the guard inside the guarded computation can use
/// [`scope`](Self::scope) instead.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    active: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        RecursionGuard {
            active: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);
        let denied = if self.iterations > self.max_iterations {
            RecursionResult::IterationExceeded
        } else if self.depth >= self.max_depth {
            RecursionResult::DepthExceeded
        } else if !self.active.insert(key) {
            return RecursionResult::Cycle;
        } else {
            self.depth += 1;
            return RecursionResult::Entered;
        };
        self.exceeded = true;
        denied
    }

    pub fn leave(&mut self, key: K) {
        let removed = self.active.remove(&key);
        debug_assert!(removed, "leaving a key that was never entered");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `f` under `key`; the denial reason when entry is refused.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce() -> T) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let value = f();
                self.leave(key);
                Ok(value)
            }
            denied => Err(denied),
        }
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Set by the first denied-by-limit entry; cleared only by `reset`.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    /// Start a fresh walk. Only valid at depth 0.
    pub fn reset(&mut self) {
        debug_assert!(self.active.is_empty(), "reset inside an active walk");
        self.active.clear();
        self.depth = 0;
        self.iterations = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.active.is_empty() {
            panic!("recursion guard dropped with {} active keys", self.active.len());
        }
    }
}

/// Depth-only guard. `enter` returning `false` means the limit was hit and
/// there is nothing to `leave`.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        DepthCounter {
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth < self.max_depth {
            self.depth += 1;
            true
        } else {
            self.exceeded = true;
            false
        }
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced DepthCounter::leave");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!("depth counter dropped at depth {}", self.depth);
        }
    }
}

#[cfg(test)]
#[path = "tests/recursion_tests.rs"]
mod tests;
