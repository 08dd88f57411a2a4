//! Checker configuration.

use mpp_solver::{CachePolicy, ErrorTypePolicy};

/// Options for the expect/actual checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Multiplatform projects only; when off the checker reports nothing.
    pub multiplatform: bool,
    /// How unresolved types compare while matching signatures.
    pub error_types: ErrorTypePolicy,
    /// Storage for memoised resolution results.
    pub cache_policy: CachePolicy,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            multiplatform: true,
            error_types: ErrorTypePolicy::default(),
            cache_policy: CachePolicy::default(),
        }
    }
}

impl CheckerOptions {
    pub fn with_error_types(mut self, error_types: ErrorTypePolicy) -> Self {
        self.error_types = error_types;
        self
    }

    pub fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    pub fn with_multiplatform(mut self, multiplatform: bool) -> Self {
        self.multiplatform = multiplatform;
        self
    }
}
