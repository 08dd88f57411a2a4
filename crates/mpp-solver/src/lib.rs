//! Type-level machinery for expect/actual matching.
//!
//! - `substitution`: expected-to-actual type-parameter substitution with
//!   parent chaining
//! - `equivalence`: the type equivalence oracle, including type-alias
//!   expansion and expected-class / actual-typealias identification
//! - `recursion`: cycle and depth guards shared by the checker
//! - `caches`: memoisation storage with a selectable concurrency policy
//! - `format`: type rendering for diagnostics

pub mod caches;
pub mod equivalence;
pub mod format;
pub mod recursion;
pub mod substitution;

pub use caches::{CachePolicy, CacheStorage, ThreadSafeCache, ThreadUnsafeCache};
pub use equivalence::{ErrorTypePolicy, ExpectActualTypeChecker, TypeEquivalence, expand_type};
pub use format::TypeFormatter;
pub use recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
pub use substitution::Substitutor;
