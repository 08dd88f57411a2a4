//! Expect/actual declaration resolver and checker.
//!
//! Matches platform-specific `actual` declarations against the `expect`
//! declarations of the modules they depend on.
//!
//! - `candidates`: same-named expected declarations visible through module
//!   dependencies
//! - `matcher` / `class_scopes`: ordered pairwise compatibility checks for
//!   callables and classifiers, including member-by-member class matching
//! - `resolver`: candidate evaluation grouped into a verdict map, memoised
//! - `ambiguity`: compatible candidates spread across several modules
//! - `checker`: verdicts to diagnostics
//! - `render`: declaration signatures for diagnostic messages

pub mod ambiguity;
pub mod candidates;
pub mod checker;
mod class_scopes;
pub mod compatibility;
pub mod context;
pub mod matcher;
pub mod render;
pub mod resolver;

pub use ambiguity::{AmbiguousExpects, find_ambiguous_expects};
pub use candidates::{CandidateCollector, CandidatePool};
pub use checker::ExpectActualChecker;
pub use compatibility::{
    Compatibility, CompatibilityMap, Incompatibility, IncompatibilityKind, IncompatibilityMap,
    UnfulfilledMember, VerdictMapExt,
};
pub use context::CheckerOptions;
pub use matcher::CompatibilityEvaluator;
pub use render::DeclarationRenderer;
pub use resolver::{ExpectActualResolver, Resolution, ResolutionCache, SharedResolutionCache};

#[cfg(test)]
#[path = "tests/fixture.rs"]
pub(crate) mod test_fixture;
