//! Centralized limits and thresholds for the expect/actual checker.
//!
//! Declaration trees supplied by the host are assumed to be finite and
//! acyclic, but nothing in the model enforces that. These limits keep a
//! malformed tree from overflowing the stack.
//!
//! Solver recursion guards are built from these constants through
//! `mpp_solver::recursion::RecursionProfile`.

/// Maximum nesting depth of class-scope matching.
///
/// Matching an expected class compares its nested classes, whose scopes are
/// compared in turn. Real code rarely nests more than a handful of levels.
pub const MAX_CLASS_SCOPE_DEPTH: u32 = 64;

/// Maximum number of type-alias hops followed when expanding a type.
///
/// `typealias A = B; typealias B = C; ...` chains are legal but short; a
/// longer chain almost certainly means the host produced a cycle.
pub const MAX_ALIAS_EXPANSION_DEPTH: u32 = 32;

/// Maximum nesting depth of a type when substituting or comparing.
pub const MAX_TYPE_DEPTH: u32 = 128;

/// Total work budget shared by every recursion guard.
pub const MAX_GUARD_ITERATIONS: u32 = 100_000;
