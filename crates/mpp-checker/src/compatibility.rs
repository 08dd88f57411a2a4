//! Verdicts produced by expect/actual matching.
//!
//! A comparison of one expected declaration against one actual declaration
//! yields a [`Compatibility`]: either `Compatible` or a single
//! [`Incompatibility`] reason. Reasons are the outcome of an ordered,
//! short-circuit sequence of checks, so exactly one is ever reported.
//!
//! Every reason carries a severity ([`IncompatibilityKind`]). A STRONG
//! reason means the two declarations are not even the same shape (different
//! parameter lists, return types, callable kinds); a WEAK reason means they
//! line up structurally but disagree on a modifier. An actual declaration
//! without the `actual` keyword whose candidates are all STRONG mismatches is
//! simply an unrelated declaration and is not reported.

use indexmap::IndexMap;
use mpp_model::DeclId;
use rustc_hash::FxBuildHasher;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

/// Verdict map: candidates grouped by the verdict they produced, in the
/// order the verdicts were first seen.
pub type CompatibilityMap = IndexMap<Compatibility, Vec<DeclId>, FxBuildHasher>;

/// Actual candidates of one expected class member, grouped by reason.
pub type IncompatibilityMap = IndexMap<Incompatibility, Vec<DeclId>, FxBuildHasher>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IncompatibilityKind {
    Strong,
    Weak,
}

/// An expected class member with no compatible counterpart in the actual
/// class, and why each same-named actual member was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnfulfilledMember {
    pub expected: DeclId,
    /// Empty when the actual class has no same-named member at all.
    pub incompatibilities: IncompatibilityMap,
}

#[derive(Clone, Debug)]
pub enum Incompatibility {
    // Classifiers
    ClassKind,
    ClassModifiers,
    Supertypes,
    ClassScopes(Vec<UnfulfilledMember>),
    EnumEntries,

    // Shared by classifiers and callables
    TypeParameterCount,
    Modality,
    Visibility,
    TypeParameterUpperBounds,
    TypeParameterVariance,
    TypeParameterReified,

    // Callables
    CallableKind,
    ParameterShape,
    ParameterCount,
    ParameterTypes,
    ReturnType,
    TypeParameterNames,
    ValueParameterVararg,
    ValueParameterNoinline,
    ValueParameterCrossinline,
    FunctionModifiersDifferent,
    FunctionModifiersNotSubset,
    PropertyKind,
    PropertyModifiers,
}

impl Incompatibility {
    pub const fn kind(&self) -> IncompatibilityKind {
        match self {
            Incompatibility::CallableKind
            | Incompatibility::ParameterShape
            | Incompatibility::ParameterCount
            | Incompatibility::TypeParameterCount
            | Incompatibility::ParameterTypes
            | Incompatibility::ReturnType => IncompatibilityKind::Strong,
            _ => IncompatibilityKind::Weak,
        }
    }

    #[inline]
    pub const fn is_strong(&self) -> bool {
        matches!(self.kind(), IncompatibilityKind::Strong)
    }

    /// Variant name, for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Incompatibility::ClassKind => "ClassKind",
            Incompatibility::ClassModifiers => "ClassModifiers",
            Incompatibility::Supertypes => "Supertypes",
            Incompatibility::ClassScopes(_) => "ClassScopes",
            Incompatibility::EnumEntries => "EnumEntries",
            Incompatibility::TypeParameterCount => "TypeParameterCount",
            Incompatibility::Modality => "Modality",
            Incompatibility::Visibility => "Visibility",
            Incompatibility::TypeParameterUpperBounds => "TypeParameterUpperBounds",
            Incompatibility::TypeParameterVariance => "TypeParameterVariance",
            Incompatibility::TypeParameterReified => "TypeParameterReified",
            Incompatibility::CallableKind => "CallableKind",
            Incompatibility::ParameterShape => "ParameterShape",
            Incompatibility::ParameterCount => "ParameterCount",
            Incompatibility::ParameterTypes => "ParameterTypes",
            Incompatibility::ReturnType => "ReturnType",
            Incompatibility::TypeParameterNames => "TypeParameterNames",
            Incompatibility::ValueParameterVararg => "ValueParameterVararg",
            Incompatibility::ValueParameterNoinline => "ValueParameterNoinline",
            Incompatibility::ValueParameterCrossinline => "ValueParameterCrossinline",
            Incompatibility::FunctionModifiersDifferent => "FunctionModifiersDifferent",
            Incompatibility::FunctionModifiersNotSubset => "FunctionModifiersNotSubset",
            Incompatibility::PropertyKind => "PropertyKind",
            Incompatibility::PropertyModifiers => "PropertyModifiers",
        }
    }

    /// Reason text used in diagnostics ("... incompatible because {description}").
    pub const fn description(&self) -> &'static str {
        match self {
            Incompatibility::ClassKind => {
                "class kinds are different (class, interface, object, enum, annotation)"
            }
            Incompatibility::ClassModifiers => "modifiers are different (companion, inner, inline)",
            Incompatibility::Supertypes => "some supertypes are missing in the actual declaration",
            Incompatibility::ClassScopes(_) => "some expected members have no actual ones",
            Incompatibility::EnumEntries => {
                "some entries from expected enum are missing in the actual enum"
            }
            Incompatibility::TypeParameterCount => "number of type parameters is different",
            Incompatibility::Modality => "modality is different",
            Incompatibility::Visibility => "visibility is different",
            Incompatibility::TypeParameterUpperBounds => {
                "upper bounds of type parameters are different"
            }
            Incompatibility::TypeParameterVariance => {
                "declaration-site variances of type parameters are different"
            }
            Incompatibility::TypeParameterReified => {
                "some type parameter is reified in one declaration and non-reified in the other"
            }
            Incompatibility::CallableKind => "callable kinds are different (function vs property)",
            Incompatibility::ParameterShape => {
                "parameter shapes are different (extension vs non-extension)"
            }
            Incompatibility::ParameterCount => "number of value parameters is different",
            Incompatibility::ParameterTypes => "parameter types are different",
            Incompatibility::ReturnType => "return type is different",
            Incompatibility::TypeParameterNames => "names of type parameters are different",
            Incompatibility::ValueParameterVararg => {
                "some value parameter is vararg in one declaration and non-vararg in the other"
            }
            Incompatibility::ValueParameterNoinline => {
                "some value parameter is noinline in one declaration and not noinline in the other"
            }
            Incompatibility::ValueParameterCrossinline => {
                "some value parameter is crossinline in one declaration and not crossinline in the other"
            }
            Incompatibility::FunctionModifiersDifferent => "modifiers are different (suspend)",
            Incompatibility::FunctionModifiersNotSubset => {
                "some modifiers on expected declaration are missing on the actual one (external, infix, inline, operator, tailrec)"
            }
            Incompatibility::PropertyKind => "property kinds are different (val vs var)",
            Incompatibility::PropertyModifiers => "modifiers are different (const, lateinit)",
        }
    }

    /// Expected members left unmatched, for `ClassScopes`.
    pub fn unfulfilled(&self) -> Option<&[UnfulfilledMember]> {
        match self {
            Incompatibility::ClassScopes(unfulfilled) => Some(unfulfilled),
            _ => None,
        }
    }
}

// Reasons group by tag. Two `ClassScopes` verdicts are the same key only
// when they leave the same expected members unfulfilled.
impl PartialEq for Incompatibility {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Incompatibility::ClassScopes(a), Incompatibility::ClassScopes(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.expected == y.expected)
            }
            _ => discriminant(self) == discriminant(other),
        }
    }
}

impl Eq for Incompatibility {}

impl Hash for Incompatibility {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Compatibility {
    Compatible,
    Incompatible(Incompatibility),
}

impl Compatibility {
    #[inline]
    pub const fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }

    pub const fn incompatibility(&self) -> Option<&Incompatibility> {
        match self {
            Compatibility::Compatible => None,
            Compatibility::Incompatible(reason) => Some(reason),
        }
    }

    /// `None` for `Compatible`.
    pub const fn kind(&self) -> Option<IncompatibilityKind> {
        match self {
            Compatibility::Compatible => None,
            Compatibility::Incompatible(reason) => Some(reason.kind()),
        }
    }

    /// Compatible, or incompatible only on a weak reason.
    pub const fn is_compatible_or_weak(&self) -> bool {
        !matches!(self.kind(), Some(IncompatibilityKind::Strong))
    }
}

impl From<Incompatibility> for Compatibility {
    fn from(reason: Incompatibility) -> Self {
        Compatibility::Incompatible(reason)
    }
}

/// Severity queries over verdict maps.
pub trait VerdictMapExt {
    /// Every key is a STRONG incompatibility (vacuously true when empty).
    fn all_strong(&self) -> bool;
}

impl VerdictMapExt for CompatibilityMap {
    fn all_strong(&self) -> bool {
        self.keys()
            .all(|verdict| verdict.incompatibility().is_some_and(Incompatibility::is_strong))
    }
}

impl VerdictMapExt for IncompatibilityMap {
    fn all_strong(&self) -> bool {
        self.keys().all(Incompatibility::is_strong)
    }
}

#[cfg(test)]
#[path = "tests/compatibility_tests.rs"]
mod tests;
