//! Pairwise compatibility of one expected and one actual declaration.
//!
//! `CompatibilityEvaluator` runs the ordered check sequence for a pair of
//! declarations of the same category and stops at the first failing check.
//! The order is significant: a parameter count mismatch hides a return type
//! mismatch, and the strong checks all come before the weak ones.
//!
//! Types are compared through a [`TypeEquivalence`] oracle after the
//! expected side has been rewritten into the actual side's type parameters
//! by a [`Substitutor`]. For class members the substitutor chains to the one
//! built for the containing classes.

use crate::compatibility::{Compatibility, Incompatibility};
use mpp_model::{
    CallableData, CallableKind, DeclId, Declaration, DeclarationStore, FunctionModifiers, Modality,
    PropertyModifiers, Session, TypeParamId,
};
use mpp_solver::{
    ExpectActualTypeChecker, RecursionGuard, RecursionProfile, Substitutor, TypeEquivalence,
};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

/// Pairwise evaluator, generic over the type equivalence oracle.
///
/// Holds the guard for nested class-scope matching, so one evaluator must not
/// be shared between threads; build one per worker.
pub struct CompatibilityEvaluator<'a, E = ExpectActualTypeChecker> {
    pub(crate) store: &'a DeclarationStore,
    pub(crate) equivalence: E,
    pub(crate) scopes: RefCell<RecursionGuard<(DeclId, DeclId)>>,
}

impl<'a, E: TypeEquivalence> CompatibilityEvaluator<'a, E> {
    pub fn new(store: &'a DeclarationStore, equivalence: E) -> Self {
        CompatibilityEvaluator {
            store,
            equivalence,
            scopes: RefCell::new(RecursionGuard::with_profile(RecursionProfile::ClassScope)),
        }
    }

    pub fn store(&self) -> &'a DeclarationStore {
        self.store
    }

    pub fn equivalence(&self) -> &E {
        &self.equivalence
    }

    /// Compare two declarations of the same category.
    ///
    /// # Panics
    ///
    /// When one declaration is a classifier and the other a callable.
    pub fn compare(
        &self,
        expected: DeclId,
        actual: DeclId,
        parent: Option<&Arc<Substitutor>>,
        expected_container: Option<DeclId>,
        actual_container: Option<DeclId>,
    ) -> Compatibility {
        let e = self.store.decl(expected).category();
        let a = self.store.decl(actual).category();
        assert_eq!(
            e.is_classifier(),
            a.is_classifier(),
            "cannot compare {e:?} {expected} with {a:?} {actual}"
        );
        if e.is_classifier() {
            self.compare_classifiers(expected, actual)
        } else {
            self.compare_callables(expected, actual, parent, expected_container, actual_container)
        }
    }

    // =========================================================================
    // Callables
    // =========================================================================

    /// Compare a function, constructor or property against another one.
    ///
    /// `expected_container` and `actual_container` are the classes the pair
    /// was matched in, if any.
    pub fn compare_callables(
        &self,
        expected: DeclId,
        actual: DeclId,
        parent: Option<&Arc<Substitutor>>,
        expected_container: Option<DeclId>,
        actual_container: Option<DeclId>,
    ) -> Compatibility {
        let result = self.callable_compatibility(
            expected,
            actual,
            parent,
            expected_container,
            actual_container,
        );
        trace!(
            expected = %expected,
            actual = %actual,
            verdict = result.incompatibility().map_or("Compatible", Incompatibility::name),
            "compared callables"
        );
        result
    }

    fn callable_compatibility(
        &self,
        expected: DeclId,
        actual: DeclId,
        parent: Option<&Arc<Substitutor>>,
        expected_container: Option<DeclId>,
        actual_container: Option<DeclId>,
    ) -> Compatibility {
        let store = self.store;
        let e = store.decl(expected);
        let a = store.decl(actual);
        let (Some(ec), Some(ac)) = (e.as_callable(), a.as_callable()) else {
            unreachable!("compare_callables called with a classifier");
        };
        let es = store.session(e.module);
        let as_ = store.session(a.module);

        let is_constructor = |c: &CallableData| matches!(c.kind, CallableKind::Constructor { .. });

        if is_constructor(ec)
            && is_constructor(ac)
            && self.is_enum_class(expected_container)
            && self.is_enum_class(actual_container)
        {
            return Compatibility::Compatible;
        }

        // A callable only matches one of its own kind.
        if std::mem::discriminant(&ec.kind) != std::mem::discriminant(&ac.kind) {
            return Incompatibility::CallableKind.into();
        }
        if ec.receiver.is_some() != ac.receiver.is_some() {
            return Incompatibility::ParameterShape.into();
        }
        if !self.value_parameter_counts_compatible(e, ec, a, ac) {
            return Incompatibility::ParameterCount.into();
        }
        if e.type_params.len() != a.type_params.len() {
            return Incompatibility::TypeParameterCount.into();
        }

        let types = store.types();
        let subst = Substitutor::build(types, &e.type_params, &a.type_params, parent);

        let params_equal = ec.value_params.iter().zip(&ac.value_params).all(|(ep, ap)| {
            self.equivalence
                .types_equal(subst.substitute(types, ep.ty), ap.ty, &es, &as_)
        });
        let expected_receiver = ec.receiver.map(|ty| subst.substitute(types, ty));
        if !params_equal
            || !self
                .equivalence
                .optional_types_equal(expected_receiver, ac.receiver, &es, &as_)
        {
            return Incompatibility::ParameterTypes.into();
        }

        let expected_return = subst.substitute(types, ec.return_type);
        if !self
            .equivalence
            .types_equal(expected_return, ac.return_type, &es, &as_)
        {
            return Incompatibility::ReturnType.into();
        }

        if !self.type_parameter_names_equal(&e.type_params, &a.type_params) {
            return Incompatibility::TypeParameterNames.into();
        }

        let expected_container_modality = e.container.map(|c| store.decl(c).modality);
        let actual_container_modality = actual_container.map(|c| store.decl(c).modality);
        if !member_modalities_compatible(
            e.modality,
            a.modality,
            expected_container_modality,
            actual_container_modality,
        ) {
            return Incompatibility::Modality.into();
        }

        if !callable_visibilities_compatible(e, a) {
            return Incompatibility::Visibility.into();
        }

        if let Some(reason) = self.type_parameters_incompatibility(
            &e.type_params,
            &a.type_params,
            &subst,
            &es,
            &as_,
        ) {
            return reason.into();
        }

        let pairs = || ec.value_params.iter().zip(&ac.value_params);
        if pairs().any(|(ep, ap)| ep.is_vararg != ap.is_vararg) {
            return Incompatibility::ValueParameterVararg.into();
        }

        if matches!(ec.kind, CallableKind::Function { .. }) && ec.is_inline() {
            if pairs().any(|(ep, ap)| !ep.is_noinline && ap.is_noinline) {
                return Incompatibility::ValueParameterNoinline.into();
            }
            if pairs().any(|(ep, ap)| !ep.is_crossinline && ap.is_crossinline) {
                return Incompatibility::ValueParameterCrossinline.into();
            }
        }

        match (ec.kind, ac.kind) {
            (
                CallableKind::Function { modifiers: em } | CallableKind::Constructor { modifiers: em, .. },
                CallableKind::Function { modifiers: am } | CallableKind::Constructor { modifiers: am, .. },
            ) => {
                if em.contains(FunctionModifiers::SUSPEND) != am.contains(FunctionModifiers::SUSPEND) {
                    return Incompatibility::FunctionModifiersDifferent.into();
                }
                let required = em & FunctionModifiers::SUBSET_CHECKED;
                if !am.contains(required) {
                    return Incompatibility::FunctionModifiersNotSubset.into();
                }
            }
            (
                CallableKind::Property {
                    is_var: e_var,
                    modifiers: em,
                },
                CallableKind::Property {
                    is_var: a_var,
                    modifiers: am,
                },
            ) => {
                if e_var != a_var {
                    return Incompatibility::PropertyKind.into();
                }
                let checked = PropertyModifiers::CONST | PropertyModifiers::LATEINIT;
                if em & checked != am & checked {
                    return Incompatibility::PropertyModifiers.into();
                }
            }
            _ => unreachable!("callable kinds were checked above"),
        }

        Compatibility::Compatible
    }

    fn is_enum_class(&self, class: Option<DeclId>) -> bool {
        class.is_some_and(|class| self.store.decl(class).is_enum_class())
    }

    fn is_annotation_constructor(&self, decl: &Declaration, callable: &CallableData) -> bool {
        matches!(callable.kind, CallableKind::Constructor { .. })
            && decl
                .container
                .is_some_and(|class| self.store.decl(class).is_annotation_class())
    }

    /// Equal counts, or an annotation constructor whose expected side takes
    /// nothing and whose actual parameters all have defaults.
    fn value_parameter_counts_compatible(
        &self,
        e: &Declaration,
        ec: &CallableData,
        a: &Declaration,
        ac: &CallableData,
    ) -> bool {
        if ec.value_params.len() == ac.value_params.len() {
            return true;
        }
        self.is_annotation_constructor(e, ec)
            && self.is_annotation_constructor(a, ac)
            && ec.value_params.is_empty()
            && ac.value_params.iter().all(|param| param.has_default())
    }

    fn type_parameter_names_equal(&self, expected: &[TypeParamId], actual: &[TypeParamId]) -> bool {
        expected.len() == actual.len()
            && expected
                .iter()
                .zip(actual)
                .all(|(&e, &a)| self.store.type_param(e).name == self.store.type_param(a).name)
    }

    /// Upper bounds, then variance, then reification.
    pub(crate) fn type_parameters_incompatibility(
        &self,
        expected: &[TypeParamId],
        actual: &[TypeParamId],
        subst: &Substitutor,
        es: &Session<'_>,
        as_: &Session<'_>,
    ) -> Option<Incompatibility> {
        let store = self.store;
        let types = store.types();
        let pairs = || {
            expected
                .iter()
                .zip(actual)
                .map(|(&e, &a)| (store.type_param(e), store.type_param(a)))
        };

        let bounds_equal = pairs().all(|(e, a)| {
            e.upper_bounds.len() == a.upper_bounds.len()
                && e.upper_bounds.iter().zip(&a.upper_bounds).all(|(&eb, &ab)| {
                    self.equivalence
                        .types_equal(subst.substitute(types, eb), ab, es, as_)
                })
        });
        if !bounds_equal {
            return Some(Incompatibility::TypeParameterUpperBounds);
        }
        if pairs().any(|(e, a)| e.variance != a.variance) {
            return Some(Incompatibility::TypeParameterVariance);
        }
        if pairs().any(|(e, a)| !e.is_reified && a.is_reified) {
            return Some(Incompatibility::TypeParameterReified);
        }
        None
    }
}

/// An actual declaration may open up a final expected one.
pub(crate) fn modalities_compatible(expected: Modality, actual: Modality) -> bool {
    expected == actual
        || (expected == Modality::Final && matches!(actual, Modality::Open | Modality::Abstract))
}

/// Member modalities also match when each side simply inherits the
/// modality of its containing class.
fn member_modalities_compatible(
    expected: Modality,
    actual: Modality,
    expected_container: Option<Modality>,
    actual_container: Option<Modality>,
) -> bool {
    if modalities_compatible(expected, actual) {
        return true;
    }
    match (expected_container, actual_container) {
        (Some(ec), Some(ac)) => expected == ec && actual == ac,
        _ => false,
    }
}

/// Overridable expected members need the exact visibility; final ones accept
/// an equal or more permissive actual visibility.
fn callable_visibilities_compatible(expected: &Declaration, actual: &Declaration) -> bool {
    if expected.modality != Modality::Final {
        return expected.visibility == actual.visibility;
    }
    matches!(
        expected.visibility.partial_cmp(&actual.visibility),
        Some(Ordering::Less | Ordering::Equal)
    )
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
