//! Classifier compatibility and class-scope member matching.

use crate::compatibility::{Compatibility, Incompatibility, IncompatibilityMap, UnfulfilledMember};
use crate::matcher::{CompatibilityEvaluator, modalities_compatible};
use mpp_model::{DeclId, DeclarationCategory, TypeId};
use mpp_solver::{RecursionResult, Substitutor, TypeEquivalence};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::trace;

impl<'a, E: TypeEquivalence> CompatibilityEvaluator<'a, E> {
    /// Compare an expected class against an actual class or type alias.
    ///
    /// An actual type alias that does not expand to a class is reported as
    /// compatible: the broken alias gets its own diagnostic elsewhere.
    pub fn compare_classifiers(&self, expected: DeclId, actual: DeclId) -> Compatibility {
        let store = self.store;
        let actual_decl = store.decl(actual);
        let actual_class = if actual_decl.as_type_alias().is_some() {
            match store.session(actual_decl.module).expand_to_class(actual) {
                Some(class) => class,
                None => {
                    trace!(alias = %actual, "actual type alias does not expand to a class");
                    return Compatibility::Compatible;
                }
            }
        } else {
            actual
        };

        let result = self.classifier_compatibility(expected, actual_class);
        trace!(
            expected = %expected,
            actual = %actual,
            verdict = result.incompatibility().map_or("Compatible", Incompatibility::name),
            "compared classifiers"
        );
        result
    }

    fn classifier_compatibility(&self, expected: DeclId, actual: DeclId) -> Compatibility {
        let store = self.store;
        let e = store.decl(expected);
        let a = store.decl(actual);
        let (Some(ed), Some(ad)) = (e.as_class(), a.as_class()) else {
            unreachable!("compare_classifiers called without an expected and an actual class");
        };
        let es = store.session(e.module);
        let as_ = store.session(a.module);

        if ed.class_kind != ad.class_kind {
            return Incompatibility::ClassKind.into();
        }
        if ed.modifiers != ad.modifiers {
            return Incompatibility::ClassModifiers.into();
        }
        if e.type_params.len() != a.type_params.len() {
            return Incompatibility::TypeParameterCount.into();
        }
        if !modalities_compatible(e.modality, a.modality) {
            return Incompatibility::Modality.into();
        }
        if e.visibility != a.visibility {
            return Incompatibility::Visibility.into();
        }

        let types = store.types();
        let subst = Substitutor::build(types, &e.type_params, &a.type_params, None);
        if let Some(reason) =
            self.type_parameters_incompatibility(&e.type_params, &a.type_params, &subst, &es, &as_)
        {
            return reason.into();
        }

        let any = store.any_name();
        let not_any = |ty: &&TypeId| types.class_name(**ty) != Some(any);
        let actual_supertypes: SmallVec<[_; 4]> = ad.supertypes.iter().filter(not_any).collect();
        let supertypes_present = ed.supertypes.iter().filter(not_any).all(|&expected_super| {
            let expected_super = subst.substitute(types, expected_super);
            actual_supertypes
                .iter()
                .any(|&&actual_super| self.equivalence.types_equal(expected_super, actual_super, &es, &as_))
        });
        if !supertypes_present {
            return Incompatibility::Supertypes.into();
        }

        self.compare_class_scopes(expected, actual, &subst)
    }

    /// Every non-static, non-synthetic member of the expected class needs a
    /// compatible counterpart in the actual class.
    ///
    /// Re-entering a pair of classes already being matched further up the
    /// stack counts as compatible; so does running past the nesting limit.
    pub(crate) fn compare_class_scopes(
        &self,
        expected: DeclId,
        actual: DeclId,
        subst: &Arc<Substitutor>,
    ) -> Compatibility {
        let key = (expected, actual);
        let entered = self.scopes.borrow_mut().enter(key);
        if entered != RecursionResult::Entered {
            trace!(expected = %expected, actual = %actual, reason = ?entered, "class scope not entered");
            return Compatibility::Compatible;
        }

        let result = self.class_scopes_compatibility(expected, actual, subst);

        let mut scopes = self.scopes.borrow_mut();
        scopes.leave(key);
        if scopes.depth() == 0 {
            scopes.reset();
        }
        result
    }

    fn class_scopes_compatibility(
        &self,
        expected: DeclId,
        actual: DeclId,
        subst: &Arc<Substitutor>,
    ) -> Compatibility {
        let store = self.store;
        let e = store.decl(expected);
        let a = store.decl(actual);
        let (Some(ed), Some(ad)) = (e.as_class(), a.as_class()) else {
            return Compatibility::Compatible;
        };
        let actual_session = store.session(a.module);

        let mut unfulfilled = Vec::new();
        for &member in &ed.members {
            let m = store.decl(member);
            if m.is_static() || m.is_synthetic() {
                continue;
            }
            let category = m.category();
            let candidates: SmallVec<[DeclId; 4]> = match category {
                DeclarationCategory::Constructor => actual_session.constructors(actual),
                // Nested type aliases do not exist; nothing to match them against.
                DeclarationCategory::TypeAlias => continue,
                DeclarationCategory::Class => actual_session
                    .members_named(actual, m.name)
                    .into_iter()
                    .filter(|&c| store.decl(c).category() == DeclarationCategory::Class)
                    .collect(),
                _ => actual_session
                    .members_named(actual, m.name)
                    .into_iter()
                    .filter(|&c| store.decl(c).category().is_callable())
                    .collect(),
            };

            let mut incompatibilities = IncompatibilityMap::default();
            let mut fulfilled = false;
            for candidate in candidates {
                let verdict = if category == DeclarationCategory::Class {
                    self.compare_classifiers(member, candidate)
                } else {
                    self.compare_callables(member, candidate, Some(subst), Some(expected), Some(actual))
                };
                match verdict {
                    Compatibility::Compatible => {
                        fulfilled = true;
                        break;
                    }
                    Compatibility::Incompatible(reason) => {
                        incompatibilities.entry(reason).or_default().push(candidate);
                    }
                }
            }
            if !fulfilled {
                trace!(
                    member = store.resolve(m.fq_name),
                    candidates = incompatibilities.values().map(Vec::len).sum::<usize>(),
                    "expected member has no compatible actual member"
                );
                unfulfilled.push(UnfulfilledMember {
                    expected: member,
                    incompatibilities,
                });
            }
        }

        if e.is_enum_class() {
            let actual_entries: FxHashSet<_> = ad.enum_entries.iter().collect();
            if !ed.enum_entries.iter().all(|entry| actual_entries.contains(entry)) {
                return Incompatibility::EnumEntries.into();
            }
        }

        if unfulfilled.is_empty() {
            Compatibility::Compatible
        } else {
            Incompatibility::ClassScopes(unfulfilled).into()
        }
    }
}

#[cfg(test)]
#[path = "tests/class_scopes_tests.rs"]
mod tests;
