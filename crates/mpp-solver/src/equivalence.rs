//! Type equivalence oracle for expect/actual matching.
//!
//! Two types are compared after fully expanding type aliases, each in the
//! session of the side it came from. Class constructors are then equal when
//! their fully qualified names match, or when one of them is an expected
//! class that the other side's session implements with an actual typealias
//! expanding to the other constructor:
//!
//! ```text
//! // common                         // jvm
//! expect class StringBuilder        actual typealias StringBuilder = java.lang.StringBuilder
//! expect fun f(sb: StringBuilder)   actual fun f(sb: java.lang.StringBuilder)
//! ```
//!
//! Error types are governed by [`ErrorTypePolicy`].

use crate::recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
use crate::substitution::Substitutor;
use mpp_common::Atom;
use mpp_model::{Session, TypeArgument, TypeArguments, TypeData, TypeId};
use tracing::trace;

/// How unresolved types take part in comparisons.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorTypePolicy {
    /// An error type equals anything. Keeps an unresolved reference from
    /// cascading into a spurious incompatibility.
    #[default]
    EqualToAnything,
    /// An error type equals nothing, not even another error type.
    NeverEqual,
}

/// Oracle consulted by the compatibility evaluator for every type position.
pub trait TypeEquivalence {
    fn types_equal(
        &self,
        expected: TypeId,
        actual: TypeId,
        expected_session: &Session<'_>,
        actual_session: &Session<'_>,
    ) -> bool;

    /// Optional types (receivers): both absent, or both present and equal.
    fn optional_types_equal(
        &self,
        expected: Option<TypeId>,
        actual: Option<TypeId>,
        expected_session: &Session<'_>,
        actual_session: &Session<'_>,
    ) -> bool {
        match (expected, actual) {
            (None, None) => true,
            (Some(expected), Some(actual)) => {
                self.types_equal(expected, actual, expected_session, actual_session)
            }
            _ => false,
        }
    }

    /// Pairwise comparison of two lists of the same length.
    fn type_lists_equal(
        &self,
        expected: &[TypeId],
        actual: &[TypeId],
        expected_session: &Session<'_>,
        actual_session: &Session<'_>,
    ) -> bool {
        expected.len() == actual.len()
            && expected
                .iter()
                .zip(actual)
                .all(|(&e, &a)| self.types_equal(e, a, expected_session, actual_session))
    }
}

/// Default oracle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpectActualTypeChecker {
    error_types: ErrorTypePolicy,
}

impl ExpectActualTypeChecker {
    pub const fn new(error_types: ErrorTypePolicy) -> Self {
        Self { error_types }
    }

    pub const fn error_types(&self) -> ErrorTypePolicy {
        self.error_types
    }

    fn equal(
        &self,
        expected: TypeId,
        actual: TypeId,
        es: &Session<'_>,
        as_: &Session<'_>,
        depth: &mut DepthCounter,
    ) -> bool {
        let types = es.store().types();
        let e = types.lookup(expected);
        let a = types.lookup(actual);

        if matches!(*e, TypeData::Error) || matches!(*a, TypeData::Error) {
            return self.error_types == ErrorTypePolicy::EqualToAnything;
        }
        if expected == actual {
            return true;
        }
        if !depth.enter() {
            trace!("type comparison depth limit reached");
            return false;
        }

        let result = match (&*e, &*a) {
            (
                TypeData::TypeParameter {
                    param: p1,
                    nullable: n1,
                },
                TypeData::TypeParameter {
                    param: p2,
                    nullable: n2,
                },
            ) => p1 == p2 && n1 == n2,
            (
                TypeData::Class {
                    fq_name: f1,
                    args: args1,
                    nullable: n1,
                },
                TypeData::Class {
                    fq_name: f2,
                    args: args2,
                    nullable: n2,
                },
            ) => {
                n1 == n2
                    && args1.len() == args2.len()
                    && constructors_equal(*f1, *f2, es, as_)
                    && args1
                        .iter()
                        .zip(args2.iter())
                        .all(|(&x, &y)| self.arguments_equal(x, y, es, as_, depth))
            }
            _ => false,
        };
        depth.leave();
        result
    }

    fn arguments_equal(
        &self,
        expected: TypeArgument,
        actual: TypeArgument,
        es: &Session<'_>,
        as_: &Session<'_>,
        depth: &mut DepthCounter,
    ) -> bool {
        if !expected.same_projection(actual) {
            return false;
        }
        match (expected.type_id(), actual.type_id()) {
            (Some(e), Some(a)) => self.equal(e, a, es, as_, depth),
            _ => true,
        }
    }
}

impl TypeEquivalence for ExpectActualTypeChecker {
    fn types_equal(
        &self,
        expected: TypeId,
        actual: TypeId,
        expected_session: &Session<'_>,
        actual_session: &Session<'_>,
    ) -> bool {
        let expected = expand_type(expected_session, expected);
        let actual = expand_type(actual_session, actual);
        let mut depth = DepthCounter::with_profile(RecursionProfile::TypeStructure);
        self.equal(expected, actual, expected_session, actual_session, &mut depth)
    }
}

fn constructors_equal(a: Atom, b: Atom, es: &Session<'_>, as_: &Session<'_>) -> bool {
    a == b
        || is_expected_class_and_actual_alias(a, b, es, as_)
        || is_expected_class_and_actual_alias(b, a, es, as_)
}

/// `expect_name` is an expected class in `es`, and `as_` implements it with a
/// typealias that expands to `other`.
fn is_expected_class_and_actual_alias(
    expect_name: Atom,
    other: Atom,
    es: &Session<'_>,
    as_: &Session<'_>,
) -> bool {
    let Some(expected) = es.lookup_classifier(expect_name) else {
        return false;
    };
    let expected = es.decl(expected);
    if !expected.is_expect() || expected.as_class().is_none() {
        return false;
    }
    let Some(alias) = as_.lookup_classifier(expect_name) else {
        return false;
    };
    if as_.decl(alias).as_type_alias().is_none() {
        return false;
    }
    as_.expand_to_class(alias)
        .is_some_and(|class| as_.decl(class).fq_name == other)
}

/// Fully expand every type alias in `ty` as seen from `session`.
///
/// Alias arguments are substituted into the alias body; a star-projected
/// argument leaves the corresponding parameter unsubstituted. A cyclic alias
/// expands to the error type.
pub fn expand_type(session: &Session<'_>, ty: TypeId) -> TypeId {
    let mut aliases: RecursionGuard<Atom> =
        RecursionGuard::with_profile(RecursionProfile::AliasExpansion);
    let mut depth = DepthCounter::with_profile(RecursionProfile::TypeStructure);
    expand_inner(session, ty, &mut aliases, &mut depth)
}

fn expand_inner(
    session: &Session<'_>,
    ty: TypeId,
    aliases: &mut RecursionGuard<Atom>,
    depth: &mut DepthCounter,
) -> TypeId {
    let types = session.store().types();
    let data = types.lookup(ty);
    let TypeData::Class {
        fq_name,
        args,
        nullable,
    } = &*data
    else {
        return ty;
    };
    if !depth.enter() {
        return ty;
    }

    let new_args: TypeArguments = args
        .iter()
        .map(|&arg| match arg.type_id() {
            Some(inner) => arg.with_type(expand_inner(session, inner, aliases, depth)),
            None => arg,
        })
        .collect();

    let alias = session
        .lookup_classifier(*fq_name)
        .map(|id| session.decl(id))
        .and_then(|decl| decl.as_type_alias().map(|alias| (decl, alias)));

    let result = match alias {
        Some((decl, alias)) => match aliases.enter(*fq_name) {
            RecursionResult::Entered => {
                let pairs = decl
                    .type_params
                    .iter()
                    .zip(new_args.iter())
                    .filter_map(|(&param, arg)| arg.type_id().map(|ty| (param, ty)));
                let body = Substitutor::from_pairs(pairs, None).substitute(types, alias.expanded);
                let expanded = expand_inner(session, body, aliases, depth);
                aliases.leave(*fq_name);
                if *nullable {
                    types.with_nullability(expanded, true)
                } else {
                    expanded
                }
            }
            denied => {
                trace!(
                    alias = session.store().resolve(*fq_name),
                    reason = ?denied,
                    "type alias does not expand"
                );
                TypeId::ERROR
            }
        },
        None if new_args == *args => ty,
        None => types.class(*fq_name, new_args, *nullable),
    };
    depth.leave();
    result
}

#[cfg(test)]
#[path = "tests/equivalence_unit_tests.rs"]
mod tests;
