//! Type-parameter substitution.
//!
//! A `Substitutor` rewrites expected-side type-parameter references into
//! actual-side ones before two signatures are compared. Member substitutors
//! chain to the substitutor built for the containing classes: the local map
//! is applied first, then the parent (`parent ∘ local`).

use crate::recursion::{DepthCounter, RecursionProfile};
use mpp_model::{TypeData, TypeId, TypeInterner, TypeParamId};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitutor {
    map: FxHashMap<TypeParamId, TypeId>,
    parent: Option<Arc<Substitutor>>,
}

impl Substitutor {
    /// The substitutor that leaves every type unchanged.
    pub fn identity() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Map each expected type parameter to the (non-null) type of the actual
    /// parameter at the same position.
    ///
    /// Parameters are paired positionally; a size mismatch is the caller's
    /// concern (it is a `TypeParameterCount` verdict) and extra parameters on
    /// either side are ignored. With nothing to map, the parent (or the
    /// identity) is returned unchanged.
    pub fn build(
        types: &TypeInterner,
        expected: &[TypeParamId],
        actual: &[TypeParamId],
        parent: Option<&Arc<Substitutor>>,
    ) -> Arc<Self> {
        let map: FxHashMap<TypeParamId, TypeId> = expected
            .iter()
            .zip(actual)
            .map(|(&expected, &actual)| (expected, types.type_param(actual, false)))
            .collect();
        Self::chain(map, parent)
    }

    /// Substitutor from explicit `(parameter, replacement)` pairs.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (TypeParamId, TypeId)>,
        parent: Option<&Arc<Substitutor>>,
    ) -> Arc<Self> {
        Self::chain(pairs.into_iter().collect(), parent)
    }

    fn chain(map: FxHashMap<TypeParamId, TypeId>, parent: Option<&Arc<Substitutor>>) -> Arc<Self> {
        if map.is_empty() {
            return parent.cloned().unwrap_or_else(Self::identity);
        }
        Arc::new(Substitutor {
            map,
            parent: parent.filter(|parent| !parent.is_identity()).cloned(),
        })
    }

    pub fn is_identity(&self) -> bool {
        self.map.is_empty() && self.parent.as_ref().is_none_or(|parent| parent.is_identity())
    }

    /// Local replacement for `param`, ignoring the parent.
    pub fn local(&self, param: TypeParamId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn parent(&self) -> Option<&Arc<Substitutor>> {
        self.parent.as_ref()
    }

    /// Apply the substitution to `ty`.
    pub fn substitute(&self, types: &TypeInterner, ty: TypeId) -> TypeId {
        let mut depth = DepthCounter::with_profile(RecursionProfile::TypeStructure);
        let local = self.substitute_local(types, ty, &mut depth);
        match &self.parent {
            Some(parent) => parent.substitute(types, local),
            None => local,
        }
    }

    fn substitute_local(&self, types: &TypeInterner, ty: TypeId, depth: &mut DepthCounter) -> TypeId {
        if self.map.is_empty() {
            return ty;
        }
        if !depth.enter() {
            trace!(type_id = ty.0, "substitution depth limit reached");
            return ty;
        }
        let result = match &*types.lookup(ty) {
            TypeData::Error => ty,
            TypeData::TypeParameter { param, nullable } => match self.map.get(param) {
                Some(&replacement) if *nullable => types.with_nullability(replacement, true),
                Some(&replacement) => replacement,
                None => ty,
            },
            TypeData::Class {
                fq_name,
                args,
                nullable,
            } => {
                let mut changed = false;
                let new_args = args
                    .iter()
                    .map(|&arg| match arg.type_id() {
                        Some(inner) => {
                            let substituted = self.substitute_local(types, inner, depth);
                            changed |= substituted != inner;
                            arg.with_type(substituted)
                        }
                        None => arg,
                    })
                    .collect();
                if changed {
                    types.class(*fq_name, new_args, *nullable)
                } else {
                    ty
                }
            }
        };
        depth.leave();
        result
    }
}

#[cfg(test)]
#[path = "tests/substitution_tests.rs"]
mod tests;
