//! Expected-side candidates for an actual declaration.

use mpp_model::{DeclId, Declaration, DeclarationCategory, DeclarationStore};
use smallvec::SmallVec;
use tracing::trace;

/// Candidate expected declarations plus the containing classes a member
/// callable is matched in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidatePool {
    pub candidates: SmallVec<[DeclId; 4]>,
    /// Expected class corresponding to the actual member's container.
    pub expected_container: Option<DeclId>,
    /// The actual member's own container.
    pub actual_container: Option<DeclId>,
}

impl CandidatePool {
    fn top_level(candidates: impl IntoIterator<Item = DeclId>) -> Self {
        CandidatePool {
            candidates: candidates.into_iter().collect(),
            ..CandidatePool::default()
        }
    }
}

/// Enumerates same-named expected declarations visible from an actual
/// declaration's module through its dependencies.
#[derive(Copy, Clone, Debug)]
pub struct CandidateCollector<'a> {
    store: &'a DeclarationStore,
}

impl<'a> CandidateCollector<'a> {
    pub const fn new(store: &'a DeclarationStore) -> Self {
        CandidateCollector { store }
    }

    /// `None` when the lookup does not apply (local declarations, a
    /// classifier without an expected class); otherwise the pool, possibly
    /// empty.
    ///
    /// The actual declaration itself and anything not marked `expect` are
    /// never candidates.
    pub fn collect(&self, actual: DeclId) -> Option<CandidatePool> {
        let decl = self.store.decl(actual);
        let mut pool = if decl.category().is_classifier() {
            self.classifier_candidates(decl)?
        } else {
            self.callable_candidates(decl)?
        };
        pool.candidates.retain(|&mut candidate| {
            candidate != actual && self.store.decl(candidate).is_expect()
        });
        trace!(
            actual = self.store.resolve(decl.fq_name),
            candidates = pool.candidates.len(),
            "collected expect candidates"
        );
        Some(pool)
    }

    fn callable_candidates(&self, decl: &Declaration) -> Option<CandidatePool> {
        if decl.is_local() {
            return None;
        }
        let session = self.store.session(decl.module);

        let Some(container) = decl.container else {
            return Some(CandidatePool::top_level(
                session.dependency_package_members(decl.package, decl.name),
            ));
        };

        let container_name = self.store.decl(container).fq_name;
        let expected_container = session
            .lookup_dependency_classifier(container_name)
            .and_then(|class| session.session_of(class).expand_to_class(class));

        let candidates = match expected_container {
            None => SmallVec::new(),
            Some(class) if decl.category() == DeclarationCategory::Constructor => {
                session.constructors(class)
            }
            Some(class) => session
                .members_named(class, decl.name)
                .into_iter()
                .filter(|&member| self.store.decl(member).category().is_callable())
                .collect(),
        };

        Some(CandidatePool {
            candidates,
            expected_container,
            actual_container: Some(container),
        })
    }

    fn classifier_candidates(&self, decl: &Declaration) -> Option<CandidatePool> {
        if decl.is_local() {
            return None;
        }
        let session = self.store.session(decl.module);
        let expected = session.lookup_dependency_classifier(decl.fq_name)?;
        let expected_decl = self.store.decl(expected);
        if expected_decl.as_class().is_none() || !expected_decl.is_expect() {
            trace!(
                actual = self.store.resolve(decl.fq_name),
                "no expected class with this name"
            );
            return None;
        }
        Some(CandidatePool::top_level([expected]))
    }
}

#[cfg(test)]
#[path = "tests/candidates_tests.rs"]
mod tests;
