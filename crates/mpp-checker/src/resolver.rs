//! Expect lookup for actual declarations.
//!
//! `ExpectActualResolver::find_expect_for_actual` collects the expected
//! candidates of an actual declaration, evaluates each of them and groups
//! the candidates by verdict. Results are memoised per declaration in a
//! cache whose concurrency policy the host picks:
//!
//! - one resolver per thread with a private `ThreadUnsafeCache`, or
//! - one resolver per worker thread, all sharing a `ThreadSafeCache`
//!   through an `Arc`.
//!
//! The resolver itself holds per-thread state (the class-scope recursion
//! guard) and is never shared.

use crate::candidates::CandidateCollector;
use crate::compatibility::{Compatibility, CompatibilityMap};
use crate::context::CheckerOptions;
use crate::matcher::CompatibilityEvaluator;
use mpp_model::{DeclId, DeclarationStore};
use mpp_solver::{
    CachePolicy, CacheStorage, ExpectActualTypeChecker, Substitutor, ThreadSafeCache,
    ThreadUnsafeCache, TypeEquivalence,
};
use std::sync::Arc;
use tracing::debug;

/// Memoised result of one lookup.
pub type Resolution = Option<Arc<CompatibilityMap>>;

/// Resolution cache shared between worker threads.
pub type SharedResolutionCache = Arc<ThreadSafeCache<DeclId, Resolution>>;

/// Resolution cache with the policy picked at construction.
pub enum ResolutionCache {
    Local(ThreadUnsafeCache<DeclId, Resolution>),
    Shared(SharedResolutionCache),
}

impl ResolutionCache {
    pub fn new(policy: CachePolicy) -> Self {
        match policy {
            CachePolicy::ThreadUnsafe => ResolutionCache::Local(ThreadUnsafeCache::new()),
            CachePolicy::ThreadSafe => ResolutionCache::Shared(Arc::new(ThreadSafeCache::new())),
        }
    }

    /// A new handle on the same storage; `None` for a thread-local cache.
    pub fn share(&self) -> Option<SharedResolutionCache> {
        match self {
            ResolutionCache::Local(_) => None,
            ResolutionCache::Shared(cache) => Some(Arc::clone(cache)),
        }
    }
}

impl CacheStorage<DeclId, Resolution> for ResolutionCache {
    fn get(&self, key: &DeclId) -> Option<Resolution> {
        match self {
            ResolutionCache::Local(cache) => cache.get(key),
            ResolutionCache::Shared(cache) => cache.get(key),
        }
    }

    fn insert(&self, key: DeclId, value: Resolution) -> Resolution {
        match self {
            ResolutionCache::Local(cache) => cache.insert(key, value),
            ResolutionCache::Shared(cache) => cache.insert(key, value),
        }
    }

    fn len(&self) -> usize {
        match self {
            ResolutionCache::Local(cache) => cache.len(),
            ResolutionCache::Shared(cache) => cache.len(),
        }
    }

    fn clear(&self) {
        match self {
            ResolutionCache::Local(cache) => cache.clear(),
            ResolutionCache::Shared(cache) => cache.clear(),
        }
    }
}

pub struct ExpectActualResolver<'a, E = ExpectActualTypeChecker> {
    store: &'a DeclarationStore,
    collector: CandidateCollector<'a>,
    evaluator: CompatibilityEvaluator<'a, E>,
    cache: ResolutionCache,
}

impl<'a> ExpectActualResolver<'a> {
    pub fn new(store: &'a DeclarationStore, options: &CheckerOptions) -> Self {
        Self::with_equivalence(
            store,
            ExpectActualTypeChecker::new(options.error_types),
            ResolutionCache::new(options.cache_policy),
        )
    }

    /// A resolver backed by an existing shared cache.
    pub fn with_shared_cache(
        store: &'a DeclarationStore,
        options: &CheckerOptions,
        cache: SharedResolutionCache,
    ) -> Self {
        Self::with_equivalence(
            store,
            ExpectActualTypeChecker::new(options.error_types),
            ResolutionCache::Shared(cache),
        )
    }
}

impl<'a, E: TypeEquivalence> ExpectActualResolver<'a, E> {
    pub fn with_equivalence(
        store: &'a DeclarationStore,
        equivalence: E,
        cache: ResolutionCache,
    ) -> Self {
        ExpectActualResolver {
            store,
            collector: CandidateCollector::new(store),
            evaluator: CompatibilityEvaluator::new(store, equivalence),
            cache,
        }
    }

    pub fn store(&self) -> &'a DeclarationStore {
        self.store
    }

    pub fn evaluator(&self) -> &CompatibilityEvaluator<'a, E> {
        &self.evaluator
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Expected candidates of `actual` grouped by verdict.
    ///
    /// `None` when the lookup does not apply to the declaration (local
    /// declarations, classifiers without an expected class). A map is
    /// returned otherwise, empty when nothing has the same name.
    pub fn find_expect_for_actual(&self, actual: DeclId) -> Resolution {
        self.cache
            .get_or_compute(actual, || self.resolve(actual))
    }

    fn resolve(&self, actual: DeclId) -> Resolution {
        let store = self.store;
        let decl = store.decl(actual);
        let pool = self.collector.collect(actual)?;

        let mut map = CompatibilityMap::default();
        if decl.category().is_classifier() {
            for &expected in &pool.candidates {
                let verdict = self.evaluator.compare_classifiers(expected, actual);
                map.entry(verdict).or_default().push(expected);
            }
        } else {
            let type_params_of = |class: Option<DeclId>| {
                class.map_or(&[][..], |class| store.decl(class).type_params.as_slice())
            };
            let parent = Substitutor::build(
                store.types(),
                type_params_of(pool.expected_container),
                type_params_of(pool.actual_container),
                None,
            );
            for &expected in &pool.candidates {
                let verdict = self.evaluator.compare_callables(
                    expected,
                    actual,
                    Some(&parent),
                    pool.expected_container,
                    pool.actual_container,
                );
                map.entry(verdict).or_default().push(expected);
            }
        }

        debug!(
            actual = store.resolve(decl.fq_name),
            candidates = pool.candidates.len(),
            compatible = map
                .get(&Compatibility::Compatible)
                .map_or(0, Vec::len),
            verdicts = map.len(),
            "resolved expect for actual"
        );
        Some(Arc::new(map))
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
