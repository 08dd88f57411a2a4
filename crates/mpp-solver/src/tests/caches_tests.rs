use super::*;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

fn exercise<C: CacheStorage<u32, String>>(cache: &C) {
    assert!(cache.is_empty());
    let computed = cache.get_or_compute(1, || "one".to_string());
    assert_eq!(computed, "one");
    let cached = cache.get_or_compute(1, || panic!("must not recompute a cached key"));
    assert_eq!(cached, "one");

    assert_eq!(cache.insert(1, "uno".to_string()), "one", "first stored value wins");
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert_eq!(cache.get(&1), None);
}

#[test]
fn test_thread_unsafe_cache() {
    exercise(&ThreadUnsafeCache::<u32, String>::new());
}

#[test]
fn test_thread_safe_cache() {
    exercise(&ThreadSafeCache::<u32, String>::new());
}

#[test]
fn test_shared_cache_through_arc() {
    let shared: Arc<ThreadSafeCache<u32, String>> = Arc::new(ThreadSafeCache::new());
    exercise(&shared);
}

#[test]
fn test_thread_safe_cache_from_worker_threads() {
    let cache: Arc<ThreadSafeCache<u32, u32>> = Arc::new(ThreadSafeCache::new());
    let computations = AtomicU32::new(0);

    let results: Vec<u32> = (0..256u32)
        .into_par_iter()
        .map(|i| {
            let key = i % 8;
            cache.get_or_compute(key, || {
                computations.fetch_add(1, Ordering::Relaxed);
                key * 10
            })
        })
        .collect();

    for (i, value) in results.iter().enumerate() {
        assert_eq!(*value, (i as u32 % 8) * 10);
    }
    assert_eq!(cache.len(), 8);
    assert!(computations.load(Ordering::Relaxed) >= 8);
}
