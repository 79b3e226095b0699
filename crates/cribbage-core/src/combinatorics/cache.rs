//! Memoized combinations keyed by `(n, k)` and powersets keyed by `n`.

use super::enumerate::enumerate_combinations;
use super::{Combination, CombinatoricsError};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

static GLOBAL: Lazy<Arc<CombinationCache>> = Lazy::new(|| Arc::new(CombinationCache::new()));

/// Entries are filled on first request and never change afterwards.
#[derive(Debug, Default)]
pub struct CombinationCache {
    combinations: RwLock<HashMap<(usize, usize), Arc<[Combination]>>>,
    powersets: RwLock<HashMap<usize, Arc<[Combination]>>>,
}

impl CombinationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance for callers that do not inject their own.
    pub fn global() -> &'static CombinationCache {
        &GLOBAL
    }

    /// Owned handle to the process-wide instance.
    pub fn shared() -> Arc<CombinationCache> {
        Arc::clone(&GLOBAL)
    }

    pub fn combinations(
        &self,
        n: usize,
        k: usize,
    ) -> Result<Arc<[Combination]>, CombinatoricsError> {
        if let Some(found) = self.combinations.read().get(&(n, k)) {
            return Ok(Arc::clone(found));
        }

        let mut entries = self.combinations.write();
        // Another writer may have filled the key while we waited for the lock.
        if let Some(found) = entries.get(&(n, k)) {
            return Ok(Arc::clone(found));
        }
        let computed: Arc<[Combination]> = enumerate_combinations(n, k)?.into();
        entries.insert((n, k), Arc::clone(&computed));
        Ok(computed)
    }

    pub fn powerset(&self, n: usize) -> Result<Arc<[Combination]>, CombinatoricsError> {
        if let Some(found) = self.powersets.read().get(&n) {
            return Ok(Arc::clone(found));
        }

        let mut entries = self.powersets.write();
        if let Some(found) = entries.get(&n) {
            return Ok(Arc::clone(found));
        }
        if n == 0 {
            return Err(CombinatoricsError::InvalidArguments { n, k: 0 });
        }
        let mut subsets = Vec::new();
        for k in 1..=n {
            subsets.extend(self.combinations(n, k)?.iter().cloned());
        }
        let computed: Arc<[Combination]> = subsets.into();
        entries.insert(n, Arc::clone(&computed));
        Ok(computed)
    }

    pub fn cached_combinations(&self) -> usize {
        self.combinations.read().len()
    }

    pub fn cached_powersets(&self) -> usize {
        self.powersets.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinatorics::enumerate::enumerate_powerset;
    use std::thread;

    #[test]
    fn repeated_requests_share_one_allocation() {
        let cache = CombinationCache::new();
        let first = cache.combinations(6, 4).unwrap();
        let second = cache.combinations(6, 4).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 15);
        assert_eq!(cache.cached_combinations(), 1);
    }

    #[test]
    fn powerset_matches_uncached_enumeration() {
        let cache = CombinationCache::new();
        let cached = cache.powerset(5).unwrap();
        assert_eq!(&cached[..], enumerate_powerset(5).unwrap().as_slice());
        assert!(Arc::ptr_eq(&cached, &cache.powerset(5).unwrap()));
        assert_eq!(cache.cached_powersets(), 1);
        assert_eq!(cache.cached_combinations(), 5);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = CombinationCache::new();
        assert!(cache.combinations(2, 3).is_err());
        assert!(cache.combinations(2, 0).is_err());
        assert!(cache.powerset(0).is_err());
        assert_eq!(cache.cached_combinations(), 0);
        assert_eq!(cache.cached_powersets(), 0);
    }

    #[test]
    fn concurrent_first_fill_yields_one_entry() {
        let cache = Arc::new(CombinationCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.combinations(20, 3).unwrap())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for result in &results {
            assert!(Arc::ptr_eq(result, &results[0]));
        }
        assert_eq!(results[0].len(), 1140);
        assert_eq!(cache.cached_combinations(), 1);
    }

    #[test]
    fn global_cache_is_shared() {
        let a = CombinationCache::global().combinations(5, 2).unwrap();
        let b = CombinationCache::shared().combinations(5, 2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(std::ptr::eq(
            CombinationCache::global(),
            Arc::as_ptr(&CombinationCache::shared())
        ));
    }
}
