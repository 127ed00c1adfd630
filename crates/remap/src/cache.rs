// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent memo table of compiled plans.
//!
//! Plans are a pure function of the type pair and the (frozen) registry, so
//! two threads racing on the same pair may both compile it; the last insert
//! wins and either plan is valid. Compilation runs outside any shard lock
//! because runtime-typed members re-enter the cache while a plan executes.

use crate::error::Result;
use crate::ir::Plan;
use crate::types::TypePair;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Plan cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct PlanCache {
    plans: DashMap<TypePair, Arc<Plan>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pair: &TypePair) -> Option<Arc<Plan>> {
        self.plans.get(pair).map(|p| Arc::clone(p.value()))
    }

    /// Cached plan for `pair`, compiling it with `build` on a miss.
    /// Compilation failures are not cached.
    pub fn get_or_build<F>(&self, pair: &TypePair, build: F) -> Result<Arc<Plan>>
    where
        F: FnOnce() -> Result<Plan>,
    {
        if let Some(plan) = self.get(pair) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(plan);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let plan = Arc::new(build()?);
        self.plans.insert(pair.clone(), Arc::clone(&plan));
        Ok(plan)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn clear(&self) {
        self.plans.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.plans.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ir::Expr;
    use crate::types::{self, PrimitiveKind};

    fn pair() -> TypePair {
        TypePair::new(
            &types::primitive(PrimitiveKind::I32),
            &types::primitive(PrimitiveKind::I64),
        )
    }

    #[test]
    fn test_build_once_then_hit() {
        let cache = PlanCache::new();
        let pair = pair();
        let mut builds = 0;
        for _ in 0..3 {
            cache
                .get_or_build(&pair, || {
                    builds += 1;
                    Ok(Plan::new(pair.clone(), Expr::Source, 0))
                })
                .unwrap();
        }
        assert_eq!(builds, 1);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (2, 1, 1));
    }

    #[test]
    fn test_failures_not_cached() {
        let cache = PlanCache::new();
        let pair = pair();
        let err = cache.get_or_build(&pair, || Err(Error::mismatch("Int32", "Int64")));
        assert!(err.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_racing_builds_keep_one_entry() {
        let cache = PlanCache::new();
        let pair = pair();
        let start = std::sync::Barrier::new(8);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    start.wait();
                    let plan = cache
                        .get_or_build(&pair, || Ok(Plan::new(pair.clone(), Expr::Source, 0)))
                        .unwrap();
                    assert_eq!(plan.pair(), &pair);
                });
            }
        });

        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits + stats.misses, 8);
        assert!(stats.misses >= 1);
    }
}
