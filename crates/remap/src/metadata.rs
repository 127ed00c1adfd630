// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounded LRU cache for per-type member metadata.
//!
//! Member matching is case-insensitive and string-keyed sources are matched
//! through every naming-case spelling of a member. Both lookups are derived
//! once per type and served from an in-memory LRU cache. Pinned entries are
//! never evicted.

use crate::naming;
use crate::types::{TypeDescriptor, TypeRef};
use dashmap::DashSet;
use lru::LruCache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

/// Capacity used when a zero capacity is requested.
pub const DEFAULT_CAPACITY: usize = 512;

/// Derived lookup tables for one type.
#[derive(Debug)]
pub struct TypeMetadata {
    /// Lower-cased member name -> member position.
    index: HashMap<String, usize>,
    /// Naming-case spellings per member, declaration order.
    aliases: Vec<Vec<Arc<str>>>,
}

impl TypeMetadata {
    fn build(ty: &TypeDescriptor) -> Self {
        let members = ty.members();
        let mut index = HashMap::with_capacity(members.len());
        for (i, member) in members.iter().enumerate() {
            index.entry(member.name.to_ascii_lowercase()).or_insert(i);
        }
        let aliases = members.iter().map(|m| naming::aliases(&m.name)).collect();
        Self { index, aliases }
    }

    /// Position of the member named `name`, ignoring case.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_ascii_lowercase()).copied()
    }

    /// Spellings accepted for the member at `position`.
    pub fn aliases(&self, position: usize) -> &[Arc<str>] {
        self.aliases.get(position).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    pub last_miss_ns: u64,
}

/// LRU-based concurrent cache of [`TypeMetadata`].
pub struct MetadataCache {
    inner: RwLock<LruCache<Arc<str>, Arc<TypeMetadata>>>,
    pinned: DashSet<Arc<str>>,
    stats: RwLock<LookupStats>,
}

impl MetadataCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: RwLock::new(LruCache::new(capacity)),
            pinned: DashSet::new(),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    /// Metadata for `ty`, derived on first use.
    pub fn get(&self, ty: &TypeRef) -> Arc<TypeMetadata> {
        let key = ty.name_arc();

        if let Some(hit) = self.try_peek(key) {
            self.record_hit();
            return hit;
        }

        let mut cache = self.inner.write();
        if let Some(hit) = cache.get(key) {
            self.record_hit();
            return Arc::clone(hit);
        }

        let start = Instant::now();
        let built = Arc::new(TypeMetadata::build(ty));

        if cache.len() >= cache.cap().get() && !self.free_slot(&mut cache) {
            self.record_miss(start);
            return built;
        }

        cache.put(key.clone(), Arc::clone(&built));
        self.record_miss(start);
        built
    }

    /// Keep the metadata of `ty` resident regardless of recency.
    pub fn pin(&self, ty: &TypeRef) {
        self.pinned.insert(ty.name_arc().clone());
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn try_peek(&self, key: &Arc<str>) -> Option<Arc<TypeMetadata>> {
        let cache = self.inner.read();
        cache.peek(key).map(Arc::clone)
    }

    fn free_slot(&self, cache: &mut LruCache<Arc<str>, Arc<TypeMetadata>>) -> bool {
        if cache.len() < cache.cap().get() {
            return true;
        }

        let attempts = cache.len();
        for _ in 0..attempts {
            match cache.pop_lru() {
                Some((old_key, old_value)) => {
                    if self.pinned.contains(&old_key) {
                        cache.put(old_key, old_value);
                    } else {
                        return true;
                    }
                }
                None => break,
            }
        }

        false
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_miss_ns = start.elapsed().as_nanos() as u64;
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
