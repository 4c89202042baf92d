//! LRU resolve cache

use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;

use featuregate_types::cache::{CacheEntry, ResolveCache};

use crate::prelude::*;

const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1023);

/// Bounded LRU cache keyed by (normalized key, chain)
pub struct LruResolveCache {
	cache: RwLock<LruCache<(Box<str>, ScopeChain), CacheEntry>>,
}

impl LruResolveCache {
	/// A capacity of zero falls back to 1024 entries
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
		Self { cache: RwLock::new(LruCache::new(capacity)) }
	}

	pub fn len(&self) -> usize {
		self.cache.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.read().is_empty()
	}
}

impl Default for LruResolveCache {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY.get())
	}
}

impl std::fmt::Debug for LruResolveCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let cache = self.cache.read();
		f.debug_struct("LruResolveCache")
			.field("len", &cache.len())
			.field("cap", &cache.cap())
			.finish()
	}
}

impl ResolveCache for LruResolveCache {
	fn get(&self, key: &str, chain: &ScopeChain) -> Option<CacheEntry> {
		// LRU bookkeeping mutates on read
		let mut cache = self.cache.write();
		cache.get(&(key.into(), chain.clone())).cloned()
	}

	fn set(&self, key: &str, chain: &ScopeChain, entry: CacheEntry) {
		let mut cache = self.cache.write();
		cache.put((key.into(), chain.clone()), entry);
	}

	fn clear(&self) {
		let mut cache = self.cache.write();
		cache.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use featuregate_types::trace::ResolveTrace;

	fn entry(value: bool) -> CacheEntry {
		CacheEntry { value, trace: ResolveTrace::new("k", "k") }
	}

	fn chain(tenant: &str) -> ScopeChain {
		ScopeChain::from(vec![ScopeRef::tenant(tenant), ScopeRef::system()])
	}

	#[test]
	fn test_keyed_by_key_and_chain() {
		let cache = LruResolveCache::new(8);
		cache.set("k", &chain("acme"), entry(true));

		assert!(cache.get("k", &chain("acme")).is_some_and(|e| e.value));
		assert!(cache.get("k", &chain("other")).is_none());
		assert!(cache.get("other", &chain("acme")).is_none());
	}

	#[test]
	fn test_clear_drops_every_entry() {
		let cache = LruResolveCache::new(8);
		cache.set("a", &chain("acme"), entry(true));
		cache.set("b", &chain("other"), entry(false));
		assert_eq!(cache.len(), 2);

		cache.clear();
		assert!(cache.is_empty());
		assert!(cache.get("a", &chain("acme")).is_none());
	}

	#[test]
	fn test_capacity_bound() {
		let cache = LruResolveCache::new(2);
		cache.set("a", &chain("acme"), entry(true));
		cache.set("b", &chain("acme"), entry(true));
		cache.get("a", &chain("acme"));
		cache.set("c", &chain("acme"), entry(true));

		assert!(cache.get("a", &chain("acme")).is_some());
		assert!(cache.get("b", &chain("acme")).is_none());
	}

	#[test]
	fn test_zero_capacity_falls_back() {
		let cache = LruResolveCache::new(0);
		cache.set("a", &chain("acme"), entry(true));
		assert_eq!(cache.len(), 1);
	}
}

// vim: ts=4
