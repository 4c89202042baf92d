//! Resolution cache boundary

use crate::scope::ScopeChain;
use crate::trace::ResolveTrace;

/// Cached resolution
#[derive(Debug, Clone)]
pub struct CacheEntry {
	pub value: bool,
	pub trace: ResolveTrace,
}

/// Value/trace cache keyed by (normalized key, chain)
///
/// Invalidation is whole-cache: every override write calls `clear`.
pub trait ResolveCache: Send + Sync {
	fn get(&self, key: &str, chain: &ScopeChain) -> Option<CacheEntry>;
	fn set(&self, key: &str, chain: &ScopeChain, entry: CacheEntry);
	fn clear(&self);
}

/// Cache that stores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl ResolveCache for NoopCache {
	fn get(&self, _key: &str, _chain: &ScopeChain) -> Option<CacheEntry> {
		None
	}

	fn set(&self, _key: &str, _chain: &ScopeChain, _entry: CacheEntry) {}

	fn clear(&self) {}
}

// vim: ts=4
