#![forbid(unsafe_code)]

//! In-memory override store.
//!
//! A single read/write lock guards a nested `key -> scope -> record` map.
//! Records keep the state together with the acting actor and the time of the
//! last write, so `unset` tombstones stay distinguishable from missing
//! records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;

use featuregate::prelude::*;
use featuregate::override_adapter::{OverrideReader, OverrideWriter};
use featuregate::{ActorRef, FeatureCtx, Override, OverrideMatch, ScopeChain, ScopeRef};

/// Stored override with audit data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRecord {
	pub state: Override,
	pub actor: ActorRef,
	pub updated_at: DateTime<Utc>,
}

type ScopeRecords = HashMap<ScopeRef, OverrideRecord>;

#[derive(Debug, Default)]
pub struct MemoryOverrideStore {
	records: RwLock<HashMap<Box<str>, ScopeRecords>>,
}

impl MemoryOverrideStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// State at one scope; `Missing` when nothing was ever written
	pub fn get(&self, key: &str, scope: &ScopeRef) -> Override {
		self.record(key, scope).map_or(Override::Missing, |r| r.state)
	}

	pub fn record(&self, key: &str, scope: &ScopeRef) -> Option<OverrideRecord> {
		let records = self.records.read();
		records.get(key.trim())?.get(scope).cloned()
	}

	/// Every record of a key, in no particular order
	pub fn records_for(&self, key: &str) -> Vec<(ScopeRef, OverrideRecord)> {
		let records = self.records.read();
		records
			.get(key.trim())
			.map(|scopes| scopes.iter().map(|(s, r)| (s.clone(), r.clone())).collect())
			.unwrap_or_default()
	}

	/// Remove a record entirely, returning the store to `Missing` at `scope`
	pub fn delete(&self, key: &str, scope: &ScopeRef) -> bool {
		let mut records = self.records.write();
		let Some(scopes) = records.get_mut(key.trim()) else {
			return false;
		};
		let removed = scopes.remove(scope).is_some();
		if scopes.is_empty() {
			records.remove(key.trim());
		}
		removed
	}

	pub fn clear(&self) {
		self.records.write().clear();
	}

	/// Number of stored records across all keys
	pub fn len(&self) -> usize {
		self.records.read().values().map(HashMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn write(&self, key: &str, scope: &ScopeRef, state: Override, actor: &ActorRef) -> FgResult<()> {
		let key = key.trim();
		if key.is_empty() {
			return Err(Error::new(ErrorCode::FeatureKeyRequired));
		}
		let record = OverrideRecord { state, actor: actor.clone(), updated_at: Utc::now() };
		debug!(key = %key, scope = %scope, state = %state, "storing override");
		self.records.write().entry(key.into()).or_default().insert(scope.clone(), record);
		Ok(())
	}
}

#[async_trait]
impl OverrideReader for MemoryOverrideStore {
	async fn get_all(
		&self,
		_ctx: &FeatureCtx,
		key: &str,
		chain: &ScopeChain,
	) -> FgResult<Vec<OverrideMatch>> {
		let records = self.records.read();
		let Some(scopes) = records.get(key.trim()) else {
			return Ok(Vec::new());
		};
		Ok(chain
			.iter()
			.filter_map(|scope| scopes.get(scope).map(|r| OverrideMatch::new(scope.clone(), r.state)))
			.collect())
	}
}

#[async_trait]
impl OverrideWriter for MemoryOverrideStore {
	async fn set(
		&self,
		_ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		enabled: bool,
		actor: &ActorRef,
	) -> FgResult<()> {
		self.write(key, scope, Override::from_bool(enabled), actor)
	}

	async fn unset(
		&self,
		_ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		actor: &ActorRef,
	) -> FgResult<()> {
		self.write(key, scope, Override::Unset, actor)
	}
}

// vim: ts=4
