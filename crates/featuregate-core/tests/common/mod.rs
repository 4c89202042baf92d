//! Shared stubs for gate integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use featuregate_core::prelude::*;
use featuregate_core::strategy::{OverrideDecision, ResolveOptions, ResolveStrategy};
use featuregate_types::claims::{ClaimsProvider, PermissionProvider};
use featuregate_types::defaults::{DefaultResult, Defaults};
use featuregate_types::hooks::{ActivityHook, ResolveEvent, ResolveHook, UpdateEvent};
use featuregate_types::override_adapter::{OverrideReader, OverrideWriter};
use featuregate_types::{Override, OverrideMatch};

/// Override store recording every call
#[derive(Default)]
pub struct StubStore {
	records: Mutex<HashMap<(Box<str>, ScopeRef), Override>>,
	pub calls: Mutex<Vec<String>>,
	pub fail_reads: AtomicBool,
	/// Writes for this key fail
	pub fail_writes_for: Mutex<Option<String>>,
}

impl StubStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(self, key: &str, scope: ScopeRef, state: Override) -> Self {
		self.records.lock().insert((key.into(), scope), state);
		self
	}

	pub fn state(&self, key: &str, scope: &ScopeRef) -> Override {
		self.records.lock().get(&(key.into(), scope.clone())).copied().unwrap_or_default()
	}

	pub fn read_count(&self) -> usize {
		self.calls.lock().iter().filter(|c| c.starts_with("get_all:")).count()
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}

	fn check_write(&self, key: &str) -> FgResult<()> {
		if self.fail_writes_for.lock().as_deref() == Some(key) {
			return Err(Error::adapter(format!("write rejected for {key}")));
		}
		Ok(())
	}
}

#[async_trait]
impl OverrideReader for StubStore {
	async fn get_all(
		&self,
		_ctx: &FeatureCtx,
		key: &str,
		chain: &ScopeChain,
	) -> FgResult<Vec<OverrideMatch>> {
		self.calls.lock().push(format!("get_all:{key}"));
		if self.fail_reads.load(Ordering::SeqCst) {
			return Err(Error::adapter("store unavailable"));
		}
		let records = self.records.lock();
		Ok(chain
			.iter()
			.filter_map(|scope| {
				records
					.get(&(key.into(), scope.clone()))
					.map(|state| OverrideMatch::new(scope.clone(), *state))
			})
			.collect())
	}
}

#[async_trait]
impl OverrideWriter for StubStore {
	async fn set(
		&self,
		_ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		enabled: bool,
		_actor: &ActorRef,
	) -> FgResult<()> {
		self.calls.lock().push(format!("set:{key}"));
		self.check_write(key)?;
		self.records.lock().insert((key.into(), scope.clone()), Override::from_bool(enabled));
		Ok(())
	}

	async fn unset(
		&self,
		_ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		_actor: &ActorRef,
	) -> FgResult<()> {
		self.calls.lock().push(format!("unset:{key}"));
		self.check_write(key)?;
		self.records.lock().insert((key.into(), scope.clone()), Override::Unset);
		Ok(())
	}
}

pub struct FailingClaims;

#[async_trait]
impl ClaimsProvider for FailingClaims {
	async fn claims_from_context(&self, _ctx: &FeatureCtx) -> FgResult<ActorClaims> {
		Err(Error::adapter("claims unavailable"))
	}
}

/// Grants fixed permissions, or fails
pub struct StubPermissions {
	pub perms: Vec<&'static str>,
	pub fail: bool,
}

#[async_trait]
impl PermissionProvider for StubPermissions {
	async fn permissions(&self, _ctx: &FeatureCtx, _claims: &ActorClaims) -> FgResult<Vec<Box<str>>> {
		if self.fail {
			return Err(Error::adapter("permissions unavailable"));
		}
		Ok(self.perms.iter().map(|p| (*p).into()).collect())
	}
}

#[derive(Default)]
pub struct FailingDefaults {
	pub calls: AtomicUsize,
}

#[async_trait]
impl Defaults for FailingDefaults {
	async fn default_for(&self, _ctx: &FeatureCtx, _key: &str) -> FgResult<DefaultResult> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Err(Error::adapter("defaults unavailable"))
	}
}

/// Strategy that always fails, counting its calls
#[derive(Default)]
pub struct FailingStrategy {
	pub calls: AtomicUsize,
}

impl ResolveStrategy for FailingStrategy {
	fn name(&self) -> &str {
		"failing"
	}

	fn resolve(
		&self,
		_key: &str,
		_chain: &ScopeChain,
		_matches: &[OverrideMatch],
		_opts: &ResolveOptions<'_>,
	) -> FgResult<OverrideDecision> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Err(Error::adapter("strategy failed"))
	}
}

/// Collects every resolve and update event
#[derive(Default)]
pub struct RecordingHook {
	pub resolves: Mutex<Vec<ResolveEvent>>,
	pub updates: Mutex<Vec<UpdateEvent>>,
}

impl RecordingHook {
	pub fn last_resolve(&self) -> Option<ResolveEvent> {
		self.resolves.lock().last().cloned()
	}

	pub fn update_count(&self) -> usize {
		self.updates.lock().len()
	}
}

impl ResolveHook for RecordingHook {
	fn on_resolve(&self, _ctx: &FeatureCtx, event: &ResolveEvent) {
		self.resolves.lock().push(event.clone());
	}
}

impl ActivityHook for RecordingHook {
	fn on_update(&self, _ctx: &FeatureCtx, event: &UpdateEvent) {
		self.updates.lock().push(event.clone());
	}
}

pub fn actor() -> ActorRef {
	ActorRef::new("admin-1", "user").named("Admin")
}

pub fn ctx_for(claims: ActorClaims) -> FeatureCtx {
	FeatureCtx::with_claims(claims)
}

/// Subject u1 in tenant acme
pub fn acme_user() -> FeatureCtx {
	ctx_for(ActorClaims::new("u1").tenant("acme"))
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// vim: ts=4
