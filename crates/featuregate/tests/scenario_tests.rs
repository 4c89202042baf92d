//! End-to-end scenarios with the in-memory override store

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use featuregate::prelude::*;
use featuregate::{
	FeatureDefinition, FeatureRegistry, GuardError, LruResolveCache, RequireOpts, TracingHook, require,
};
use featuregate_override_adapter_memory::MemoryOverrideStore;

const CHECKOUT: &str = "checkout.v2";

fn admin() -> ActorRef {
	ActorRef::new("admin-1", "user").named("Admin")
}

fn acme_user() -> FeatureCtx {
	FeatureCtx::with_claims(ActorClaims::new("u1").tenant("acme"))
}

fn gate_with(store: &Arc<MemoryOverrideStore>) -> Gate {
	featuregate::logging::init();
	let hook = Arc::new(TracingHook::new());
	Gate::builder()
		.defaults(Arc::new(StaticDefaults::from_json(r#"{"checkout": {"v2": true}}"#).unwrap()))
		.override_store(store.clone())
		.cache(Arc::new(LruResolveCache::new(128)))
		.resolve_hook(hook.clone())
		.activity_hook(hook)
		.build()
		.unwrap()
}

#[tokio::test]
async fn test_scenario_a_default_applies() {
	let store = Arc::new(MemoryOverrideStore::new());
	let gate = gate_with(&store);

	let (res, trace) = gate.resolve_with_trace(&acme_user(), CHECKOUT, None).await;
	assert!(res.unwrap());
	assert_eq!(trace.source, ResolveSource::Default);
}

#[tokio::test]
async fn test_scenario_b_tenant_override() {
	let store = Arc::new(MemoryOverrideStore::new());
	let gate = gate_with(&store);

	gate.set(&FeatureCtx::new(), CHECKOUT, &ScopeRef::tenant("acme"), false, &admin()).await.unwrap();

	let (res, trace) = gate.resolve_with_trace(&acme_user(), CHECKOUT, None).await;
	assert!(!res.unwrap());
	assert_eq!(trace.source, ResolveSource::Override);
	assert_eq!(trace.overrides.matched, Some(ScopeRef::tenant("acme")));
	assert_eq!(trace.overrides.matched.map(|s| s.to_string()).as_deref(), Some("tenant:acme"));
}

#[tokio::test]
async fn test_scenario_c_deny_wins_across_roles() {
	let store = Arc::new(MemoryOverrideStore::new());
	let gate = gate_with(&store);
	let ctx = FeatureCtx::new();

	gate.set(&ctx, CHECKOUT, &ScopeRef::role("beta-tester"), true, &admin()).await.unwrap();
	gate.set(&ctx, CHECKOUT, &ScopeRef::role("admin-block"), false, &admin()).await.unwrap();

	let user = FeatureCtx::with_claims(ActorClaims::new("u1").roles(["beta-tester", "admin-block"]));
	let (res, trace) = gate.resolve_with_trace(&user, CHECKOUT, None).await;
	assert!(!res.unwrap());
	assert_eq!(trace.source, ResolveSource::Override);
	assert_eq!(trace.overrides.matches.len(), 2);
}

#[tokio::test]
async fn test_scenario_d_unset_returns_to_default() {
	let store = Arc::new(MemoryOverrideStore::new());
	let gate = gate_with(&store);
	let scope = ScopeRef::tenant("acme");

	gate.set(&FeatureCtx::new(), CHECKOUT, &scope, false, &admin()).await.unwrap();
	assert!(!gate.enabled(&acme_user(), CHECKOUT).await.unwrap());

	gate.unset(&FeatureCtx::new(), CHECKOUT, &scope, &admin()).await.unwrap();
	let (res, trace) = gate.resolve_with_trace(&acme_user(), CHECKOUT, None).await;
	assert!(res.unwrap());
	assert_eq!(trace.source, ResolveSource::Default);
	assert!(!trace.cache_hit);
	assert_eq!(store.get(CHECKOUT, &scope), Override::Unset);
}

#[tokio::test]
async fn test_json_config_with_aliases() {
	let config = GateConfig::from_json(
		r#"{
			"claimsFailureMode": "fail_closed",
			"aliases": {"checkout.new_flow": "checkout.v2"}
		}"#,
	)
	.unwrap();
	let store = Arc::new(MemoryOverrideStore::new());
	let gate = Gate::builder().config(config).override_store(store.clone()).build().unwrap();

	gate.set(&FeatureCtx::new(), "checkout.new_flow", &ScopeRef::system(), true, &admin()).await.unwrap();
	assert_eq!(store.get("checkout.v2", &ScopeRef::system()), Override::Enabled);
	assert_eq!(store.get("checkout.new_flow", &ScopeRef::system()), Override::Enabled);

	assert!(gate.enabled(&acme_user(), "checkout.new_flow").await.unwrap());
	assert_eq!(gate.config().claims_failure_mode, ClaimsFailureMode::FailClosed);
}

#[tokio::test]
async fn test_catalog_defaults_and_guard() {
	let mut registry = FeatureRegistry::new();
	registry
		.register(FeatureDefinition::builder("users.signup").description("Self-service signup").default(false).build().unwrap())
		.unwrap();
	registry
		.register(FeatureDefinition::builder("users.invite").description("Invitations").default(true).build().unwrap())
		.unwrap();
	let catalog = Arc::new(registry.freeze());

	let store = Arc::new(MemoryOverrideStore::new());
	let gate = Gate::builder().defaults(catalog.clone()).override_store(store).build().unwrap();
	let ctx = acme_user();

	let err = require(&gate, &ctx, "users.signup", &RequireOpts::new()).await.unwrap_err();
	assert!(matches!(err, GuardError::Disabled { .. }));

	let opts = RequireOpts::new().fallback_keys(["users.invite"]);
	require(&gate, &ctx, "users.signup", &opts).await.unwrap();

	gate.set(&FeatureCtx::new(), "users.signup", &ScopeRef::tenant("acme"), true, &admin()).await.unwrap();
	require(&gate, &ctx, "users.signup", &RequireOpts::new()).await.unwrap();
	assert_eq!(catalog.list().len(), 2);
}

#[tokio::test]
async fn test_gate_behind_trait_objects() {
	let store = Arc::new(MemoryOverrideStore::new());
	let gate: Arc<dyn MutableFeatureGate> = Arc::new(gate_with(&store));

	gate.set(&FeatureCtx::new(), CHECKOUT, &ScopeRef::user("acme", "", "u1"), false, &admin())
		.await
		.unwrap();
	assert!(!gate.enabled(&acme_user(), CHECKOUT).await.unwrap());

	let other = FeatureCtx::with_claims(ActorClaims::new("u2").tenant("acme"));
	assert!(gate.enabled(&other, CHECKOUT).await.unwrap());
}

// vim: ts=4
