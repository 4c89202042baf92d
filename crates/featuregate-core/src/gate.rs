//! Feature gate: override, default and fallback resolution
//!
//! Resolution order for one call:
//! 1. normalize the key (trim, legacy alias to canonical)
//! 2. take the explicit chain (normalized like written scopes) or derive one
//!    from claims and permissions
//! 3. replay a cached result when present
//! 4. query the override store and apply the strategy, then retry each alias
//! 5. consult defaults, else fall back to `false`
//! 6. cache the result and notify resolve hooks
//!
//! `Set`/`Unset` write one scope point (and every alias of the key), clear the
//! whole cache and notify activity hooks.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use featuregate_types::cache::{CacheEntry, NoopCache, ResolveCache};
use featuregate_types::claims::{ClaimsProvider, ContextClaimsProvider, PermissionProvider};
use featuregate_types::defaults::{Defaults, NoopDefaults};
use featuregate_types::gate::{FeatureGate, MutableFeatureGate, TraceableFeatureGate};
use featuregate_types::hooks::{ActivityHook, ResolveEvent, ResolveHook, UpdateAction, UpdateEvent};
use featuregate_types::override_adapter::{OverrideReader, OverrideStore, OverrideWriter};
use featuregate_types::trace::{ClaimsFailureMode, OverrideTrace, ResolveSource, ResolveTrace};

use crate::chain::{default_normalizer, ChainBuilder, IdentifierNormalizer};
use crate::config::GateConfig;
use crate::keys::KeyAliases;
use crate::prelude::*;
use crate::strategy::{OverrideDecision, ResolveOptions, ResolveStrategy, RestrictiveStrategy};

/// Injected collaborators of a gate
#[derive(Default, Clone)]
pub struct Collaborators {
	pub defaults: Option<Arc<dyn Defaults>>,
	pub override_reader: Option<Arc<dyn OverrideReader>>,
	pub override_writer: Option<Arc<dyn OverrideWriter>>,
	pub claims_provider: Option<Arc<dyn ClaimsProvider>>,
	pub permission_provider: Option<Arc<dyn PermissionProvider>>,
	pub cache: Option<Arc<dyn ResolveCache>>,
	pub strategy: Option<Arc<dyn ResolveStrategy>>,
}

pub struct GateBuilder {
	config: GateConfig,
	normalizer: Option<IdentifierNormalizer>,
	collaborators: Collaborators,
	resolve_hooks: Vec<Arc<dyn ResolveHook>>,
	activity_hooks: Vec<Arc<dyn ActivityHook>>,
}

impl GateBuilder {
	pub fn new() -> Self {
		GateBuilder {
			config: GateConfig::default(),
			normalizer: None,
			collaborators: Collaborators::default(),
			resolve_hooks: Vec::new(),
			activity_hooks: Vec::new(),
		}
	}

	// Options
	pub fn config(&mut self, config: GateConfig) -> &mut Self {
		self.config = config;
		self
	}
	pub fn scope_order(&mut self, order: impl IntoIterator<Item = ScopeKind>) -> &mut Self {
		self.config.scope_order = order.into_iter().collect();
		self
	}
	pub fn claims_failure_mode(&mut self, mode: ClaimsFailureMode) -> &mut Self {
		self.config.claims_failure_mode = mode;
		self
	}
	pub fn strict_store(&mut self, strict: bool) -> &mut Self {
		self.config.strict_store = strict;
		self
	}
	pub fn preserve_role_perm_order(&mut self, preserve: bool) -> &mut Self {
		self.config.preserve_role_perm_order = preserve;
		self
	}
	pub fn append_system_on_failure(&mut self, append: bool) -> &mut Self {
		self.config.append_system_on_failure = append;
		self
	}
	pub fn append_system_on_provided_chain(&mut self, append: bool) -> &mut Self {
		self.config.append_system_on_provided_chain = append;
		self
	}
	pub fn failure_fallback_chain(&mut self, chain: ScopeChain) -> &mut Self {
		self.config.failure_fallback_chain = chain;
		self
	}
	pub fn alias(&mut self, legacy: impl Into<String>, canonical: impl Into<String>) -> &mut Self {
		self.config.aliases.insert(legacy.into(), canonical.into());
		self
	}
	pub fn role_perm_normalizer<F>(&mut self, normalizer: F) -> &mut Self
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		self.normalizer = Some(Arc::new(normalizer));
		self
	}

	// Collaborators
	pub fn defaults(&mut self, defaults: Arc<dyn Defaults>) -> &mut Self {
		self.collaborators.defaults = Some(defaults);
		self
	}
	pub fn override_reader(&mut self, reader: Arc<dyn OverrideReader>) -> &mut Self {
		self.collaborators.override_reader = Some(reader);
		self
	}
	pub fn override_writer(&mut self, writer: Arc<dyn OverrideWriter>) -> &mut Self {
		self.collaborators.override_writer = Some(writer);
		self
	}
	/// Use one store as both reader and writer
	pub fn override_store<S: OverrideStore + 'static>(&mut self, store: Arc<S>) -> &mut Self {
		let reader: Arc<dyn OverrideReader> = store.clone();
		let writer: Arc<dyn OverrideWriter> = store;
		self.collaborators.override_reader = Some(reader);
		self.collaborators.override_writer = Some(writer);
		self
	}
	pub fn claims_provider(&mut self, provider: Arc<dyn ClaimsProvider>) -> &mut Self {
		self.collaborators.claims_provider = Some(provider);
		self
	}
	pub fn permission_provider(&mut self, provider: Arc<dyn PermissionProvider>) -> &mut Self {
		self.collaborators.permission_provider = Some(provider);
		self
	}
	pub fn cache(&mut self, cache: Arc<dyn ResolveCache>) -> &mut Self {
		self.collaborators.cache = Some(cache);
		self
	}
	pub fn strategy(&mut self, strategy: Arc<dyn ResolveStrategy>) -> &mut Self {
		self.collaborators.strategy = Some(strategy);
		self
	}

	// Hooks
	pub fn resolve_hook(&mut self, hook: Arc<dyn ResolveHook>) -> &mut Self {
		self.resolve_hooks.push(hook);
		self
	}
	pub fn activity_hook(&mut self, hook: Arc<dyn ActivityHook>) -> &mut Self {
		self.activity_hooks.push(hook);
		self
	}

	pub fn build(&self) -> FgResult<Gate> {
		self.config.validate()?;
		let c = &self.collaborators;
		let chain_builder = ChainBuilder::new(
			self.config.scope_order.clone(),
			self.config.preserve_role_perm_order,
			self.normalizer.clone().unwrap_or_else(default_normalizer),
		);
		let gate = Gate {
			defaults: c.defaults.clone().unwrap_or_else(|| Arc::new(NoopDefaults)),
			override_reader: c.override_reader.clone(),
			override_writer: c.override_writer.clone(),
			claims_provider: c.claims_provider.clone().unwrap_or_else(|| Arc::new(ContextClaimsProvider)),
			permission_provider: c.permission_provider.clone(),
			cache: c.cache.clone().unwrap_or_else(|| Arc::new(NoopCache)),
			strategy: c.strategy.clone().unwrap_or_else(|| Arc::new(RestrictiveStrategy)),
			aliases: self.config.key_aliases(),
			fallback_chain: chain_builder.normalize_chain(&self.config.failure_fallback_chain),
			chain_builder,
			config: self.config.clone(),
			resolve_hooks: self.resolve_hooks.clone(),
			activity_hooks: self.activity_hooks.clone(),
		};
		debug!(
			strategy = gate.strategy.name(),
			claims_failure_mode = gate.config.claims_failure_mode.as_str(),
			strict_store = gate.config.strict_store,
			aliases = gate.aliases.len(),
			"feature gate built"
		);
		Ok(gate)
	}
}

impl Default for GateBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Resolution engine
pub struct Gate {
	defaults: Arc<dyn Defaults>,
	override_reader: Option<Arc<dyn OverrideReader>>,
	override_writer: Option<Arc<dyn OverrideWriter>>,
	claims_provider: Arc<dyn ClaimsProvider>,
	permission_provider: Option<Arc<dyn PermissionProvider>>,
	cache: Arc<dyn ResolveCache>,
	strategy: Arc<dyn ResolveStrategy>,
	aliases: KeyAliases,
	/// Normalized `failure_fallback_chain`
	fallback_chain: ScopeChain,
	chain_builder: ChainBuilder,
	config: GateConfig,
	resolve_hooks: Vec<Arc<dyn ResolveHook>>,
	activity_hooks: Vec<Arc<dyn ActivityHook>>,
}

impl fmt::Debug for Gate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Gate")
			.field("strategy", &self.strategy.name())
			.field("config", &self.config)
			.field("has_reader", &self.override_reader.is_some())
			.field("has_writer", &self.override_writer.is_some())
			.field("resolve_hooks", &self.resolve_hooks.len())
			.field("activity_hooks", &self.activity_hooks.len())
			.finish_non_exhaustive()
	}
}

impl Gate {
	pub fn builder() -> GateBuilder {
		GateBuilder::new()
	}

	pub fn config(&self) -> &GateConfig {
		&self.config
	}

	pub fn aliases(&self) -> &KeyAliases {
		&self.aliases
	}

	pub fn chain_builder(&self) -> &ChainBuilder {
		&self.chain_builder
	}

	pub async fn enabled(&self, ctx: &FeatureCtx, key: &str) -> FgResult<bool> {
		self.resolve(ctx, key, None).await.0
	}

	pub async fn enabled_in(&self, ctx: &FeatureCtx, key: &str, chain: &ScopeChain) -> FgResult<bool> {
		self.resolve(ctx, key, Some(chain)).await.0
	}

	/// Resolve with provenance. On error the value is `false`.
	pub async fn resolve_with_trace(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		chain: Option<&ScopeChain>,
	) -> (FgResult<bool>, ResolveTrace) {
		self.resolve(ctx, key, chain).await
	}

	/// Store `enabled`/`disabled` at exactly one scope
	pub async fn set(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		enabled: bool,
		actor: &ActorRef,
	) -> FgResult<()> {
		self.update(ctx, key, scope, Some(enabled), actor).await
	}

	/// Store the `unset` tombstone at exactly one scope
	pub async fn unset(&self, ctx: &FeatureCtx, key: &str, scope: &ScopeRef, actor: &ActorRef) -> FgResult<()> {
		self.update(ctx, key, scope, None, actor).await
	}

	async fn resolve(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		provided: Option<&ScopeChain>,
	) -> (FgResult<bool>, ResolveTrace) {
		let trimmed = key.trim();
		let normalized = self.aliases.normalize(trimmed);
		let mut trace = ResolveTrace::new(trimmed, &normalized);
		trace.strategy = self.strategy.name().into();
		trace.claims_failure_mode = self.config.claims_failure_mode;

		if normalized.is_empty() {
			let err = Error::new(ErrorCode::FeatureKeyRequired)
				.with_meta(ErrorMeta::for_key(trimmed, &normalized).operation("resolve"));
			return self.fail(ctx, trace, err);
		}

		let chain = match self.resolve_chain(ctx, provided).await {
			Ok(chain) => chain,
			Err(err) => {
				let err = Error::wrap(err, ErrorCode::ScopeResolveFailed)
					.with_meta(ErrorMeta::for_key(trimmed, &normalized).operation("resolve_claims"));
				return self.fail(ctx, trace, err);
			}
		};
		trace.chain = chain.clone();

		if let Some(entry) = self.cache.get(&normalized, &chain) {
			let mut cached = entry.trace;
			cached.key = trimmed.into();
			cached.normalized_key = normalized.clone();
			cached.chain = chain;
			cached.value = entry.value;
			cached.cache_hit = true;
			debug!(key = %normalized, value = entry.value, "feature resolved from cache");
			self.emit_resolve(ctx, &cached, None);
			return (Ok(entry.value), cached);
		}

		let mut store_failed = false;
		if let Some(reader) = &self.override_reader {
			match self.resolve_overrides(ctx, reader.as_ref(), &normalized, &chain).await {
				Ok((decision, alias)) => {
					let matched = decision.matched;
					let value = decision.value;
					trace.overrides = OverrideTrace {
						state: decision.state,
						value: matched.then_some(value),
						matched: decision.matched_scope,
						alias,
						matches: decision.matches,
						error: None,
					};
					if matched {
						trace.value = value;
						trace.source = ResolveSource::Override;
						return self.finish(ctx, &normalized, trace, false);
					}
				}
				Err(err) => {
					let strict = self.config.strict_store;
					let err = Error::wrap(err, ErrorCode::StoreReadFailed).with_meta(
						ErrorMeta::for_key(trimmed, &normalized)
							.chain(&chain)
							.store("override")
							.operation("get_all")
							.strict(strict),
					);
					trace.overrides.error = Some(err.clone());
					if strict {
						return self.fail(ctx, trace, err);
					}
					warn!(key = %normalized, error = %err, "override store read failed, using defaults");
					store_failed = true;
				}
			}
		}

		trace.defaults.checked = true;
		match self.defaults.default_for(ctx, &normalized).await {
			Ok(def) => {
				trace.defaults.set = def.set;
				trace.defaults.value = def.value;
				if def.set {
					trace.value = def.value;
					trace.source = ResolveSource::Default;
				} else {
					trace.value = false;
					trace.source = ResolveSource::Fallback;
				}
			}
			Err(err) => {
				let err = Error::wrap(err, ErrorCode::DefaultLookupFailed).with_meta(
					ErrorMeta::for_key(trimmed, &normalized).chain(&chain).operation("default"),
				);
				trace.defaults.error = Some(err.clone());
				return self.fail(ctx, trace, err);
			}
		}

		self.finish(ctx, &normalized, trace, store_failed)
	}

	async fn resolve_chain(&self, ctx: &FeatureCtx, provided: Option<&ScopeChain>) -> FgResult<ScopeChain> {
		if let Some(chain) = provided {
			let chain = self.chain_builder.normalize_chain(chain);
			return Ok(if self.config.append_system_on_provided_chain { chain.with_system() } else { chain });
		}

		let mut claims = match self.claims_provider.claims_from_context(ctx).await {
			Ok(claims) => claims,
			Err(err) => return self.claims_failure(err),
		};
		if let Some(provider) = &self.permission_provider {
			match provider.permissions(ctx, &claims).await {
				Ok(perms) => claims.merge_perms(perms),
				Err(err) => return self.claims_failure(err),
			}
		}
		Ok(self.chain_builder.build(&claims))
	}

	fn claims_failure(&self, err: Error) -> FgResult<ScopeChain> {
		match self.config.claims_failure_mode {
			ClaimsFailureMode::FailClosed => Err(err),
			ClaimsFailureMode::FailOpen => {
				warn!(error = %err, "claims resolution failed, using fallback chain");
				let chain = self.fallback_chain.clone();
				Ok(if self.config.append_system_on_failure { chain.with_system() } else { chain })
			}
		}
	}

	/// Decision for the canonical key, else the first alias that decides
	async fn resolve_overrides(
		&self,
		ctx: &FeatureCtx,
		reader: &dyn OverrideReader,
		key: &str,
		chain: &ScopeChain,
	) -> FgResult<(OverrideDecision, Option<Box<str>>)> {
		let decision = self.apply_strategy(ctx, reader, key, chain).await?;
		if decision.matched {
			return Ok((decision, None));
		}
		for alias in self.aliases.aliases_for(key) {
			let alias_decision = self.apply_strategy(ctx, reader, alias, chain).await?;
			if alias_decision.matched {
				debug!(key = %key, alias = %alias, "override matched under legacy key");
				return Ok((alias_decision, Some(alias.clone())));
			}
		}
		Ok((decision, None))
	}

	async fn apply_strategy(
		&self,
		ctx: &FeatureCtx,
		reader: &dyn OverrideReader,
		key: &str,
		chain: &ScopeChain,
	) -> FgResult<OverrideDecision> {
		let matches = reader.get_all(ctx, key, chain).await?;
		let opts = ResolveOptions { scope_order: self.chain_builder.scope_order() };
		self.strategy.resolve(key, chain, &matches, &opts)
	}

	fn finish(
		&self,
		ctx: &FeatureCtx,
		normalized: &str,
		trace: ResolveTrace,
		store_failed: bool,
	) -> (FgResult<bool>, ResolveTrace) {
		if !store_failed {
			self.cache.set(normalized, &trace.chain, CacheEntry { value: trace.value, trace: trace.clone() });
		}
		debug!(key = %normalized, value = trace.value, source = %trace.source, chain = %trace.chain, "feature resolved");
		self.emit_resolve(ctx, &trace, None);
		(Ok(trace.value), trace)
	}

	fn fail(&self, ctx: &FeatureCtx, mut trace: ResolveTrace, err: Error) -> (FgResult<bool>, ResolveTrace) {
		trace.value = false;
		trace.source = ResolveSource::Fallback;
		debug!(key = %trace.normalized_key, error = %err, "feature resolution failed");
		self.emit_resolve(ctx, &trace, Some(&err));
		(Err(err), trace)
	}

	fn emit_resolve(&self, ctx: &FeatureCtx, trace: &ResolveTrace, err: Option<&Error>) {
		if self.resolve_hooks.is_empty() {
			return;
		}
		let event = ResolveEvent::from_trace(trace, err);
		for hook in &self.resolve_hooks {
			hook.on_resolve(ctx, &event);
		}
	}

	fn emit_update(&self, ctx: &FeatureCtx, event: &UpdateEvent) {
		for hook in &self.activity_hooks {
			hook.on_update(ctx, event);
		}
	}

	/// Write one scope point for the canonical key and every alias. A failed
	/// canonical write returns immediately; a failed alias write is returned
	/// after the cache is cleared and hooks are notified.
	async fn update(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		value: Option<bool>,
		actor: &ActorRef,
	) -> FgResult<()> {
		let action = if value.is_some() { UpdateAction::Set } else { UpdateAction::Unset };
		let trimmed = key.trim();
		let normalized = self.aliases.normalize(trimmed);
		let meta = ErrorMeta::for_key(trimmed, &normalized).operation(action.as_str());

		if normalized.is_empty() {
			return Err(Error::new(ErrorCode::FeatureKeyRequired).with_meta(meta));
		}
		let scope = self.chain_builder.normalize_scope(scope);
		if !scope.has_required_ids() {
			return Err(Error::with_message(
				ErrorCode::ScopeRequired,
				format!("{} scope requires an identifier", scope.kind),
			)
			.with_meta(meta.scope(&scope)));
		}
		let Some(writer) = &self.override_writer else {
			return Err(Error::new(ErrorCode::OverrideStoreRequired).with_meta(meta.scope(&scope)));
		};
		let meta = meta.scope(&scope).store("override");

		write_override(writer.as_ref(), ctx, &normalized, &scope, value, actor)
			.await
			.map_err(|err| Error::wrap(err, ErrorCode::StoreWriteFailed).with_meta(meta.clone()))?;

		let mut alias_err = None;
		for alias in self.aliases.aliases_for(&normalized) {
			if let Err(err) = write_override(writer.as_ref(), ctx, alias, &scope, value, actor).await {
				warn!(key = %normalized, alias = %alias, error = %err, "alias override write failed");
				alias_err = Some(Error::wrap(err, ErrorCode::StoreWriteFailed).with_meta(meta.clone()));
				break;
			}
		}

		self.cache.clear();
		info!(
			key = %normalized,
			scope = %scope,
			action = action.as_str(),
			value = ?value,
			actor = %actor.id,
			"feature override updated"
		);
		self.emit_update(
			ctx,
			&UpdateEvent {
				key: trimmed.into(),
				normalized_key: normalized,
				scope,
				actor: actor.clone(),
				action,
				value,
			},
		);

		match alias_err {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}
}

async fn write_override(
	writer: &dyn OverrideWriter,
	ctx: &FeatureCtx,
	key: &str,
	scope: &ScopeRef,
	value: Option<bool>,
	actor: &ActorRef,
) -> FgResult<()> {
	match value {
		Some(enabled) => writer.set(ctx, key, scope, enabled, actor).await,
		None => writer.unset(ctx, key, scope, actor).await,
	}
}

#[async_trait]
impl FeatureGate for Gate {
	async fn enabled(&self, ctx: &FeatureCtx, key: &str) -> FgResult<bool> {
		Gate::enabled(self, ctx, key).await
	}

	async fn enabled_in(&self, ctx: &FeatureCtx, key: &str, chain: &ScopeChain) -> FgResult<bool> {
		Gate::enabled_in(self, ctx, key, chain).await
	}
}

#[async_trait]
impl TraceableFeatureGate for Gate {
	async fn resolve_with_trace(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		chain: Option<&ScopeChain>,
	) -> (FgResult<bool>, ResolveTrace) {
		Gate::resolve_with_trace(self, ctx, key, chain).await
	}
}

#[async_trait]
impl MutableFeatureGate for Gate {
	async fn set(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		enabled: bool,
		actor: &ActorRef,
	) -> FgResult<()> {
		Gate::set(self, ctx, key, scope, enabled, actor).await
	}

	async fn unset(&self, ctx: &FeatureCtx, key: &str, scope: &ScopeRef, actor: &ActorRef) -> FgResult<()> {
		Gate::unset(self, ctx, key, scope, actor).await
	}
}


// vim: ts=4
