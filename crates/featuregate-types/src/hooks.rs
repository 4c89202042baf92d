//! Observer hooks
//!
//! Hooks are invoked synchronously, in registration order, before the gate
//! returns. Wrap a hook in a queue and worker if fan-out must not block.

use serde::{Deserialize, Serialize};

use crate::actor::ActorRef;
use crate::context::FeatureCtx;
use crate::error::Error;
use crate::scope::{ScopeChain, ScopeRef};
use crate::trace::{ResolveSource, ResolveTrace};

/// Emitted after every resolution attempt, successful or not
#[derive(Debug, Clone)]
pub struct ResolveEvent {
	pub key: Box<str>,
	pub normalized_key: Box<str>,
	pub chain: ScopeChain,
	pub value: bool,
	pub source: ResolveSource,
	pub error: Option<Error>,
	pub trace: ResolveTrace,
}

impl ResolveEvent {
	pub fn from_trace(trace: &ResolveTrace, error: Option<&Error>) -> Self {
		Self {
			key: trace.key.clone(),
			normalized_key: trace.normalized_key.clone(),
			chain: trace.chain.clone(),
			value: trace.value,
			source: trace.source,
			error: error.cloned(),
			trace: trace.clone(),
		}
	}
}

/// Kind of override mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
	Set,
	Unset,
}

impl UpdateAction {
	pub fn as_str(&self) -> &'static str {
		match self {
			UpdateAction::Set => "set",
			UpdateAction::Unset => "unset",
		}
	}
}

/// Emitted after every override mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
	pub key: Box<str>,
	pub normalized_key: Box<str>,
	pub scope: ScopeRef,
	pub actor: ActorRef,
	pub action: UpdateAction,
	/// Written value; `None` for `Unset`
	pub value: Option<bool>,
}

pub trait ResolveHook: Send + Sync {
	fn on_resolve(&self, ctx: &FeatureCtx, event: &ResolveEvent);
}

impl<F> ResolveHook for F
where
	F: Fn(&FeatureCtx, &ResolveEvent) + Send + Sync,
{
	fn on_resolve(&self, ctx: &FeatureCtx, event: &ResolveEvent) {
		self(ctx, event);
	}
}

pub trait ActivityHook: Send + Sync {
	fn on_update(&self, ctx: &FeatureCtx, event: &UpdateEvent);
}

impl<F> ActivityHook for F
where
	F: Fn(&FeatureCtx, &UpdateEvent) + Send + Sync,
{
	fn on_update(&self, ctx: &FeatureCtx, event: &UpdateEvent) {
		self(ctx, event);
	}
}

// vim: ts=4
