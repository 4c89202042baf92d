//! Feature gate traits implemented by the resolution engine

use async_trait::async_trait;

use crate::actor::ActorRef;
use crate::context::FeatureCtx;
use crate::error::FgResult;
use crate::scope::{ScopeChain, ScopeRef};
use crate::trace::ResolveTrace;

/// Answers "is this feature enabled for the current actor"
#[async_trait]
pub trait FeatureGate: Send + Sync {
	async fn enabled(&self, ctx: &FeatureCtx, key: &str) -> FgResult<bool>;

	/// Resolve against an explicit chain instead of deriving one from claims
	async fn enabled_in(&self, ctx: &FeatureCtx, key: &str, chain: &ScopeChain) -> FgResult<bool>;
}

/// Feature gate that can explain its answers
#[async_trait]
pub trait TraceableFeatureGate: FeatureGate {
	/// On error the returned value is always `false`; the trace is carried
	/// alongside so callers can see which layer failed.
	async fn resolve_with_trace(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		chain: Option<&ScopeChain>,
	) -> (FgResult<bool>, ResolveTrace);
}

/// Feature gate with runtime overrides
#[async_trait]
pub trait MutableFeatureGate: FeatureGate {
	async fn set(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		enabled: bool,
		actor: &ActorRef,
	) -> FgResult<()>;

	async fn unset(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		actor: &ActorRef,
	) -> FgResult<()>;
}

// vim: ts=4
