//! Claims and permission providers

use async_trait::async_trait;

use crate::actor::ActorClaims;
use crate::context::FeatureCtx;
use crate::error::FgResult;

/// Derives actor claims from the request context
#[async_trait]
pub trait ClaimsProvider: Send + Sync {
	async fn claims_from_context(&self, ctx: &FeatureCtx) -> FgResult<ActorClaims>;
}

/// Supplies extra permissions for an actor; merged into `claims.perms`
#[async_trait]
pub trait PermissionProvider: Send + Sync {
	async fn permissions(&self, ctx: &FeatureCtx, claims: &ActorClaims) -> FgResult<Vec<Box<str>>>;
}

/// Reads `ActorClaims` stored in the context. Never fails: a context without
/// claims describes an anonymous actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextClaimsProvider;

#[async_trait]
impl ClaimsProvider for ContextClaimsProvider {
	async fn claims_from_context(&self, ctx: &FeatureCtx) -> FgResult<ActorClaims> {
		Ok(ctx.claims().cloned().unwrap_or_default())
	}
}


// vim: ts=4
