//! Override store boundary
//!
//! The store is queried for every override matching a chain and mutated at a
//! single scope point. Keys handed to the store are already normalized.

use async_trait::async_trait;

use crate::actor::ActorRef;
use crate::context::FeatureCtx;
use crate::error::FgResult;
use crate::overrides::OverrideMatch;
use crate::scope::{ScopeChain, ScopeRef};

#[async_trait]
pub trait OverrideReader: Send + Sync {
	/// Every stored record (any state) for the chain's scopes, in chain order
	async fn get_all(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		chain: &ScopeChain,
	) -> FgResult<Vec<OverrideMatch>>;
}

#[async_trait]
pub trait OverrideWriter: Send + Sync {
	async fn set(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		enabled: bool,
		actor: &ActorRef,
	) -> FgResult<()>;

	/// Store the `unset` tombstone at `scope`
	async fn unset(
		&self,
		ctx: &FeatureCtx,
		key: &str,
		scope: &ScopeRef,
		actor: &ActorRef,
	) -> FgResult<()>;
}

/// Combined reader and writer
pub trait OverrideStore: OverrideReader + OverrideWriter {}

impl<T: OverrideReader + OverrideWriter> OverrideStore for T {}

// vim: ts=4
