//! Static configuration defaults boundary

use async_trait::async_trait;

use crate::context::FeatureCtx;
use crate::error::FgResult;

/// Result of a default lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultResult {
	pub set: bool,
	pub value: bool,
}

impl DefaultResult {
	pub fn unset() -> Self {
		Self::default()
	}

	pub fn of(value: bool) -> Self {
		Self { set: true, value }
	}
}

/// Resolves configured defaults for normalized feature keys
#[async_trait]
pub trait Defaults: Send + Sync {
	async fn default_for(&self, ctx: &FeatureCtx, key: &str) -> FgResult<DefaultResult>;
}

/// Defaults that never configure anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDefaults;

#[async_trait]
impl Defaults for NoopDefaults {
	async fn default_for(&self, _ctx: &FeatureCtx, _key: &str) -> FgResult<DefaultResult> {
		Ok(DefaultResult::unset())
	}
}

// vim: ts=4
