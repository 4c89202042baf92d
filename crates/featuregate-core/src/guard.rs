//! Require a feature before running a code path

use std::fmt;
use std::sync::Arc;

use featuregate_types::gate::FeatureGate;

use crate::prelude::*;

/// Maps gate errors into caller-specific guard errors
pub type ErrorMapper = Arc<dyn Fn(Error) -> GuardError + Send + Sync>;

/// Guard failure
#[derive(Debug, Clone)]
pub enum GuardError {
	/// The feature and every fallback key are disabled
	Disabled { key: Box<str> },
	/// Caller-supplied rejection
	Message(Box<str>),
	/// Resolution failed
	Gate(Error),
}

impl fmt::Display for GuardError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GuardError::Disabled { key } if key.is_empty() => write!(f, "feature disabled"),
			GuardError::Disabled { key } => write!(f, "feature disabled: {}", key),
			GuardError::Message(msg) => write!(f, "{}", msg),
			GuardError::Gate(err) => write!(f, "feature gate error: {}", err),
		}
	}
}

impl std::error::Error for GuardError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			GuardError::Gate(err) => Some(err),
			_ => None,
		}
	}
}

impl From<Error> for GuardError {
	fn from(err: Error) -> Self {
		GuardError::Gate(err)
	}
}

#[derive(Clone, Default)]
pub struct RequireOpts {
	/// Keys that also grant access when the primary key is disabled
	pub fallback_keys: Vec<Box<str>>,
	/// Returned as `GuardError::Message` instead of `Disabled`
	pub disabled_message: Option<Box<str>>,
	pub error_mapper: Option<ErrorMapper>,
}

impl fmt::Debug for RequireOpts {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RequireOpts")
			.field("fallback_keys", &self.fallback_keys)
			.field("disabled_message", &self.disabled_message)
			.field("error_mapper", &self.error_mapper.is_some())
			.finish()
	}
}

impl RequireOpts {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn fallback_keys<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		self.fallback_keys.extend(keys.into_iter().map(Into::into));
		self
	}

	pub fn disabled_message(mut self, message: impl Into<Box<str>>) -> Self {
		self.disabled_message = Some(message.into());
		self
	}

	pub fn error_mapper<F>(mut self, mapper: F) -> Self
	where
		F: Fn(Error) -> GuardError + Send + Sync + 'static,
	{
		self.error_mapper = Some(Arc::new(mapper));
		self
	}

	fn map_err(&self, err: Error) -> GuardError {
		match &self.error_mapper {
			Some(mapper) => mapper(err),
			None => GuardError::Gate(err),
		}
	}
}

/// Succeed when `key` or any fallback key is enabled. Keys are checked in
/// order and the first resolution error aborts the check.
pub async fn require<G>(gate: &G, ctx: &FeatureCtx, key: &str, opts: &RequireOpts) -> Result<(), GuardError>
where
	G: FeatureGate + ?Sized,
{
	let keys = std::iter::once(key).chain(opts.fallback_keys.iter().map(|k| &**k));
	for candidate in keys {
		match gate.enabled(ctx, candidate).await {
			Ok(true) => return Ok(()),
			Ok(false) => {}
			Err(err) => return Err(opts.map_err(err)),
		}
	}

	debug!(key = %key, "feature guard rejected");
	match &opts.disabled_message {
		Some(msg) => Err(GuardError::Message(msg.clone())),
		None => Err(GuardError::Disabled { key: key.trim().into() }),
	}
}


// vim: ts=4
