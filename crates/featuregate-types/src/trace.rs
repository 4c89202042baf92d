//! Resolution provenance
//!
//! A `ResolveTrace` is an immutable snapshot of one resolution: which layer
//! decided, which overrides were seen, whether defaults were consulted and
//! whether the answer came from cache.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;
use crate::overrides::{Override, OverrideMatch};
use crate::scope::{ScopeChain, ScopeRef};

/// Which layer produced the final value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveSource {
	Override,
	Default,
	#[default]
	Fallback,
}

impl ResolveSource {
	pub fn as_str(&self) -> &'static str {
		match self {
			ResolveSource::Override => "override",
			ResolveSource::Default => "default",
			ResolveSource::Fallback => "fallback",
		}
	}
}

impl fmt::Display for ResolveSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Behaviour when claims or permission derivation fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimsFailureMode {
	/// Continue with the configured fallback chain
	#[default]
	FailOpen,
	/// Abort resolution and return the error
	FailClosed,
}

impl ClaimsFailureMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ClaimsFailureMode::FailOpen => "fail_open",
			ClaimsFailureMode::FailClosed => "fail_closed",
		}
	}
}

/// One candidate override seen during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideMatchTrace {
	pub scope: ScopeRef,
	pub state: Override,
	pub value: Option<bool>,
}

impl From<&OverrideMatch> for OverrideMatchTrace {
	fn from(m: &OverrideMatch) -> Self {
		Self { scope: m.scope.clone(), state: m.state, value: m.state.value() }
	}
}

/// Override layer details
#[derive(Debug, Clone, Default)]
pub struct OverrideTrace {
	/// State of the deciding override (`Missing` when none decided)
	pub state: Override,
	pub value: Option<bool>,
	/// Scope of the deciding override
	pub matched: Option<ScopeRef>,
	/// Legacy alias key the deciding override was stored under
	pub alias: Option<Box<str>>,
	/// Candidates of the evaluated group, in chain order
	pub matches: Vec<OverrideMatchTrace>,
	/// Store or strategy failure
	pub error: Option<Error>,
}

/// Defaults layer details
#[derive(Debug, Clone, Default)]
pub struct DefaultTrace {
	/// Whether defaults were consulted at all
	pub checked: bool,
	/// Whether a default is configured for the key
	pub set: bool,
	pub value: bool,
	pub error: Option<Error>,
}

/// Snapshot of one resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveTrace {
	pub key: Box<str>,
	pub normalized_key: Box<str>,
	pub chain: ScopeChain,
	pub value: bool,
	pub source: ResolveSource,
	pub overrides: OverrideTrace,
	pub defaults: DefaultTrace,
	pub cache_hit: bool,
	pub strategy: Box<str>,
	pub claims_failure_mode: ClaimsFailureMode,
}

impl ResolveTrace {
	pub fn new(key: &str, normalized_key: &str) -> Self {
		Self { key: key.into(), normalized_key: normalized_key.into(), ..Self::default() }
	}

	/// First error recorded by any layer
	pub fn error(&self) -> Option<&Error> {
		self.overrides.error.as_ref().or(self.defaults.error.as_ref())
	}
}

// vim: ts=4
