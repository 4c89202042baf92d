//! Gate configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use featuregate_types::trace::ClaimsFailureMode;

use crate::chain::DEFAULT_SCOPE_ORDER;
use crate::keys::KeyAliases;
use crate::prelude::*;

/// Resolution behaviour of a `Gate`
///
/// Every field has a default, so a partial JSON document is valid:
///
/// ```json
/// { "claimsFailureMode": "fail_closed", "strictStore": true,
///   "aliases": { "users.self_registration": "users.signup" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GateConfig {
	/// Group order of derived chains and strategy evaluation
	pub scope_order: Vec<ScopeKind>,
	pub claims_failure_mode: ClaimsFailureMode,
	/// Abort resolution on override store read errors
	pub strict_store: bool,
	/// Keep provider order of roles/permissions instead of sorting them
	pub preserve_role_perm_order: bool,
	/// Append the system scope to the failure fallback chain
	pub append_system_on_failure: bool,
	/// Append the system scope to explicitly provided chains
	pub append_system_on_provided_chain: bool,
	/// Chain used when claims derivation fails in fail-open mode
	pub failure_fallback_chain: ScopeChain,
	/// Legacy key to canonical key
	pub aliases: BTreeMap<String, String>,
}

impl Default for GateConfig {
	fn default() -> Self {
		Self {
			scope_order: DEFAULT_SCOPE_ORDER.to_vec(),
			claims_failure_mode: ClaimsFailureMode::FailOpen,
			strict_store: false,
			preserve_role_perm_order: false,
			append_system_on_failure: true,
			append_system_on_provided_chain: false,
			failure_fallback_chain: ScopeChain::new(),
			aliases: BTreeMap::new(),
		}
	}
}

impl GateConfig {
	pub fn from_json(json: &str) -> FgResult<Self> {
		let config: GateConfig = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_value(value: serde_json::Value) -> FgResult<Self> {
		let config: GateConfig = serde_json::from_value(value)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject fallback chain refs lacking required identifiers
	pub fn validate(&self) -> FgResult<()> {
		if let Some(scope) = self.failure_fallback_chain.iter().find(|s| !s.has_required_ids()) {
			return Err(Error::with_message(
				ErrorCode::ConfigInvalid,
				format!("failure fallback scope '{}' has no identifier", scope.kind),
			));
		}
		Ok(())
	}

	pub fn key_aliases(&self) -> KeyAliases {
		KeyAliases::from_pairs(&self.aliases)
	}
}


// vim: ts=4
