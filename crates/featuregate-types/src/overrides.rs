//! Runtime override states and chain matches

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scope::ScopeRef;

/// Override state stored at one scope
///
/// `Missing` and `Unset` resolve identically (no value at this scope) but are
/// kept apart so audit tooling can tell "never configured" from "explicitly
/// cleared".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Override {
	#[default]
	Missing,
	Enabled,
	Disabled,
	Unset,
}

impl Override {
	pub fn from_bool(enabled: bool) -> Self {
		if enabled { Override::Enabled } else { Override::Disabled }
	}

	/// Concrete value, only for `Enabled` / `Disabled`
	pub fn value(&self) -> Option<bool> {
		match self {
			Override::Enabled => Some(true),
			Override::Disabled => Some(false),
			Override::Missing | Override::Unset => None,
		}
	}

	pub fn has_value(&self) -> bool {
		self.value().is_some()
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Override::Missing => "missing",
			Override::Enabled => "enabled",
			Override::Disabled => "disabled",
			Override::Unset => "unset",
		}
	}
}

impl fmt::Display for Override {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A stored override found at one scope of a requested chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideMatch {
	pub scope: ScopeRef,
	pub state: Override,
}

impl OverrideMatch {
	pub fn new(scope: ScopeRef, state: Override) -> Self {
		Self { scope, state }
	}

	pub fn value(&self) -> Option<bool> {
		self.state.value()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_only_concrete_states_carry_values() {
		assert_eq!(Override::Enabled.value(), Some(true));
		assert_eq!(Override::Disabled.value(), Some(false));
		assert_eq!(Override::Missing.value(), None);
		assert_eq!(Override::Unset.value(), None);
		assert_ne!(Override::Missing, Override::Unset);
	}

	#[test]
	fn test_from_bool() {
		assert_eq!(Override::from_bool(true), Override::Enabled);
		assert_eq!(Override::from_bool(false), Override::Disabled);
	}
}

// vim: ts=4
