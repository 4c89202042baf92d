//! Static in-memory defaults
//!
//! Defaults come either from a flat key/bool map or from a nested JSON object
//! whose paths are joined with a delimiter:
//!
//! ```json
//! { "checkout": { "v2": true }, "users": { "signup": null } }
//! ```
//!
//! yields `checkout.v2 = true`; `users.signup` is explicitly not set.
//! Non-boolean leaves are ignored.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use featuregate_types::defaults::{DefaultResult, Defaults};

use crate::keys::KeyAliases;
use crate::prelude::*;

pub const DEFAULT_DELIMITER: &str = ".";

#[derive(Debug, Clone, Default)]
pub struct StaticDefaults {
	values: HashMap<Box<str>, Option<bool>>,
}

impl StaticDefaults {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_bools<I, K>(values: I) -> Self
	where
		I: IntoIterator<Item = (K, bool)>,
		K: AsRef<str>,
	{
		Self::from_bools_with_aliases(values, &KeyAliases::new())
	}

	/// Keys are normalized so that a legacy key in the source lands on its
	/// canonical key
	pub fn from_bools_with_aliases<I, K>(values: I, aliases: &KeyAliases) -> Self
	where
		I: IntoIterator<Item = (K, bool)>,
		K: AsRef<str>,
	{
		let mut defaults = Self::new();
		for (key, value) in values {
			defaults.insert(aliases.normalize(key.as_ref()), Some(value));
		}
		defaults
	}

	pub fn from_json(json: &str) -> FgResult<Self> {
		Self::from_json_with(json, DEFAULT_DELIMITER, &KeyAliases::new())
	}

	pub fn from_json_with(json: &str, delimiter: &str, aliases: &KeyAliases) -> FgResult<Self> {
		let value: Value = serde_json::from_str(json)?;
		Self::from_value(&value, delimiter, aliases)
	}

	pub fn from_value(value: &Value, delimiter: &str, aliases: &KeyAliases) -> FgResult<Self> {
		let Value::Object(_) = value else {
			return Err(Error::with_message(ErrorCode::ConfigInvalid, "defaults must be a JSON object"));
		};
		let mut defaults = Self::new();
		defaults.flatten("", value, delimiter, aliases);
		Ok(defaults)
	}

	fn flatten(&mut self, prefix: &str, value: &Value, delimiter: &str, aliases: &KeyAliases) {
		match value {
			Value::Object(map) => {
				for (name, child) in map {
					let path = if prefix.is_empty() {
						name.clone()
					} else {
						format!("{prefix}{delimiter}{name}")
					};
					self.flatten(&path, child, delimiter, aliases);
				}
			}
			Value::Bool(b) => self.insert(aliases.normalize(prefix), Some(*b)),
			Value::Null => self.insert(aliases.normalize(prefix), None),
			_ => debug!("ignoring non-boolean default at '{}'", prefix),
		}
	}

	fn insert(&mut self, key: Box<str>, value: Option<bool>) {
		if !key.is_empty() {
			self.values.insert(key, value);
		}
	}

	/// Configured value; `None` when absent or explicitly null
	pub fn get(&self, key: &str) -> Option<bool> {
		self.values.get(key.trim()).copied().flatten()
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[async_trait]
impl Defaults for StaticDefaults {
	async fn default_for(&self, _ctx: &FeatureCtx, key: &str) -> FgResult<DefaultResult> {
		Ok(match self.get(key) {
			Some(value) => DefaultResult::of(value),
			None => DefaultResult::unset(),
		})
	}
}


// vim: ts=4
