//! Feature catalog
//!
//! Features are registered during startup into a mutable `FeatureRegistry`,
//! which is then frozen into an immutable `FeatureCatalog`. The catalog lists
//! known features and serves their defaults.

use async_trait::async_trait;
use std::collections::HashMap;

use featuregate_types::defaults::{DefaultResult, Defaults};

use crate::prelude::*;

/// Feature definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDefinition {
	/// Canonical dot-separated key (e.g. "checkout.v2")
	pub key: Box<str>,
	pub description: Box<str>,
	/// `None` leaves the feature on the hard-coded `false` fallback
	pub default: Option<bool>,
}

impl FeatureDefinition {
	pub fn builder(key: impl Into<Box<str>>) -> FeatureDefinitionBuilder {
		FeatureDefinitionBuilder::new(key)
	}
}

/// Builder for FeatureDefinition
#[derive(Debug)]
pub struct FeatureDefinitionBuilder {
	key: Box<str>,
	description: Option<Box<str>>,
	default: Option<bool>,
}

impl FeatureDefinitionBuilder {
	pub fn new(key: impl Into<Box<str>>) -> Self {
		Self { key: key.into(), description: None, default: None }
	}

	/// Set the description (required)
	pub fn description(mut self, description: impl Into<Box<str>>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn default(mut self, value: bool) -> Self {
		self.default = Some(value);
		self
	}

	pub fn build(self) -> FgResult<FeatureDefinition> {
		let key: Box<str> = self.key.trim().into();
		if key.is_empty() {
			return Err(Error::new(ErrorCode::FeatureKeyRequired));
		}
		let description = self.description.ok_or_else(|| {
			Error::with_message(ErrorCode::ConfigInvalid, format!("feature '{key}' has no description"))
		})?;

		Ok(FeatureDefinition { key, description, default: self.default })
	}
}

/// Mutable registry used during startup
#[derive(Debug, Default)]
pub struct FeatureRegistry {
	definitions: HashMap<Box<str>, FeatureDefinition>,
}

impl FeatureRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, def: FeatureDefinition) -> FgResult<()> {
		if self.definitions.contains_key(&def.key) {
			return Err(Error::with_message(
				ErrorCode::ConfigInvalid,
				format!("feature '{}' is already registered", def.key),
			));
		}

		debug!("Registering feature: {}", def.key);
		self.definitions.insert(def.key.clone(), def);
		Ok(())
	}

	pub fn freeze(self) -> FeatureCatalog {
		info!("Freezing feature registry with {} definitions", self.definitions.len());
		let mut sorted: Vec<FeatureDefinition> = self.definitions.into_values().collect();
		sorted.sort_by(|a, b| a.key.cmp(&b.key));
		let index = sorted.iter().enumerate().map(|(i, def)| (def.key.clone(), i)).collect();
		FeatureCatalog { definitions: sorted, index }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

/// Immutable catalog
#[derive(Debug, Default)]
pub struct FeatureCatalog {
	definitions: Vec<FeatureDefinition>,
	index: HashMap<Box<str>, usize>,
}

impl FeatureCatalog {
	pub fn get(&self, key: &str) -> Option<&FeatureDefinition> {
		self.index.get(key.trim()).and_then(|i| self.definitions.get(*i))
	}

	/// Definitions sorted by key
	pub fn list(&self) -> &[FeatureDefinition] {
		&self.definitions
	}

	pub fn list_by_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a FeatureDefinition> {
		self.definitions.iter().filter(move |def| def.key.starts_with(prefix))
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

#[async_trait]
impl Defaults for FeatureCatalog {
	async fn default_for(&self, _ctx: &FeatureCtx, key: &str) -> FgResult<DefaultResult> {
		Ok(match self.get(key).and_then(|def| def.default) {
			Some(value) => DefaultResult::of(value),
			None => DefaultResult::unset(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn def(key: &str, default: Option<bool>) -> FeatureDefinition {
		let builder = FeatureDefinition::builder(key).description("test feature");
		match default {
			Some(value) => builder.default(value),
			None => builder,
		}
		.build()
		.unwrap()
	}

	#[test]
	fn test_builder_requires_key_and_description() {
		let err = FeatureDefinition::builder("  ").description("x").build().unwrap_err();
		assert_eq!(err.code(), ErrorCode::FeatureKeyRequired);

		let err = FeatureDefinition::builder("checkout.v2").build().unwrap_err();
		assert_eq!(err.code(), ErrorCode::ConfigInvalid);
	}

	#[test]
	fn test_duplicate_rejected() {
		let mut registry = FeatureRegistry::new();
		registry.register(def("checkout.v2", Some(true))).unwrap();
		let err = registry.register(def("checkout.v2", None)).unwrap_err();
		assert_eq!(err.code(), ErrorCode::ConfigInvalid);
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_frozen_catalog_is_sorted() {
		let mut registry = FeatureRegistry::new();
		registry.register(def("users.signup", None)).unwrap();
		registry.register(def("checkout.v2", Some(true))).unwrap();
		registry.register(def("checkout.legacy", Some(false))).unwrap();
		let catalog = registry.freeze();

		let keys: Vec<&str> = catalog.list().iter().map(|d| &*d.key).collect();
		assert_eq!(keys, vec!["checkout.legacy", "checkout.v2", "users.signup"]);
		assert_eq!(catalog.list_by_prefix("checkout.").count(), 2);
		assert_eq!(catalog.get(" users.signup").map(|d| d.default), Some(None));
	}

	#[tokio::test]
	async fn test_catalog_defaults() {
		let mut registry = FeatureRegistry::new();
		registry.register(def("checkout.v2", Some(true))).unwrap();
		registry.register(def("users.signup", None)).unwrap();
		let catalog = registry.freeze();
		let ctx = FeatureCtx::new();

		assert_eq!(catalog.default_for(&ctx, "checkout.v2").await.unwrap(), DefaultResult::of(true));
		assert_eq!(catalog.default_for(&ctx, "users.signup").await.unwrap(), DefaultResult::unset());
		assert_eq!(catalog.default_for(&ctx, "unknown").await.unwrap(), DefaultResult::unset());
	}
}

// vim: ts=4
