//! Feature key normalization and legacy aliases
//!
//! A legacy alias maps to exactly one canonical key. Resolution normalizes the
//! requested key to its canonical form, then retries unmatched lookups under
//! every alias of that key. Mutations are replicated to every alias.

use std::collections::HashMap;

/// Legacy alias table
#[derive(Debug, Clone, Default)]
pub struct KeyAliases {
	to_canonical: HashMap<Box<str>, Box<str>>,
	by_canonical: HashMap<Box<str>, Vec<Box<str>>>,
}

impl KeyAliases {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from `(alias, canonical)` pairs. Blank entries and self-aliases
	/// are skipped.
	pub fn from_pairs<I, A, C>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (A, C)>,
		A: AsRef<str>,
		C: AsRef<str>,
	{
		let mut aliases = Self::new();
		for (alias, canonical) in pairs {
			aliases.insert(alias.as_ref(), canonical.as_ref());
		}
		aliases
	}

	pub fn insert(&mut self, alias: &str, canonical: &str) {
		let alias = alias.trim();
		let canonical = canonical.trim();
		if alias.is_empty() || canonical.is_empty() || alias == canonical {
			return;
		}
		if let Some(previous) = self.to_canonical.insert(alias.into(), canonical.into()) {
			if let Some(list) = self.by_canonical.get_mut(&previous) {
				list.retain(|a| a.as_ref() != alias);
			}
		}
		let list = self.by_canonical.entry(canonical.into()).or_default();
		list.push(alias.into());
		list.sort();
	}

	pub fn is_empty(&self) -> bool {
		self.to_canonical.is_empty()
	}

	pub fn len(&self) -> usize {
		self.to_canonical.len()
	}

	/// Trim the key and resolve a legacy alias. Returns an empty string for a
	/// blank key.
	pub fn normalize(&self, key: &str) -> Box<str> {
		let key = key.trim();
		match self.to_canonical.get(key) {
			Some(canonical) => canonical.clone(),
			None => key.into(),
		}
	}

	/// Normalized key and whether an alias was applied
	pub fn resolve_alias(&self, key: &str) -> (Box<str>, bool) {
		let normalized = self.normalize(key);
		let applied = !normalized.is_empty() && normalized.as_ref() != key.trim();
		(normalized, applied)
	}

	pub fn is_alias(&self, key: &str) -> bool {
		self.to_canonical.contains_key(key.trim())
	}

	/// Legacy keys of a canonical key, sorted
	pub fn aliases_for(&self, canonical: &str) -> &[Box<str>] {
		self.by_canonical.get(canonical.trim()).map(Vec::as_slice).unwrap_or_default()
	}
}


// vim: ts=4
