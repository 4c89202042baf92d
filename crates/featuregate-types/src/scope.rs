//! Scope references and chains
//!
//! A `ScopeRef` addresses one policy point at which an override may be stored.
//! A `ScopeChain` is the ordered list of every policy point applicable to one
//! resolution, most authoritative first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Policy level at which an override may be stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
	#[default]
	System,
	Tenant,
	Org,
	User,
	Role,
	Perm,
}

impl ScopeKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ScopeKind::System => "system",
			ScopeKind::Tenant => "tenant",
			ScopeKind::Org => "org",
			ScopeKind::User => "user",
			ScopeKind::Role => "role",
			ScopeKind::Perm => "perm",
		}
	}

	/// Role and permission scopes are named by an identifier that is normalized
	pub fn is_role_perm(&self) -> bool {
		matches!(self, ScopeKind::Role | ScopeKind::Perm)
	}
}

impl fmt::Display for ScopeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One addressable policy point
///
/// Absent identifiers are empty strings. Which fields are meaningful depends
/// on `kind`:
/// - `system`: none
/// - `tenant`: `id` (= `tenant_id`)
/// - `org`: `id` (= `org_id`), optionally `tenant_id`
/// - `user`: `id` (subject), optionally `tenant_id` / `org_id`
/// - `role` / `perm`: `id` (role or permission name), optionally `tenant_id` / `org_id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRef {
	pub kind: ScopeKind,
	#[serde(default)]
	pub id: Box<str>,
	#[serde(default)]
	pub tenant_id: Box<str>,
	#[serde(default)]
	pub org_id: Box<str>,
}

impl ScopeRef {
	pub fn system() -> Self {
		Self::default()
	}

	pub fn tenant(tenant_id: impl Into<Box<str>>) -> Self {
		let tenant_id = tenant_id.into();
		Self { kind: ScopeKind::Tenant, id: tenant_id.clone(), tenant_id, org_id: "".into() }
	}

	pub fn org(tenant_id: impl Into<Box<str>>, org_id: impl Into<Box<str>>) -> Self {
		let org_id = org_id.into();
		Self { kind: ScopeKind::Org, id: org_id.clone(), tenant_id: tenant_id.into(), org_id }
	}

	pub fn user(
		tenant_id: impl Into<Box<str>>,
		org_id: impl Into<Box<str>>,
		subject_id: impl Into<Box<str>>,
	) -> Self {
		Self {
			kind: ScopeKind::User,
			id: subject_id.into(),
			tenant_id: tenant_id.into(),
			org_id: org_id.into(),
		}
	}

	/// Global role scope (applies regardless of tenant/org)
	pub fn role(role: impl Into<Box<str>>) -> Self {
		Self { kind: ScopeKind::Role, id: role.into(), ..Self::default() }
	}

	/// Role scope qualified by tenant and/or org
	pub fn role_in(
		role: impl Into<Box<str>>,
		tenant_id: impl Into<Box<str>>,
		org_id: impl Into<Box<str>>,
	) -> Self {
		Self { kind: ScopeKind::Role, id: role.into(), tenant_id: tenant_id.into(), org_id: org_id.into() }
	}

	/// Global permission scope
	pub fn perm(perm: impl Into<Box<str>>) -> Self {
		Self { kind: ScopeKind::Perm, id: perm.into(), ..Self::default() }
	}

	/// Permission scope qualified by tenant and/or org
	pub fn perm_in(
		perm: impl Into<Box<str>>,
		tenant_id: impl Into<Box<str>>,
		org_id: impl Into<Box<str>>,
	) -> Self {
		Self { kind: ScopeKind::Perm, id: perm.into(), tenant_id: tenant_id.into(), org_id: org_id.into() }
	}

	pub fn is_system(&self) -> bool {
		self.kind == ScopeKind::System
	}

	/// Whether the ref carries every identifier its kind requires
	pub fn has_required_ids(&self) -> bool {
		match self.kind {
			ScopeKind::System => true,
			_ => !self.id.is_empty(),
		}
	}

	/// Trim identifiers and clear the ones `kind` does not use.
	///
	/// Tenant and org refs are self-identifying: a missing `tenant_id` (or
	/// `org_id`) is filled from `id` and vice versa.
	pub fn trimmed(&self) -> Self {
		let id: Box<str> = self.id.trim().into();
		let tenant_id: Box<str> = self.tenant_id.trim().into();
		let org_id: Box<str> = self.org_id.trim().into();
		match self.kind {
			ScopeKind::System => Self::system(),
			ScopeKind::Tenant => {
				let id = if id.is_empty() { tenant_id } else { id };
				Self::tenant(id)
			}
			ScopeKind::Org => {
				let id = if id.is_empty() { org_id } else { id };
				Self::org(tenant_id, id)
			}
			kind => Self { kind, id, tenant_id, org_id },
		}
	}
}

impl fmt::Display for ScopeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.kind {
			ScopeKind::System => f.write_str("system"),
			ScopeKind::Tenant | ScopeKind::Org => write!(f, "{}:{}", self.kind, self.id),
			_ => {
				write!(f, "{}:{}", self.kind, self.id)?;
				if !self.tenant_id.is_empty() || !self.org_id.is_empty() {
					write!(f, "@{}/{}", self.tenant_id, self.org_id)?;
				}
				Ok(())
			}
		}
	}
}

/// Ordered sequence of scope references
///
/// Chains are built fresh for every resolution and never mutated after
/// construction; callers receive copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeChain(Vec<ScopeRef>);

impl ScopeChain {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self(Vec::with_capacity(capacity))
	}

	pub fn push(&mut self, scope: ScopeRef) {
		self.0.push(scope);
	}

	pub fn extend(&mut self, scopes: impl IntoIterator<Item = ScopeRef>) {
		self.0.extend(scopes);
	}

	pub fn has_system(&self) -> bool {
		self.0.iter().any(ScopeRef::is_system)
	}

	/// Append the system scope unless the chain already holds one
	pub fn with_system(mut self) -> Self {
		if !self.has_system() {
			self.0.push(ScopeRef::system());
		}
		self
	}

	pub fn into_vec(self) -> Vec<ScopeRef> {
		self.0
	}
}

impl Deref for ScopeChain {
	type Target = [ScopeRef];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Vec<ScopeRef>> for ScopeChain {
	fn from(scopes: Vec<ScopeRef>) -> Self {
		Self(scopes)
	}
}

impl FromIterator<ScopeRef> for ScopeChain {
	fn from_iter<I: IntoIterator<Item = ScopeRef>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a ScopeChain {
	type Item = &'a ScopeRef;
	type IntoIter = std::slice::Iter<'a, ScopeRef>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl IntoIterator for ScopeChain {
	type Item = ScopeRef;
	type IntoIter = std::vec::IntoIter<ScopeRef>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl fmt::Display for ScopeChain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[")?;
		for (i, scope) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}", scope)?;
		}
		f.write_str("]")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tenant_ref_is_self_identifying() {
		let scope = ScopeRef { kind: ScopeKind::Tenant, id: " acme ".into(), ..ScopeRef::default() };
		assert_eq!(scope.trimmed(), ScopeRef::tenant("acme"));

		let scope = ScopeRef { kind: ScopeKind::Tenant, tenant_id: "acme".into(), ..ScopeRef::default() };
		assert_eq!(scope.trimmed(), ScopeRef::tenant("acme"));
	}

	#[test]
	fn test_system_ref_drops_identifiers() {
		let scope = ScopeRef {
			kind: ScopeKind::System,
			id: "x".into(),
			tenant_id: "t".into(),
			org_id: "o".into(),
		};
		assert_eq!(scope.trimmed(), ScopeRef::system());
	}

	#[test]
	fn test_required_ids() {
		assert!(ScopeRef::system().has_required_ids());
		assert!(ScopeRef::role("admin").has_required_ids());
		assert!(!ScopeRef::role("").has_required_ids());
		assert!(!ScopeRef { kind: ScopeKind::User, ..ScopeRef::default() }.has_required_ids());
	}

	#[test]
	fn test_with_system_appends_once() {
		let chain = ScopeChain::from(vec![ScopeRef::tenant("acme")]).with_system();
		assert_eq!(chain.len(), 2);
		let chain = chain.with_system();
		assert_eq!(chain.len(), 2);
		assert!(chain[1].is_system());
	}

	#[test]
	fn test_display() {
		assert_eq!(ScopeRef::tenant("acme").to_string(), "tenant:acme");
		assert_eq!(ScopeRef::system().to_string(), "system");
		assert_eq!(ScopeRef::role("admin").to_string(), "role:admin");
		assert_eq!(ScopeRef::role_in("admin", "acme", "").to_string(), "role:admin@acme/");
	}

	#[test]
	fn test_serde_names() {
		let json = serde_json::to_value(ScopeRef::org("acme", "o1")).unwrap();
		assert_eq!(json["kind"], "org");
		assert_eq!(json["tenantId"], "acme");
		assert_eq!(json["orgId"], "o1");
	}
}

// vim: ts=4
