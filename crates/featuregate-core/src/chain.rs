//! Scope chain construction from actor claims
//!
//! The chain lists every policy level that could hold an override for the
//! actor, in configured group order. Role and permission identifiers are
//! normalized and deduplicated; each surviving identifier yields a global ref
//! and, when tenant/org context exists, a tenant/org-qualified ref.

use itertools::Itertools;
use std::fmt;
use std::sync::Arc;

use crate::prelude::*;

/// Normalizes role/permission identifiers
pub type IdentifierNormalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default group order: user, role, perm, org, tenant, system
pub const DEFAULT_SCOPE_ORDER: [ScopeKind; 6] = [
	ScopeKind::User,
	ScopeKind::Role,
	ScopeKind::Perm,
	ScopeKind::Org,
	ScopeKind::Tenant,
	ScopeKind::System,
];

/// Trim and lowercase
pub fn default_normalizer() -> IdentifierNormalizer {
	Arc::new(|value: &str| value.trim().to_lowercase())
}

/// Builds scope chains from claims
#[derive(Clone)]
pub struct ChainBuilder {
	scope_order: Vec<ScopeKind>,
	preserve_order: bool,
	normalizer: IdentifierNormalizer,
}

impl fmt::Debug for ChainBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChainBuilder")
			.field("scope_order", &self.scope_order)
			.field("preserve_order", &self.preserve_order)
			.field("normalizer", &"<function>")
			.finish()
	}
}

impl Default for ChainBuilder {
	fn default() -> Self {
		Self {
			scope_order: DEFAULT_SCOPE_ORDER.to_vec(),
			preserve_order: false,
			normalizer: default_normalizer(),
		}
	}
}

impl ChainBuilder {
	pub fn new(
		scope_order: impl Into<Vec<ScopeKind>>,
		preserve_order: bool,
		normalizer: IdentifierNormalizer,
	) -> Self {
		let scope_order: Vec<ScopeKind> = scope_order.into().into_iter().unique().collect();
		let scope_order =
			if scope_order.is_empty() { DEFAULT_SCOPE_ORDER.to_vec() } else { scope_order };
		Self { scope_order, preserve_order, normalizer }
	}

	pub fn scope_order(&self) -> &[ScopeKind] {
		&self.scope_order
	}

	/// Normalize one role/permission identifier
	pub fn normalize_identifier(&self, value: &str) -> String {
		let trimmed = value.trim();
		if trimmed.is_empty() {
			return String::new();
		}
		(self.normalizer)(trimmed)
	}

	/// Trim a scope ref and normalize its identifier for role/perm kinds
	pub fn normalize_scope(&self, scope: &ScopeRef) -> ScopeRef {
		let mut scope = scope.trimmed();
		if scope.kind.is_role_perm() {
			scope.id = self.normalize_identifier(&scope.id).into();
		}
		scope
	}

	/// Normalize every ref of an externally supplied chain
	pub fn normalize_chain(&self, chain: &ScopeChain) -> ScopeChain {
		chain.iter().map(|scope| self.normalize_scope(scope)).collect()
	}

	fn normalize_list(&self, values: &[Box<str>]) -> Vec<String> {
		let normalized = values
			.iter()
			.map(|value| self.normalize_identifier(value))
			.filter(|value| !value.is_empty());
		if self.preserve_order {
			normalized.unique().collect()
		} else {
			normalized.sorted().dedup().collect()
		}
	}

	/// Build the chain for `claims`. Never fails; absent identifiers yield no
	/// ref. The result always ends with a system scope.
	pub fn build(&self, claims: &ActorClaims) -> ScopeChain {
		let subject = claims.subject_id.trim();
		let tenant = claims.tenant_id.trim();
		let org = claims.org_id.trim();
		let roles = self.normalize_list(&claims.roles);
		let perms = self.normalize_list(&claims.perms);

		let mut chain = ScopeChain::with_capacity((roles.len() + perms.len()) * 2 + 4);
		for kind in &self.scope_order {
			match kind {
				ScopeKind::User => {
					if !subject.is_empty() {
						chain.push(ScopeRef::user(tenant, org, subject));
					}
				}
				ScopeKind::Role | ScopeKind::Perm => {
					let items = if *kind == ScopeKind::Role { &roles } else { &perms };
					for id in items {
						chain.push(ScopeRef {
							kind: *kind,
							id: id.as_str().into(),
							..ScopeRef::default()
						});
						if !tenant.is_empty() || !org.is_empty() {
							chain.push(ScopeRef {
								kind: *kind,
								id: id.as_str().into(),
								tenant_id: tenant.into(),
								org_id: org.into(),
							});
						}
					}
				}
				ScopeKind::Org => {
					if !org.is_empty() {
						chain.push(ScopeRef::org(tenant, org));
					}
				}
				ScopeKind::Tenant => {
					if !tenant.is_empty() {
						chain.push(ScopeRef::tenant(tenant));
					}
				}
				ScopeKind::System => {
					if !chain.has_system() {
						chain.push(ScopeRef::system());
					}
				}
			}
		}
		chain.with_system()
	}
}

/// Build a chain in one call
pub fn build_chain(
	claims: &ActorClaims,
	scope_order: &[ScopeKind],
	preserve_order: bool,
	normalizer: IdentifierNormalizer,
) -> ScopeChain {
	ChainBuilder::new(scope_order.to_vec(), preserve_order, normalizer).build(claims)
}


// vim: ts=4
