//! Override resolution strategies
//!
//! A strategy turns the override matches of one chain into a decision. The
//! configured scope order is collapsed into five groups (`user`, `role_perm`,
//! `org`, `tenant`, `system`); the first group that yields a decision wins.
//! Matches in the `missing` or `unset` state never decide.

use std::collections::HashMap;
use std::fmt;

use featuregate_types::overrides::{Override, OverrideMatch};
use featuregate_types::trace::OverrideMatchTrace;

use crate::prelude::*;

/// Inputs a strategy needs besides the matches themselves
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions<'a> {
	pub scope_order: &'a [ScopeKind],
}

/// Strategy outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideDecision {
	pub matched: bool,
	pub value: bool,
	/// State of the deciding match (`Missing` when not matched)
	pub state: Override,
	pub matched_scope: Option<ScopeRef>,
	/// Candidates of the deciding group, in chain order
	pub matches: Vec<OverrideMatchTrace>,
}

impl OverrideDecision {
	pub fn not_matched() -> Self {
		Self::default()
	}

	fn decided(scope: &ScopeRef, state: Override, matches: &[&OverrideMatch]) -> Self {
		Self {
			matched: true,
			value: state == Override::Enabled,
			state,
			matched_scope: Some(scope.clone()),
			matches: matches.iter().map(|m| OverrideMatchTrace::from(*m)).collect(),
		}
	}
}

/// Pluggable resolution strategy
pub trait ResolveStrategy: Send + Sync {
	/// Recorded in traces
	fn name(&self) -> &str;

	/// Must be deterministic for identical inputs
	fn resolve(
		&self,
		key: &str,
		chain: &ScopeChain,
		matches: &[OverrideMatch],
		opts: &ResolveOptions<'_>,
	) -> FgResult<OverrideDecision>;
}

/// Evaluation group of the configured scope order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeGroup {
	User,
	RolePerm,
	Org,
	Tenant,
	System,
}

impl ScopeGroup {
	pub fn of(kind: ScopeKind) -> Self {
		match kind {
			ScopeKind::User => ScopeGroup::User,
			ScopeKind::Role | ScopeKind::Perm => ScopeGroup::RolePerm,
			ScopeKind::Org => ScopeGroup::Org,
			ScopeKind::Tenant => ScopeGroup::Tenant,
			ScopeKind::System => ScopeGroup::System,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ScopeGroup::User => "user",
			ScopeGroup::RolePerm => "role_perm",
			ScopeGroup::Org => "org",
			ScopeGroup::Tenant => "tenant",
			ScopeGroup::System => "system",
		}
	}

	pub fn contains(&self, kind: ScopeKind) -> bool {
		Self::of(kind) == *self
	}
}

impl fmt::Display for ScopeGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

const DEFAULT_GROUP_ORDER: [ScopeGroup; 5] = [
	ScopeGroup::User,
	ScopeGroup::RolePerm,
	ScopeGroup::Org,
	ScopeGroup::Tenant,
	ScopeGroup::System,
];

/// Collapse a scope order into groups, keeping the first occurrence of each
pub fn group_order_for(scope_order: &[ScopeKind]) -> Vec<ScopeGroup> {
	let mut order = Vec::with_capacity(DEFAULT_GROUP_ORDER.len());
	for kind in scope_order {
		let group = ScopeGroup::of(*kind);
		if !order.contains(&group) {
			order.push(group);
		}
	}
	if order.is_empty() {
		return DEFAULT_GROUP_ORDER.to_vec();
	}
	order
}

/// Matches of `group` in chain order. Matches for scopes outside the chain are
/// ignored; a later duplicate record for the same scope replaces an earlier one.
fn collect_group_matches<'a>(
	group: ScopeGroup,
	chain: &ScopeChain,
	by_scope: &HashMap<&ScopeRef, &'a OverrideMatch>,
) -> Vec<&'a OverrideMatch> {
	chain
		.iter()
		.filter(|scope| group.contains(scope.kind))
		.filter_map(|scope| by_scope.get(scope).copied())
		.collect()
}

/// First match carrying a concrete value
fn first_with_value<'a>(matches: &[&'a OverrideMatch]) -> Option<(&'a ScopeRef, Override)> {
	matches.iter().find(|m| m.state.has_value()).map(|m| (&m.scope, m.state))
}

fn first_in_state<'a>(matches: &[&'a OverrideMatch], state: Override) -> Option<&'a ScopeRef> {
	matches.iter().find(|m| m.state == state).map(|m| &m.scope)
}

/// Shared group walk; `role_perm` picks the decision for the role/permission group
fn resolve_groups<F>(
	chain: &ScopeChain,
	matches: &[OverrideMatch],
	opts: &ResolveOptions<'_>,
	role_perm: F,
) -> OverrideDecision
where
	F: Fn(&[&OverrideMatch]) -> Option<(ScopeRef, Override)>,
{
	if matches.is_empty() {
		return OverrideDecision::not_matched();
	}
	let by_scope: HashMap<&ScopeRef, &OverrideMatch> = matches.iter().map(|m| (&m.scope, m)).collect();

	for group in group_order_for(opts.scope_order) {
		let group_matches = collect_group_matches(group, chain, &by_scope);
		if group_matches.is_empty() {
			continue;
		}
		let decision = match group {
			ScopeGroup::RolePerm => role_perm(&group_matches),
			_ => first_with_value(&group_matches).map(|(scope, state)| (scope.clone(), state)),
		};
		if let Some((scope, state)) = decision {
			return OverrideDecision::decided(&scope, state, &group_matches);
		}
	}
	OverrideDecision::not_matched()
}

/// Most restrictive wins within roles and permissions: any `disabled` beats
/// every `enabled`. Other groups take the first concrete match in chain order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestrictiveStrategy;

impl ResolveStrategy for RestrictiveStrategy {
	fn name(&self) -> &str {
		"default"
	}

	fn resolve(
		&self,
		_key: &str,
		chain: &ScopeChain,
		matches: &[OverrideMatch],
		opts: &ResolveOptions<'_>,
	) -> FgResult<OverrideDecision> {
		Ok(resolve_groups(chain, matches, opts, |group| {
			first_in_state(group, Override::Disabled)
				.map(|scope| (scope.clone(), Override::Disabled))
				.or_else(|| {
					first_in_state(group, Override::Enabled).map(|scope| (scope.clone(), Override::Enabled))
				})
		}))
	}
}

/// Most permissive wins within roles and permissions: any `enabled` beats
/// every `disabled`. Other groups behave like `RestrictiveStrategy`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveStrategy;

impl ResolveStrategy for PermissiveStrategy {
	fn name(&self) -> &str {
		"most_permissive"
	}

	fn resolve(
		&self,
		_key: &str,
		chain: &ScopeChain,
		matches: &[OverrideMatch],
		opts: &ResolveOptions<'_>,
	) -> FgResult<OverrideDecision> {
		Ok(resolve_groups(chain, matches, opts, |group| {
			first_in_state(group, Override::Enabled)
				.map(|scope| (scope.clone(), Override::Enabled))
				.or_else(|| {
					first_in_state(group, Override::Disabled).map(|scope| (scope.clone(), Override::Disabled))
				})
		}))
	}
}


// vim: ts=4
