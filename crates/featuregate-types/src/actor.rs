//! Actor identity: claims that seed scope resolution and the actor reference
//! recorded on mutations.

use serde::{Deserialize, Serialize};

/// Identity and attributes of the requesting actor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActorClaims {
	pub subject_id: Box<str>,
	pub tenant_id: Box<str>,
	pub org_id: Box<str>,
	pub roles: Vec<Box<str>>,
	pub perms: Vec<Box<str>>,
}

impl ActorClaims {
	pub fn new(subject_id: impl Into<Box<str>>) -> Self {
		Self { subject_id: subject_id.into(), ..Self::default() }
	}

	pub fn tenant(mut self, tenant_id: impl Into<Box<str>>) -> Self {
		self.tenant_id = tenant_id.into();
		self
	}

	pub fn org(mut self, org_id: impl Into<Box<str>>) -> Self {
		self.org_id = org_id.into();
		self
	}

	pub fn roles<I, S>(mut self, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		self.roles = roles.into_iter().map(Into::into).collect();
		self
	}

	pub fn perms<I, S>(mut self, perms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		self.perms = perms.into_iter().map(Into::into).collect();
		self
	}

	/// Append permissions from a permission provider
	pub fn merge_perms(&mut self, extra: impl IntoIterator<Item = Box<str>>) {
		self.perms.extend(extra);
	}
}

/// Who performed a mutation. Carried into activity events only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
	pub id: Box<str>,
	#[serde(rename = "type")]
	pub actor_type: Box<str>,
	pub name: Box<str>,
}

impl ActorRef {
	pub fn new(id: impl Into<Box<str>>, actor_type: impl Into<Box<str>>) -> Self {
		Self { id: id.into(), actor_type: actor_type.into(), name: "".into() }
	}

	pub fn named(mut self, name: impl Into<Box<str>>) -> Self {
		self.name = name.into();
		self
	}
}

// vim: ts=4
