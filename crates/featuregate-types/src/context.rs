//! Per-request context passed to every resolution and mutation
//!
//! The host fills it with whatever its collaborators need (actor claims,
//! authentication data, request ids). Values are keyed by type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::actor::ActorClaims;

#[derive(Default)]
pub struct FeatureCtx {
	values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl FeatureCtx {
	pub fn new() -> Self {
		Self::default()
	}

	/// Context carrying the actor's claims for `ContextClaimsProvider`
	pub fn with_claims(claims: ActorClaims) -> Self {
		let mut ctx = Self::new();
		ctx.insert(claims);
		ctx
	}

	pub fn insert<T: Send + Sync + 'static>(&mut self, val: T) -> &mut Self {
		self.values.insert(TypeId::of::<T>(), Box::new(val));
		self
	}

	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.values.get(&TypeId::of::<T>())?.downcast_ref::<T>()
	}

	pub fn claims(&self) -> Option<&ActorClaims> {
		self.get::<ActorClaims>()
	}
}

impl fmt::Debug for FeatureCtx {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FeatureCtx")
			.field("values", &self.values.len())
			.field("claims", &self.claims())
			.finish()
	}
}


// vim: ts=4
