//! Shared types, collaborator traits, and core utilities for featuregate.
//!
//! This crate holds the value types of the resolution engine (scopes, claims,
//! overrides, traces), its error type, and the traits every external
//! collaborator implements: override stores, defaults, claims and permission
//! providers, caches, and hooks. Adapter crates depend on this crate only.

#![forbid(unsafe_code)]

pub mod actor;
pub mod cache;
pub mod claims;
pub mod context;
pub mod defaults;
pub mod error;
pub mod gate;
pub mod hooks;
pub mod override_adapter;
pub mod overrides;
pub mod prelude;
pub mod scope;
pub mod trace;

pub use actor::{ActorClaims, ActorRef};
pub use context::FeatureCtx;
pub use overrides::{Override, OverrideMatch};
pub use scope::{ScopeChain, ScopeKind, ScopeRef};

// vim: ts=4
