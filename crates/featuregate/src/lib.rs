//! Featuregate resolves "is this feature enabled for this actor" by layering
//! runtime overrides, static defaults and a hard-coded `false` fallback.
//!
//! # Features
//!
//! - Scoped overrides
//!     - user, role, permission, org, tenant and system scopes
//!     - tenant/org-qualified role and permission scopes
//!     - most-restrictive-wins (or most-permissive-wins) role tie-break
//! - Static defaults from JSON or a registered feature catalog
//! - Legacy key aliases for reads and writes
//! - Result cache invalidated on every override write
//! - Resolution traces and resolve/activity hooks
//! - Fail-open or fail-closed claims handling, strict or permissive stores

#![forbid(unsafe_code)]

// Re-export shared types and collaborator traits from featuregate-types
pub use featuregate_types::actor;
pub use featuregate_types::claims;
pub use featuregate_types::context;
pub use featuregate_types::error;
pub use featuregate_types::hooks;
pub use featuregate_types::override_adapter;
pub use featuregate_types::overrides;
pub use featuregate_types::scope;
pub use featuregate_types::trace;

pub use featuregate_types::cache::{CacheEntry, NoopCache, ResolveCache};
pub use featuregate_types::defaults::{DefaultResult, Defaults, NoopDefaults};
pub use featuregate_types::gate::{FeatureGate, MutableFeatureGate, TraceableFeatureGate};

// Engine re-exports
pub use featuregate_core::cache;
pub use featuregate_core::catalog;
pub use featuregate_core::chain;
pub use featuregate_core::config;
pub use featuregate_core::defaults;
pub use featuregate_core::gate;
pub use featuregate_core::guard;
pub use featuregate_core::hook;
pub use featuregate_core::keys;
pub use featuregate_core::strategy;

pub use featuregate_core::{
	FeatureCatalog, FeatureDefinition, FeatureRegistry, Gate, GateBuilder, GateConfig, GuardError,
	KeyAliases, LruResolveCache, PermissiveStrategy, RequireOpts, RestrictiveStrategy, StaticDefaults,
	TracingHook, require,
};

// Local modules
pub mod logging;
pub mod prelude;

// vim: ts=4
