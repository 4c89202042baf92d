//! Resolution engine for featuregate.
//!
//! Builds scope chains from actor claims, matches stored overrides through a
//! pluggable strategy, falls back to configured defaults and caches results.
//! The `Gate` orchestrates these steps and exposes the Set/Unset mutation
//! path.

#![forbid(unsafe_code)]

pub mod cache;
pub mod catalog;
pub mod chain;
pub mod config;
pub mod defaults;
pub mod gate;
pub mod guard;
pub mod hook;
pub mod keys;
pub mod prelude;
pub mod strategy;

pub use cache::LruResolveCache;
pub use catalog::{FeatureCatalog, FeatureDefinition, FeatureRegistry};
pub use chain::{build_chain, ChainBuilder, IdentifierNormalizer, DEFAULT_SCOPE_ORDER};
pub use config::GateConfig;
pub use defaults::StaticDefaults;
pub use gate::{Gate, GateBuilder};
pub use guard::{require, GuardError, RequireOpts};
pub use hook::TracingHook;
pub use keys::KeyAliases;
pub use strategy::{PermissiveStrategy, ResolveStrategy, RestrictiveStrategy};

// vim: ts=4
