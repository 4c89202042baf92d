pub use featuregate_core::prelude::*;

pub use crate::{
	FeatureGate, Gate, GateBuilder, GateConfig, MutableFeatureGate, StaticDefaults,
	TraceableFeatureGate,
};
pub use featuregate_types::trace::{ClaimsFailureMode, ResolveSource, ResolveTrace};
pub use featuregate_types::{Override, OverrideMatch};

// vim: ts=4
