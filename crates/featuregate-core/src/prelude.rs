pub use featuregate_types::error::{Error, ErrorCode, ErrorKind, ErrorMeta, FgResult};
pub use featuregate_types::{ActorClaims, ActorRef, FeatureCtx, ScopeChain, ScopeKind, ScopeRef};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
