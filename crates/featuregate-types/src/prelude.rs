pub use crate::error::{Error, ErrorCode, ErrorKind, ErrorMeta, FgResult};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
