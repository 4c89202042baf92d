//! Error type shared by the resolution engine and its collaborators.
//!
//! Errors are plain values: they are cloned into traces, cache entries and
//! hook events, so the optional source is reference counted.

use std::fmt;
use std::sync::Arc;

use crate::scope::{ScopeChain, ScopeRef};

pub type FgResult<T> = std::result::Result<T, Error>;

type Source = Arc<dyn std::error::Error + Send + Sync>;

/// Broad error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Invalid caller input (empty key, incomplete scope)
	BadInput,
	/// Missing collaborator or misconfiguration
	Operation,
	/// A collaborator (store, defaults, claims) failed
	External,
	/// Broken internal invariant
	Internal,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::BadInput => "bad_input",
			ErrorKind::Operation => "operation",
			ErrorKind::External => "external",
			ErrorKind::Internal => "internal",
		}
	}
}

/// Stable machine-readable error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
	FeatureKeyRequired,
	OverrideStoreRequired,
	ScopeRequired,
	ScopeResolveFailed,
	StoreReadFailed,
	StoreWriteFailed,
	DefaultLookupFailed,
	AdapterFailed,
	ConfigInvalid,
	Internal,
}

impl ErrorCode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorCode::FeatureKeyRequired => "FEATURE_KEY_REQUIRED",
			ErrorCode::OverrideStoreRequired => "OVERRIDE_STORE_REQUIRED",
			ErrorCode::ScopeRequired => "SCOPE_REQUIRED",
			ErrorCode::ScopeResolveFailed => "SCOPE_RESOLVE_FAILED",
			ErrorCode::StoreReadFailed => "STORE_READ_FAILED",
			ErrorCode::StoreWriteFailed => "STORE_WRITE_FAILED",
			ErrorCode::DefaultLookupFailed => "DEFAULT_LOOKUP_FAILED",
			ErrorCode::AdapterFailed => "ADAPTER_FAILED",
			ErrorCode::ConfigInvalid => "CONFIG_INVALID",
			ErrorCode::Internal => "INTERNAL",
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			ErrorCode::FeatureKeyRequired | ErrorCode::ScopeRequired => ErrorKind::BadInput,
			ErrorCode::OverrideStoreRequired | ErrorCode::ConfigInvalid => ErrorKind::Operation,
			ErrorCode::ScopeResolveFailed
			| ErrorCode::StoreReadFailed
			| ErrorCode::StoreWriteFailed
			| ErrorCode::DefaultLookupFailed
			| ErrorCode::AdapterFailed => ErrorKind::External,
			ErrorCode::Internal => ErrorKind::Internal,
		}
	}

	fn default_message(&self) -> &'static str {
		match self {
			ErrorCode::FeatureKeyRequired => "feature key required",
			ErrorCode::OverrideStoreRequired => "override store not configured",
			ErrorCode::ScopeRequired => "scope is required",
			ErrorCode::ScopeResolveFailed => "claims resolution failed",
			ErrorCode::StoreReadFailed => "override store read failed",
			ErrorCode::StoreWriteFailed => "override store write failed",
			ErrorCode::DefaultLookupFailed => "default lookup failed",
			ErrorCode::AdapterFailed => "adapter failed",
			ErrorCode::ConfigInvalid => "invalid configuration",
			ErrorCode::Internal => "internal error",
		}
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Structured context attached to an error for observability
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMeta {
	pub feature_key: Option<Box<str>>,
	pub normalized_key: Option<Box<str>>,
	pub scope: Option<ScopeRef>,
	pub chain: Option<ScopeChain>,
	pub store: Option<&'static str>,
	pub operation: Option<&'static str>,
	pub strict: Option<bool>,
}

impl ErrorMeta {
	pub fn for_key(feature_key: &str, normalized_key: &str) -> Self {
		Self {
			feature_key: Some(feature_key.into()),
			normalized_key: Some(normalized_key.into()),
			..Self::default()
		}
	}

	pub fn scope(mut self, scope: &ScopeRef) -> Self {
		self.scope = Some(scope.clone());
		self
	}

	pub fn chain(mut self, chain: &ScopeChain) -> Self {
		self.chain = Some(chain.clone());
		self
	}

	pub fn store(mut self, store: &'static str) -> Self {
		self.store = Some(store);
		self
	}

	pub fn operation(mut self, operation: &'static str) -> Self {
		self.operation = Some(operation);
		self
	}

	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = Some(strict);
		self
	}
}

/// Feature gate error
#[derive(Debug, Clone)]
pub struct Error {
	code: ErrorCode,
	message: Box<str>,
	meta: Box<ErrorMeta>,
	source: Option<Source>,
}

impl Error {
	/// Create an error with the code's default message
	pub fn new(code: ErrorCode) -> Self {
		Self::with_message(code, code.default_message())
	}

	pub fn with_message(code: ErrorCode, message: impl Into<Box<str>>) -> Self {
		Self { code, message: message.into(), meta: Box::default(), source: None }
	}

	/// Collaborator failure; the usual way for adapters to report errors
	pub fn adapter(message: impl Into<Box<str>>) -> Self {
		Self::with_message(ErrorCode::AdapterFailed, message)
	}

	pub fn internal(message: impl Into<Box<str>>) -> Self {
		Self::with_message(ErrorCode::Internal, message)
	}

	/// Wrap a lower level error under a new code, keeping it as the source
	pub fn wrap<E>(source: E, code: ErrorCode) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self { source: Some(Arc::new(source)), ..Self::new(code) }
	}

	pub fn with_meta(mut self, meta: ErrorMeta) -> Self {
		*self.meta = meta;
		self
	}

	pub fn code(&self) -> ErrorCode {
		self.code
	}

	pub fn kind(&self) -> ErrorKind {
		self.code.kind()
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn meta(&self) -> &ErrorMeta {
		&self.meta
	}

	pub fn is(&self, code: ErrorCode) -> bool {
		self.code == code
	}

	/// Innermost error code along the source chain
	pub fn root_code(&self) -> ErrorCode {
		let mut current = self;
		while let Some(inner) = current.source.as_deref().and_then(|s| s.downcast_ref::<Error>()) {
			current = inner;
		}
		current.code
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.message, self.code)?;
		if let Some(key) = &self.meta.normalized_key {
			write!(f, " key={}", key)?;
		}
		if let Some(op) = self.meta.operation {
			write!(f, " op={}", op)?;
		}
		if let Some(source) = &self.source {
			write!(f, ": {}", source)?;
		}
		Ok(())
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source.as_deref().map(|s| s as &(dyn std::error::Error + 'static))
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::wrap(err, ErrorCode::ConfigInvalid)
	}
}


// vim: ts=4
