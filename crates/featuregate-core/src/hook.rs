//! Tracing-backed resolve and activity hooks

use tracing::Level;

use featuregate_types::hooks::{ActivityHook, ResolveEvent, ResolveHook, UpdateEvent};

use crate::prelude::*;

/// `tracing::event!` needs a constant level
macro_rules! event_at {
	($level:expr, $($arg:tt)+) => {{
		let level: Level = $level;
		if level == Level::ERROR {
			tracing::event!(Level::ERROR, $($arg)+)
		} else if level == Level::WARN {
			tracing::event!(Level::WARN, $($arg)+)
		} else if level == Level::INFO {
			tracing::event!(Level::INFO, $($arg)+)
		} else if level == Level::DEBUG {
			tracing::event!(Level::DEBUG, $($arg)+)
		} else {
			tracing::event!(Level::TRACE, $($arg)+)
		}
	}};
}

/// Emits `featuregate.resolve` and `featuregate.update` events
#[derive(Debug, Clone, Copy)]
pub struct TracingHook {
	pub resolve_level: Level,
	pub update_level: Level,
	/// Level of failed resolutions
	pub error_level: Level,
}

impl Default for TracingHook {
	fn default() -> Self {
		Self { resolve_level: Level::DEBUG, update_level: Level::INFO, error_level: Level::WARN }
	}
}

impl TracingHook {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn resolve_level(mut self, level: Level) -> Self {
		self.resolve_level = level;
		self
	}

	pub fn update_level(mut self, level: Level) -> Self {
		self.update_level = level;
		self
	}

	pub fn error_level(mut self, level: Level) -> Self {
		self.error_level = level;
		self
	}
}

impl ResolveHook for TracingHook {
	fn on_resolve(&self, _ctx: &FeatureCtx, event: &ResolveEvent) {
		match &event.error {
			Some(err) => event_at!(
				self.error_level,
				key = %event.normalized_key,
				chain = %event.chain,
				code = err.code().as_str(),
				error = %err,
				"featuregate.resolve"
			),
			None => event_at!(
				self.resolve_level,
				key = %event.normalized_key,
				value = event.value,
				source = event.source.as_str(),
				cache_hit = event.trace.cache_hit,
				matched = ?event.trace.overrides.matched,
				chain = %event.chain,
				"featuregate.resolve"
			),
		}
	}
}

impl ActivityHook for TracingHook {
	fn on_update(&self, _ctx: &FeatureCtx, event: &UpdateEvent) {
		event_at!(
			self.update_level,
			key = %event.normalized_key,
			scope = %event.scope,
			action = event.action.as_str(),
			value = ?event.value,
			actor_id = %event.actor.id,
			actor_type = %event.actor.actor_type,
			"featuregate.update"
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use featuregate_types::hooks::UpdateAction;
	use featuregate_types::trace::{ResolveSource, ResolveTrace};
	use parking_lot::Mutex;
	use std::io;
	use std::sync::Arc;

	/// Collects formatted log lines
	#[derive(Clone, Default)]
	struct Capture(Arc<Mutex<Vec<u8>>>);

	impl Capture {
		fn lines(&self) -> Vec<String> {
			String::from_utf8_lossy(&self.0.lock()).lines().map(str::to_owned).collect()
		}
	}

	impl io::Write for Capture {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.0.lock().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	fn capture<F: FnOnce()>(f: F) -> Vec<String> {
		let buf = Capture::default();
		let writer = buf.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_writer(move || writer.clone())
			.with_max_level(Level::TRACE)
			.with_ansi(false)
			.finish();
		tracing::subscriber::with_default(subscriber, f);
		buf.lines()
	}

	fn update_event() -> UpdateEvent {
		UpdateEvent {
			key: "legacy.k".into(),
			normalized_key: "k".into(),
			scope: ScopeRef::tenant("acme"),
			actor: ActorRef::new("admin", "user"),
			action: UpdateAction::Set,
			value: Some(true),
		}
	}

	#[test]
	fn test_resolve_event_fields() {
		let hook = TracingHook::new().resolve_level(Level::INFO);
		let mut trace = ResolveTrace::new("k", "k");
		trace.chain = ScopeChain::from(vec![ScopeRef::tenant("acme"), ScopeRef::system()]);
		trace.value = true;
		trace.source = ResolveSource::Override;

		let lines = capture(|| hook.on_resolve(&FeatureCtx::new(), &ResolveEvent::from_trace(&trace, None)));
		assert_eq!(lines.len(), 1);
		let line = &lines[0];
		assert!(line.contains("INFO"), "{line}");
		assert!(line.contains("featuregate.resolve"), "{line}");
		assert!(line.contains("key=k"), "{line}");
		assert!(line.contains("value=true"), "{line}");
		assert!(line.contains("override"), "{line}");
		assert!(line.contains("cache_hit=false"), "{line}");
		assert!(line.contains("tenant:acme"), "{line}");
	}

	#[test]
	fn test_failed_resolve_uses_error_level() {
		let hook = TracingHook::new();
		let trace = ResolveTrace::new("k", "k");
		let err = Error::adapter("down");

		let lines =
			capture(|| hook.on_resolve(&FeatureCtx::new(), &ResolveEvent::from_trace(&trace, Some(&err))));
		assert_eq!(lines.len(), 1);
		let line = &lines[0];
		assert!(line.contains("WARN"), "{line}");
		assert!(line.contains("featuregate.resolve"), "{line}");
		assert!(line.contains("ADAPTER_FAILED"), "{line}");
		assert!(line.contains("down"), "{line}");
	}

	#[test]
	fn test_update_event_fields() {
		let hook = TracingHook::new();
		let lines = capture(|| hook.on_update(&FeatureCtx::new(), &update_event()));
		assert_eq!(lines.len(), 1);
		let line = &lines[0];
		assert!(line.contains("INFO"), "{line}");
		assert!(line.contains("featuregate.update"), "{line}");
		assert!(line.contains("key=k"), "{line}");
		assert!(line.contains("scope=tenant:acme"), "{line}");
		assert!(line.contains("set"), "{line}");
		assert!(line.contains("value=Some(true)"), "{line}");
		assert!(line.contains("actor_id=admin"), "{line}");
	}

	#[test]
	fn test_levels_filter_events() {
		let hook = TracingHook::new().update_level(Level::TRACE);
		let buf = Capture::default();
		let writer = buf.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_writer(move || writer.clone())
			.with_max_level(Level::DEBUG)
			.with_ansi(false)
			.finish();
		tracing::subscriber::with_default(subscriber, || {
			hook.on_update(&FeatureCtx::new(), &update_event());
		});
		assert!(buf.lines().is_empty());
	}
}

// vim: ts=4
