//! Warning handlers.
//!
//! The processing algorithms report recoverable spec deviations (keyword
//! like terms, malformed IRIs, deprecated constructs) through a handler
//! instead of failing.

/// Warning handler.
///
/// Implemented by the unit type `()` which ignores warnings. Use
/// [`Print`] or [`Log`] to surface them, or implement your own handler.
pub trait Handler<W> {
	fn handle(&mut self, warning: W);
}

impl<W> Handler<W> for () {
	fn handle(&mut self, _warning: W) {}
}

impl<W, H: Handler<W>> Handler<W> for &mut H {
	fn handle(&mut self, warning: W) {
		H::handle(*self, warning)
	}
}

/// Prints warnings on the standard error output.
pub struct Print;

impl<W: std::fmt::Display> Handler<W> for Print {
	fn handle(&mut self, warning: W) {
		eprintln!("{warning}")
	}
}

/// Reports warnings through the `log` facade at the `warn` level.
pub struct Log;

impl<W: std::fmt::Display> Handler<W> for Log {
	fn handle(&mut self, warning: W) {
		log::warn!("{warning}")
	}
}
