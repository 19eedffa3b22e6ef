//! Diagnostic logging hooks.
//!
//! Connections report diagnostics (abandoned calls, failed close handshakes, dial
//! failures) through an injected [`Logger`]. Nothing is logged globally; the default
//! is [`NopLogger`].

use std::fmt;

/// Sink for diagnostic messages. Correct behavior never depends on it.
pub trait Logger: Send + Sync {
    fn warn(&self, args: fmt::Arguments<'_>);

    fn error(&self, args: fmt::Arguments<'_>);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn warn(&self, _args: fmt::Arguments<'_>) {}

    fn error(&self, _args: fmt::Arguments<'_>) {}
}

/// Writes prefixed lines to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdLogger;

#[expect(
    clippy::print_stdout,
    reason = "StdLogger exists to write diagnostics to standard output"
)]
impl Logger for StdLogger {
    fn warn(&self, args: fmt::Arguments<'_>) {
        println!("[WARN] {args}");
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        println!("[ERROR] {args}");
    }
}

/// Forwards to the `tracing` macros at `WARN` and `ERROR` level.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
    fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!("{args}");
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!("{args}");
    }
}
