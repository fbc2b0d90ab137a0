//! Port for structured exchange logging.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the machine-readable
//! record of an exchange (model round trips, tool calls, outcomes).

use serde_json::Value;

/// A structured exchange event for logging.
pub struct ExchangeEvent {
    /// Event type identifier (e.g., "model_response", "tool_dispatch").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ExchangeEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging exchange events to a structured log.
///
/// The `log` method is intentionally synchronous and non-fallible so logging
/// never disrupts the orchestration loop; implementations drop events they
/// cannot write.
pub trait ExchangeLogger: Send + Sync {
    fn log(&self, event: ExchangeEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoExchangeLogger;

impl ExchangeLogger for NoExchangeLogger {
    fn log(&self, _event: ExchangeEvent) {}
}
