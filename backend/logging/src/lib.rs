//! Structured logging for Atelier.
//!
//! Console + rolling NDJSON file output, secret redaction, and the
//! per-turn route-trace event logger.

pub mod logger;
pub mod redact;
pub mod trace_log;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
pub use trace_log::RouteTraceLogger;
