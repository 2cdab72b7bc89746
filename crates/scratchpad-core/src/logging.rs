//! Structured logging field name constants for scratchpad.
//!
//! All crates use these names for structured `tracing` fields so that log
//! queries work the same across the store, the service and the transports.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Store failure surfaced to a caller as an internal error |
//! | WARN  | Recoverable issue, fallback applied (e.g. raw markdown served) |
//! | INFO  | Lifecycle events (startup, shutdown), note created/deleted |
//! | DEBUG | Query parameters after clamping, result counts |
//! | TRACE | Per-item iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the HTTP `x-request-id` header.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "mcp", "web", "service", "db"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "pg_store", "memory_store", "markdown"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "insert", "list", "search", "recent", "categories"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Normalized category filter.
pub const CATEGORY: &str = "category";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Effective (clamped) limit used for a query.
pub const LIMIT: &str = "limit";

/// Effective offset used for a query.
pub const OFFSET: &str = "offset";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
