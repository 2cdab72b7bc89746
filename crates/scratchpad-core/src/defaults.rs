//! Centralized default constants for scratchpad.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers, so the REST handlers, the MCP tools and the store agree on the
//! same pagination bounds.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for category listings.
pub const LIST_LIMIT: i64 = 50;

/// Maximum page size for category listings.
pub const LIST_LIMIT_MAX: i64 = 200;

/// Default page size for search.
pub const SEARCH_LIMIT: i64 = 50;

/// Maximum page size for search.
pub const SEARCH_LIMIT_MAX: i64 = 200;

/// Default size of the cross-category "recent" feed.
pub const RECENT_LIMIT: i64 = 20;

/// Maximum size of the cross-category "recent" feed.
pub const RECENT_LIMIT_MAX: i64 = 100;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// STORE
// =============================================================================

/// Deadline for a single store round trip, in seconds.
pub const STORE_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 7521;

/// Default bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default database URL.
pub const DATABASE_URL: &str = "postgres://localhost/scratchpad";

/// Grace period for in-flight requests on shutdown, in seconds.
pub const SHUTDOWN_GRACE_SECS: u64 = 10;

/// Maximum request body size in bytes (notes are short).
pub const MAX_BODY_SIZE_BYTES: usize = 1024 * 1024;
