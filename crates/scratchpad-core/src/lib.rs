//! # scratchpad-core
//!
//! Core types, traits, and the query service for the scratchpad note store.
//!
//! This crate provides the note entity and its normalization rules, the typed
//! and bounded query descriptors, the [`NoteStore`] trait that storage
//! backends implement, and [`NoteService`], the orchestration layer every
//! transport adapter talks to.

pub mod category;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod markdown;
pub mod models;
pub mod query;
pub mod service;
pub mod traits;

// Re-export commonly used types at crate root
pub use category::normalize_category;
pub use error::{Error, Result};
pub use markdown::render_markdown;
pub use models::*;
pub use query::{ListQuery, RecentQuery, SearchQuery};
pub use service::NoteService;
pub use traits::NoteStore;

/// Generate a new UUIDv7 identifier.
///
/// UUIDv7 embeds a millisecond timestamp in its leading bits, so ids
/// generated later sort after ids generated earlier.
#[inline]
pub fn new_v7() -> uuid::Uuid {
    uuid::Uuid::now_v7()
}
