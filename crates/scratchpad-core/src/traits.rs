//! Core traits for scratchpad abstractions.
//!
//! [`NoteStore`] is the seam between the query service and a persistence
//! backend. Implementations own sorting and tie-break policy; they rely on
//! the query descriptors for limit/offset bounds.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CategorySummary, NewNote, Note};
use crate::query::{ListQuery, RecentQuery, SearchQuery};

/// Persistence operations for notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a note, assigning its id and both timestamps.
    async fn insert(&self, note: NewNote) -> Result<Note>;

    /// Fetch a note by id. Fails with `NotFound` when absent.
    async fn find_by_id(&self, id: Uuid) -> Result<Note>;

    /// Notes newest first, optionally restricted to one (normalized) category.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Note>>;

    /// Filtered search. With a text query, results are ordered by relevance
    /// then `created_at` descending; without one, by `created_at` descending.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Note>>;

    /// Newest notes across all categories.
    async fn recent(&self, query: &RecentQuery) -> Result<Vec<Note>>;

    /// Remove a note permanently. Fails with `NotFound` when nothing matched.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Per-category counts and last activity, most recently active first.
    async fn list_categories(&self) -> Result<Vec<CategorySummary>>;

    /// Total notes, optionally restricted to one category.
    async fn count(&self, category: Option<&str>) -> Result<i64>;
}
