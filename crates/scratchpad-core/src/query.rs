//! Typed, bounded query descriptors.
//!
//! Callers fill these in from whatever the transport hands them; the limit
//! and offset bounds are enforced here and nowhere else. Store
//! implementations must read `effective_limit()` / `effective_offset()`
//! rather than the raw fields.

use chrono::{DateTime, Utc};

use crate::defaults::{
    LIST_LIMIT, LIST_LIMIT_MAX, RECENT_LIMIT, RECENT_LIMIT_MAX, SEARCH_LIMIT, SEARCH_LIMIT_MAX,
};

/// Substitute `default` for non-positive limits and cap at `max`.
pub fn clamp_limit(limit: i64, default: i64, max: i64) -> i64 {
    if limit <= 0 {
        default
    } else {
        limit.min(max)
    }
}

/// Negative offsets skip nothing.
pub fn clamp_offset(offset: i64) -> i64 {
    offset.max(0)
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Notes newest first, optionally restricted to one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub category: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn category_filter(&self) -> Option<&str> {
        non_blank(&self.category)
    }

    pub fn effective_limit(&self) -> i64 {
        clamp_limit(self.limit, LIST_LIMIT, LIST_LIMIT_MAX)
    }

    pub fn effective_offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Full-text search with optional category and inclusive date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Text matched against note content.
    pub query: Option<String>,
    pub category: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub until: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// The text predicate, if any. Blank text means "no text query", which
    /// also switches ordering from relevance to recency.
    pub fn text_query(&self) -> Option<&str> {
        non_blank(&self.query)
    }

    pub fn category_filter(&self) -> Option<&str> {
        non_blank(&self.category)
    }

    pub fn effective_limit(&self) -> i64 {
        clamp_limit(self.limit, SEARCH_LIMIT, SEARCH_LIMIT_MAX)
    }

    pub fn effective_offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Cross-category feed of the newest notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentQuery {
    pub limit: i64,
    /// Inclusive lower bound on `created_at`.
    pub since: Option<DateTime<Utc>>,
}

impl RecentQuery {
    pub fn new(limit: i64) -> Self {
        Self { limit, since: None }
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn effective_limit(&self) -> i64 {
        clamp_limit(self.limit, RECENT_LIMIT, RECENT_LIMIT_MAX)
    }
}
