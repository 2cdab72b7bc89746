//! Core data models for scratchpad.
//!
//! These types are shared by the store implementations, the query service
//! and every transport adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A persisted note.
///
/// Notes are immutable once created: `updated_at` always equals `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    /// Normalized category label.
    pub category: String,
    /// Markdown source.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for creating a new note, as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content: String,
}

impl CreateNoteRequest {
    pub fn new(category: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            content: content.into(),
        }
    }
}

/// A validated note ready to be persisted.
///
/// Only the query service builds these; the store assigns the id and both
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub category: String,
    pub content: String,
}

// =============================================================================
// CATEGORY TYPES
// =============================================================================

/// Aggregated view of one category, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    /// Number of notes in the category.
    pub count: i64,
    /// Creation time of the newest note in the category.
    pub last_note: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_note_serializes_camel_case() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap();
        let note = Note {
            id: Uuid::nil(),
            category: "content-ideas".to_string(),
            content: "# Hello".to_string(),
            created_at: ts,
            updated_at: ts,
        };

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["category"], "content-ideas");
        assert_eq!(json["createdAt"], "2026-01-15T10:30:00Z");
        assert_eq!(json["updatedAt"], "2026-01-15T10:30:00Z");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_category_summary_serializes_last_note() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let summary = CategorySummary {
            name: "a".to_string(),
            count: 3,
            last_note: ts,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["name"], "a");
        assert_eq!(json["count"], 3);
        assert_eq!(json["lastNote"], "2026-02-01T00:00:00Z");
    }

    #[test]
    fn test_create_request_missing_fields_default_to_empty() {
        let req: CreateNoteRequest = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert_eq!(req.category, "");
        assert_eq!(req.content, "x");
    }
}
