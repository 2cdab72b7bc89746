//! MCP tool handlers.
//!
//! Each tool reads its arguments from the JSON object sent by the client,
//! calls the [`NoteService`] and returns a JSON value that the server
//! renders as pretty-printed text.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::debug;

use scratchpad_core::defaults::{LIST_LIMIT, PAGE_OFFSET, RECENT_LIMIT, SEARCH_LIMIT};
use scratchpad_core::{CreateNoteRequest, ListQuery, NoteService, RecentQuery, SearchQuery};

use crate::query_types::parse_date;

/// Dispatches `tools/call` requests to the note service.
#[derive(Clone)]
pub struct ToolHandler {
    service: Arc<NoteService>,
}

impl ToolHandler {
    pub fn new(service: Arc<NoteService>) -> Self {
        Self { service }
    }

    /// Run the named tool.
    pub async fn handle(&self, name: &str, args: Option<Value>) -> Result<Value> {
        let args = args.unwrap_or_else(|| json!({}));
        debug!(subsystem = "mcp", tool = name, "Tool call");

        match name {
            "list_categories" => self.list_categories().await,
            "get_notes" => self.get_notes(&args).await,
            "search_notes" => self.search_notes(&args).await,
            "get_recent_notes" => self.get_recent_notes(&args).await,
            "get_note" => self.get_note(&args).await,
            "create_note" => self.create_note(&args).await,
            _ => Err(anyhow!("unknown tool: {}", name)),
        }
    }

    async fn list_categories(&self) -> Result<Value> {
        let categories = self
            .service
            .list_categories()
            .await
            .context("failed to list categories")?;
        Ok(serde_json::to_value(categories)?)
    }

    async fn get_notes(&self, args: &Value) -> Result<Value> {
        let category = required_str(args, "category")?;
        let query = ListQuery {
            category: Some(category.to_string()),
            limit: int_arg(args, "limit").unwrap_or(LIST_LIMIT),
            offset: int_arg(args, "offset").unwrap_or(PAGE_OFFSET),
        };

        let notes = self
            .service
            .list(query)
            .await
            .context("failed to get notes")?;
        Ok(serde_json::to_value(notes)?)
    }

    async fn search_notes(&self, args: &Value) -> Result<Value> {
        let text = required_str(args, "query")?;
        let query = SearchQuery {
            query: Some(text.to_string()),
            category: optional_str(args, "category").map(str::to_string),
            since: date_arg(args, "since")?,
            until: date_arg(args, "until")?,
            limit: int_arg(args, "limit").unwrap_or(SEARCH_LIMIT),
            offset: int_arg(args, "offset").unwrap_or(PAGE_OFFSET),
        };

        let notes = self
            .service
            .search(query)
            .await
            .context("failed to search notes")?;
        Ok(serde_json::to_value(notes)?)
    }

    async fn get_recent_notes(&self, args: &Value) -> Result<Value> {
        let query = RecentQuery {
            limit: int_arg(args, "limit").unwrap_or(RECENT_LIMIT),
            since: date_arg(args, "since")?,
        };

        let notes = self
            .service
            .recent(query)
            .await
            .context("failed to get recent notes")?;
        Ok(serde_json::to_value(notes)?)
    }

    async fn get_note(&self, args: &Value) -> Result<Value> {
        let id = required_str(args, "id")?;
        let note = self.service.get(id).await.context("failed to get note")?;
        Ok(serde_json::to_value(note)?)
    }

    async fn create_note(&self, args: &Value) -> Result<Value> {
        let category = optional_str(args, "category").unwrap_or_default();
        let content = args
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let note = self
            .service
            .create(CreateNoteRequest::new(category, content))
            .await
            .context("failed to create note")?;
        Ok(serde_json::to_value(note)?)
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    optional_str(args, key).ok_or_else(|| anyhow!("{} is required", key))
}

/// Integer argument. Clients sometimes send numbers as strings or floats.
fn int_arg(args: &Value, key: &str) -> Option<i64> {
    let v = args.get(key)?;
    v.as_i64()
        .or_else(|| v.as_f64().map(|f| f as i64))
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn date_arg(args: &Value, key: &str) -> Result<Option<DateTime<Utc>>> {
    match optional_str(args, key) {
        None => Ok(None),
        Some(raw) => match parse_date(raw) {
            Ok(dt) => Ok(Some(dt)),
            Err(e) => bail!("invalid '{}' date format: {}", key, e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scratchpad_db::MemoryNoteStore;

    fn handler() -> ToolHandler {
        let store = Arc::new(MemoryNoteStore::new());
        ToolHandler::new(Arc::new(NoteService::new(store)))
    }

    #[test]
    fn test_int_arg_accepts_strings_and_floats() {
        let args = json!({"a": 5, "b": "7", "c": 3.9, "d": "x"});
        assert_eq!(int_arg(&args, "a"), Some(5));
        assert_eq!(int_arg(&args, "b"), Some(7));
        assert_eq!(int_arg(&args, "c"), Some(3));
        assert_eq!(int_arg(&args, "d"), None);
        assert_eq!(int_arg(&args, "missing"), None);
    }

    #[test]
    fn test_date_arg_rejects_garbage() {
        let err = date_arg(&json!({"since": "last week"}), "since").unwrap_err();
        assert!(err.to_string().starts_with("invalid 'since' date format"));
        assert!(date_arg(&json!({"since": ""}), "since").unwrap().is_none());
        assert!(date_arg(&json!({"since": "2026-01-15"}), "since")
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let h = handler();
        let created = h
            .handle(
                "create_note",
                Some(json!({"category": "Content Ideas", "content": "thread on borrowck"})),
            )
            .await
            .unwrap();
        assert_eq!(created["category"], "content-ideas");

        let id = created["id"].as_str().unwrap().to_string();
        let fetched = h.handle("get_note", Some(json!({"id": id}))).await.unwrap();
        assert_eq!(fetched["content"], "thread on borrowck");
    }

    #[tokio::test]
    async fn test_get_notes_requires_category() {
        let err = h_err(handler().handle("get_notes", None).await);
        assert_eq!(err, "category is required");
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let err = h_err(
            handler()
                .handle("search_notes", Some(json!({"query": "   "})))
                .await,
        );
        assert_eq!(err, "query is required");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = h_err(handler().handle("drop_tables", None).await);
        assert!(err.contains("unknown tool"));
    }

    #[tokio::test]
    async fn test_get_note_bad_id_includes_context() {
        let err = h_err(
            handler()
                .handle("get_note", Some(json!({"id": "not-a-uuid"})))
                .await,
        );
        assert!(err.starts_with("failed to get note"));
    }

    fn h_err(result: Result<Value>) -> String {
        format!("{:#}", result.unwrap_err())
    }
}
