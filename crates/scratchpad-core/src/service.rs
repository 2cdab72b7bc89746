//! Note query service.
//!
//! `NoteService` is the single entry point used by every transport adapter
//! (REST, HTML pages, MCP tools). It normalizes and validates input, turns
//! external string ids into UUIDs before the store is touched, bounds each
//! store round trip with a deadline, and forwards everything else unchanged.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};
use uuid::Uuid;

use crate::category::{normalize_category, normalize_filter};
use crate::defaults::STORE_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::markdown;
use crate::models::{CategorySummary, CreateNoteRequest, NewNote, Note};
use crate::query::{ListQuery, RecentQuery, SearchQuery};
use crate::traits::NoteStore;

/// Parse an external note id.
pub fn parse_note_id(raw: &str) -> Result<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::InvalidIdentifier("note ID required".to_string()));
    }
    Uuid::parse_str(raw).map_err(|e| Error::InvalidIdentifier(format!("{}: {}", raw, e)))
}

/// Validate and normalize a creation request.
pub fn validate_create(req: CreateNoteRequest) -> Result<NewNote> {
    let category = normalize_category(&req.category);
    if category.is_empty() {
        return Err(Error::Validation("category is required".to_string()));
    }
    if req.content.trim().is_empty() {
        return Err(Error::Validation("content is required".to_string()));
    }
    Ok(NewNote {
        category,
        content: req.content,
    })
}

/// Orchestration layer over a [`NoteStore`].
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
    timeout: Duration,
}

impl NoteService {
    /// Create a service with the default store deadline.
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self::with_timeout(store, Duration::from_secs(STORE_TIMEOUT_SECS))
    }

    /// Create a service with a custom store deadline.
    pub fn with_timeout(store: Arc<dyn NoteStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Unavailable(format!(
                "{} timed out after {}ms",
                op,
                self.timeout.as_millis()
            ))),
        }
    }

    /// Create a note from client input.
    pub async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        let new_note = validate_create(req)?;
        let note = self.bounded("insert", self.store.insert(new_note)).await?;
        info!(
            subsystem = "service",
            op = "create",
            note_id = %note.id,
            category = %note.category,
            "Note created"
        );
        Ok(note)
    }

    /// Fetch a note by its external id.
    pub async fn get(&self, id: &str) -> Result<Note> {
        let id = parse_note_id(id)?;
        self.bounded("find_by_id", self.store.find_by_id(id)).await
    }

    /// List notes newest first.
    pub async fn list(&self, mut query: ListQuery) -> Result<Vec<Note>> {
        query.category = normalize_filter(query.category.as_deref());
        let start = Instant::now();
        let notes = self.bounded("list", self.store.list(&query)).await?;
        debug!(
            subsystem = "service",
            op = "list",
            category = query.category.as_deref().unwrap_or(""),
            limit = query.effective_limit(),
            offset = query.effective_offset(),
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(notes)
    }

    /// Full-text search with optional filters.
    pub async fn search(&self, mut query: SearchQuery) -> Result<Vec<Note>> {
        query.category = normalize_filter(query.category.as_deref());
        let start = Instant::now();
        let notes = self.bounded("search", self.store.search(&query)).await?;
        debug!(
            subsystem = "service",
            op = "search",
            query = query.text_query().unwrap_or(""),
            category = query.category.as_deref().unwrap_or(""),
            limit = query.effective_limit(),
            offset = query.effective_offset(),
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Searched notes"
        );
        Ok(notes)
    }

    /// Newest notes across all categories.
    pub async fn recent(&self, query: RecentQuery) -> Result<Vec<Note>> {
        let notes = self.bounded("recent", self.store.recent(&query)).await?;
        debug!(
            subsystem = "service",
            op = "recent",
            limit = query.effective_limit(),
            result_count = notes.len(),
            "Fetched recent notes"
        );
        Ok(notes)
    }

    /// Delete a note by its external id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_note_id(id)?;
        self.bounded("delete", self.store.delete(id)).await?;
        info!(subsystem = "service", op = "delete", note_id = %id, "Note deleted");
        Ok(())
    }

    /// Category summaries, most recently active first.
    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        self.bounded("list_categories", self.store.list_categories())
            .await
    }

    /// Count notes, optionally within one category.
    pub async fn count(&self, category: Option<&str>) -> Result<i64> {
        let category = normalize_filter(category);
        self.bounded("count", self.store.count(category.as_deref()))
            .await
    }

    /// Render note content for display. Never fails.
    pub fn render_markdown(&self, content: &str) -> String {
        markdown::render_markdown(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Records the queries it receives and answers with canned data.
    #[derive(Default)]
    struct RecordingStore {
        inserted: Mutex<Vec<NewNote>>,
        list_queries: Mutex<Vec<ListQuery>>,
        search_queries: Mutex<Vec<SearchQuery>>,
        counted: Mutex<Vec<Option<String>>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl NoteStore for RecordingStore {
        async fn insert(&self, note: NewNote) -> Result<Note> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.inserted.lock().unwrap().push(note.clone());
            let now = Utc::now();
            Ok(Note {
                id: Uuid::now_v7(),
                category: note.category,
                content: note.content,
                created_at: now,
                updated_at: now,
            })
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Note> {
            Err(Error::NotFound(id))
        }

        async fn list(&self, query: &ListQuery) -> Result<Vec<Note>> {
            self.list_queries.lock().unwrap().push(query.clone());
            Ok(Vec::new())
        }

        async fn search(&self, query: &SearchQuery) -> Result<Vec<Note>> {
            self.search_queries.lock().unwrap().push(query.clone());
            Ok(Vec::new())
        }

        async fn recent(&self, _query: &RecentQuery) -> Result<Vec<Note>> {
            Ok(Vec::new())
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            Err(Error::NotFound(id))
        }

        async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
            Ok(Vec::new())
        }

        async fn count(&self, category: Option<&str>) -> Result<i64> {
            self.counted
                .lock()
                .unwrap()
                .push(category.map(str::to_string));
            Ok(0)
        }
    }

    fn service_with(store: Arc<RecordingStore>) -> NoteService {
        NoteService::new(store)
    }

    #[tokio::test]
    async fn test_create_normalizes_category() {
        let store = Arc::new(RecordingStore::default());
        let svc = service_with(store.clone());

        let note = svc
            .create(CreateNoteRequest::new("  Content Ideas ", "thread about rust"))
            .await
            .unwrap();

        assert_eq!(note.category, "content-ideas");
        assert_eq!(store.inserted.lock().unwrap()[0].category, "content-ideas");
    }

    #[tokio::test]
    async fn test_create_keeps_content_verbatim() {
        let store = Arc::new(RecordingStore::default());
        let svc = service_with(store.clone());

        let note = svc
            .create(CreateNoteRequest::new("x", "  indented\n"))
            .await
            .unwrap();
        assert_eq!(note.content, "  indented\n");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_category() {
        let store = Arc::new(RecordingStore::default());
        let svc = service_with(store.clone());

        for category in ["", "   ", "\t"] {
            let err = svc
                .create(CreateNoteRequest::new(category, "content"))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "category {:?}", category);
        }
        assert!(store.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let store = Arc::new(RecordingStore::default());
        let svc = service_with(store.clone());

        for content in ["", "   ", "\n\t  ", "\n\n"] {
            let err = svc
                .create(CreateNoteRequest::new("ideas", content))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "content {:?}", content);
        }
        assert!(store.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_ids_never_reach_store() {
        let svc = service_with(Arc::new(RecordingStore::default()));

        for id in ["", "abc", "65a1f0c2e4b0a1b2c3d4e5f6", "not-a-uuid-at-all-00000000000"] {
            assert!(matches!(
                svc.get(id).await.unwrap_err(),
                Error::InvalidIdentifier(_)
            ));
            assert!(matches!(
                svc.delete(id).await.unwrap_err(),
                Error::InvalidIdentifier(_)
            ));
        }
    }

    #[tokio::test]
    async fn test_well_formed_id_reaches_store() {
        let svc = service_with(Arc::new(RecordingStore::default()));
        let id = Uuid::now_v7();
        match svc.get(&id.to_string()).await.unwrap_err() {
            Error::NotFound(missing) => assert_eq!(missing, id),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_filters_are_normalized_before_store() {
        let store = Arc::new(RecordingStore::default());
        let svc = service_with(store.clone());

        svc.list(ListQuery::new().category("Twitter Analytics"))
            .await
            .unwrap();
        svc.search(SearchQuery::new().text("x").category(" Content Ideas"))
            .await
            .unwrap();
        svc.count(Some("Daily Log")).await.unwrap();
        svc.count(Some("  ")).await.unwrap();

        assert_eq!(
            store.list_queries.lock().unwrap()[0].category.as_deref(),
            Some("twitter-analytics")
        );
        assert_eq!(
            store.search_queries.lock().unwrap()[0].category.as_deref(),
            Some("content-ideas")
        );
        let counted = store.counted.lock().unwrap();
        assert_eq!(counted[0].as_deref(), Some("daily-log"));
        assert_eq!(counted[1], None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_yields_unavailable() {
        let store = Arc::new(RecordingStore {
            delay: Some(Duration::from_secs(60)),
            ..Default::default()
        });
        let svc = NoteService::with_timeout(store, Duration::from_secs(1));

        let err = svc
            .create(CreateNoteRequest::new("a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unavailable(_)));
    }

    #[test]
    fn test_render_markdown_through_service() {
        let svc = service_with(Arc::new(RecordingStore::default()));
        assert!(svc.render_markdown("**bold**").contains("<strong>bold</strong>"));
    }
}
