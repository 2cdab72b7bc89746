//! REST handlers for notes and categories.
//!
//! Query values arrive as raw strings and are converted leniently (see
//! [`crate::query_types`]); the service applies the limit bounds.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use scratchpad_core::defaults::{LIST_LIMIT, PAGE_OFFSET, RECENT_LIMIT, SEARCH_LIMIT};
use scratchpad_core::{
    CategorySummary, CreateNoteRequest, ListQuery, Note, RecentQuery, SearchQuery,
};

use crate::query_types::{lenient_date, lenient_int};
use crate::{ApiError, AppState};

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesParams {
    /// Category name; normalized before matching.
    pub category: Option<String>,
    /// Page size (default 50, max 200).
    pub limit: Option<String>,
    /// Notes to skip.
    pub offset: Option<String>,
}

impl ListNotesParams {
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            category: self.category.clone(),
            limit: lenient_int(self.limit.as_deref(), LIST_LIMIT),
            offset: lenient_int(self.offset.as_deref(), PAGE_OFFSET),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchNotesParams {
    /// Search text. Supports quoted phrases and `-term` exclusion.
    pub q: Option<String>,
    pub category: Option<String>,
    /// Inclusive lower bound on creation time (RFC 3339 or YYYY-MM-DD).
    pub since: Option<String>,
    /// Inclusive upper bound on creation time (RFC 3339 or YYYY-MM-DD).
    pub until: Option<String>,
    /// Page size (default 50, max 200).
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchNotesParams {
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            query: self.q.clone(),
            category: self.category.clone(),
            since: lenient_date(self.since.as_deref()),
            until: lenient_date(self.until.as_deref()),
            limit: lenient_int(self.limit.as_deref(), SEARCH_LIMIT),
            offset: lenient_int(self.offset.as_deref(), PAGE_OFFSET),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentNotesParams {
    /// Number of notes (default 20, max 100).
    pub limit: Option<String>,
    /// Inclusive lower bound on creation time.
    pub since: Option<String>,
}

impl RecentNotesParams {
    pub fn to_query(&self) -> RecentQuery {
        RecentQuery {
            limit: lenient_int(self.limit.as_deref(), RECENT_LIMIT),
            since: lenient_date(self.since.as_deref()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountParams {
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: i64,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Create a note.
#[utoipa::path(post, path = "/api/notes", tag = "Notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 400, description = "Empty category or content, or malformed JSON"),
    ))]
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Json(req) = payload
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e.body_text())))?;
    let note = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// List notes newest first.
#[utoipa::path(get, path = "/api/notes", tag = "Notes",
    params(ListNotesParams),
    responses((status = 200, description = "Notes, newest first", body = [Note])))]
pub async fn list_notes(
    State(state): State<AppState>,
    Query(params): Query<ListNotesParams>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.service.list(params.to_query()).await?;
    Ok(Json(notes))
}

/// Full-text search.
#[utoipa::path(get, path = "/api/notes/search", tag = "Notes",
    params(SearchNotesParams),
    responses((status = 200, description = "Matching notes, most relevant first", body = [Note])))]
pub async fn search_notes(
    State(state): State<AppState>,
    Query(params): Query<SearchNotesParams>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.service.search(params.to_query()).await?;
    Ok(Json(notes))
}

/// Newest notes across all categories.
#[utoipa::path(get, path = "/api/notes/recent", tag = "Notes",
    params(RecentNotesParams),
    responses((status = 200, description = "Recent notes", body = [Note])))]
pub async fn recent_notes(
    State(state): State<AppState>,
    Query(params): Query<RecentNotesParams>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.service.recent(params.to_query()).await?;
    Ok(Json(notes))
}

/// Count notes, optionally within a category.
#[utoipa::path(get, path = "/api/notes/count", tag = "Notes",
    params(CountParams),
    responses((status = 200, description = "Note count", body = CountResponse)))]
pub async fn count_notes(
    State(state): State<AppState>,
    Query(params): Query<CountParams>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state.service.count(params.category.as_deref()).await?;
    Ok(Json(CountResponse { count }))
}

/// Fetch one note.
#[utoipa::path(get, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note ID")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "No such note"),
    ))]
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let note = state.service.get(&id).await?;
    Ok(Json(note))
}

/// Delete one note.
#[utoipa::path(delete, path = "/api/notes/{id}", tag = "Notes",
    params(("id" = String, Path, description = "Note ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "No such note"),
    ))]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Category summaries, most recently active first.
#[utoipa::path(get, path = "/api/categories", tag = "Categories",
    responses((status = 200, description = "Category summaries", body = [CategorySummary])))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    let categories = state.service.list_categories().await?;
    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_lenient() {
        let params = ListNotesParams {
            category: Some("Ideas".into()),
            limit: Some("ten".into()),
            offset: Some("-4".into()),
        };
        let q = params.to_query();
        assert_eq!(q.effective_limit(), 50);
        assert_eq!(q.effective_offset(), 0);
        assert_eq!(q.category.as_deref(), Some("Ideas"));
    }

    #[test]
    fn test_search_params_ignore_bad_dates() {
        let params = SearchNotesParams {
            q: Some("rust".into()),
            since: Some("yesterday-ish".into()),
            until: Some("2026-03-01".into()),
            limit: Some("500".into()),
            ..Default::default()
        };
        let q = params.to_query();
        assert!(q.since.is_none());
        assert!(q.until.is_some());
        assert_eq!(q.effective_limit(), 200);
    }

    #[test]
    fn test_recent_params_default() {
        let q = RecentNotesParams::default().to_query();
        assert_eq!(q.effective_limit(), 20);
        assert!(q.since.is_none());
    }
}
