//! Read-only HTML pages and HTMX fragments.
//!
//! Markup is assembled with `format!`. Every piece of user text goes through
//! [`escape_html`]; note bodies are inserted as rendered markdown, which
//! already escapes raw HTML.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use scratchpad_core::defaults::LIST_LIMIT;
use scratchpad_core::markdown::escape_html;
use scratchpad_core::{normalize_category, CategorySummary, Error, ListQuery, Note, NoteService};

use crate::handlers::notes::{ListNotesParams, SearchNotesParams};
use crate::AppState;

// =============================================================================
// ERRORS
// =============================================================================

/// Error rendered as a plain-text page.
#[derive(Debug)]
pub enum WebError {
    /// No page exists at this path.
    PageNotFound,
    Service(Error),
}

impl From<Error> for WebError {
    fn from(err: Error) -> Self {
        WebError::Service(err)
    }
}

impl WebError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        let err = match self {
            WebError::PageNotFound => return (StatusCode::NOT_FOUND, "not found"),
            WebError::Service(err) => err,
        };
        if err.is_client_error() {
            return match err {
                Error::NotFound(_) => (StatusCode::NOT_FOUND, "not found"),
                _ => (StatusCode::BAD_REQUEST, "bad request"),
            };
        }
        error!(subsystem = "api", component = "web", error = %err, "Page failed");
        match err {
            Error::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "service unavailable"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        self.status_and_message().into_response()
    }
}

// =============================================================================
// MARKUP HELPERS
// =============================================================================

fn category_href(name: &str) -> String {
    format!("/category/{}", urlencoding::encode(name))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Scratchpad</title>
<script src="https://unpkg.com/htmx.org@1.9.12"></script>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 52rem; margin: 0 auto; padding: 1rem; }}
nav a {{ margin-right: 1rem; }}
.note {{ border: 1px solid #ddd; border-radius: 6px; padding: 0.75rem 1rem; margin: 0.75rem 0; }}
.note-meta {{ color: #666; font-size: 0.85rem; }}
.categories td {{ padding: 0.25rem 1rem 0.25rem 0; }}
.empty {{ color: #888; }}
</style>
</head>
<body>
<nav><a href="/">Categories</a><a href="/search">Search</a></nav>
{body}
</body>
</html>"#,
        title = escape_html(title),
        body = body,
    )
}

fn note_card(note: &Note, service: &NoteService) -> String {
    format!(
        r#"<article class="note" id="note-{id}">
<div class="note-meta"><a href="{href}">{category}</a> · <time datetime="{iso}">{created}</time></div>
<div class="note-body">{body}</div>
</article>"#,
        id = note.id,
        href = category_href(&note.category),
        category = escape_html(&note.category),
        iso = note.created_at.to_rfc3339(),
        created = note.created_at.format("%Y-%m-%d %H:%M UTC"),
        body = service.render_markdown(&note.content),
    )
}

fn note_card_list(notes: &[Note], service: &NoteService) -> String {
    if notes.is_empty() {
        return r#"<p class="empty">No notes found.</p>"#.to_string();
    }
    notes
        .iter()
        .map(|note| note_card(note, service))
        .collect::<Vec<_>>()
        .join("\n")
}

fn category_rows(categories: &[CategorySummary]) -> String {
    categories
        .iter()
        .map(|c| {
            format!(
                r#"<tr><td><a href="{href}">{name}</a></td><td>{count}</td><td>{last}</td></tr>"#,
                href = category_href(&c.name),
                name = escape_html(&c.name),
                count = c.count,
                last = c.last_note.format("%Y-%m-%d %H:%M UTC"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn category_options(categories: &[CategorySummary], selected: Option<&str>) -> String {
    let mut options = String::from(r#"<option value="">All categories</option>"#);
    for c in categories {
        let is_selected = selected == Some(c.name.as_str());
        options.push_str(&format!(
            r#"<option value="{name}"{sel}>{name}</option>"#,
            name = escape_html(&c.name),
            sel = if is_selected { " selected" } else { "" },
        ));
    }
    options
}

fn search_results(notes: &[Note], query: &str, service: &NoteService) -> String {
    let heading = if query.trim().is_empty() {
        format!("{} notes", notes.len())
    } else {
        format!(
            "{} results for &ldquo;{}&rdquo;",
            notes.len(),
            escape_html(query.trim())
        )
    };
    format!(
        "<h2>{}</h2>\n{}",
        heading,
        note_card_list(notes, service)
    )
}

// =============================================================================
// PAGES
// =============================================================================

/// GET / - category overview.
pub async fn home_page(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let categories = state.service.list_categories().await?;
    let total = state.service.count(None).await?;

    let body = if categories.is_empty() {
        r#"<h1>Scratchpad</h1><p class="empty">No notes yet.</p>"#.to_string()
    } else {
        format!(
            r#"<h1>Scratchpad</h1>
<p>{total} notes in {n} categories</p>
<table class="categories">
<thead><tr><th>Category</th><th>Notes</th><th>Last note</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>"#,
            total = total,
            n = categories.len(),
            rows = category_rows(&categories),
        )
    };

    Ok(Html(layout("Categories", &body)))
}

/// GET /category/:name - newest notes of one category.
pub async fn category_page(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, WebError> {
    let category = normalize_category(&name);
    if category.is_empty() {
        return Err(WebError::PageNotFound);
    }
    let notes = state
        .service
        .list(ListQuery::new().category(category.clone()).limit(LIST_LIMIT))
        .await?;
    let total = state.service.count(Some(&category)).await?;

    let more = if total > notes.len() as i64 {
        format!(
            r#"<button hx-get="/fragments/notes?category={cat}&offset={offset}" hx-target="this" hx-swap="outerHTML">Load more</button>"#,
            cat = urlencoding::encode(&category),
            offset = notes.len(),
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"<h1>{name}</h1>
<p>{total} notes</p>
<div id="notes">
{cards}
</div>
{more}"#,
        name = escape_html(&category),
        total = total,
        cards = note_card_list(&notes, &state.service),
        more = more,
    );

    Ok(Html(layout(&category, &body)))
}

/// GET /search - search form, with results when `q` is present.
pub async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchNotesParams>,
) -> Result<Html<String>, WebError> {
    let categories = state.service.list_categories().await?;
    let selected = params.category.as_deref().map(normalize_category);
    let q = params.q.clone().unwrap_or_default();

    let results = if q.trim().is_empty() {
        String::new()
    } else {
        let notes = state.service.search(params.to_query()).await?;
        search_results(&notes, &q, &state.service)
    };

    let body = format!(
        r##"<h1>Search</h1>
<form action="/search" method="get" hx-get="/fragments/search" hx-target="#results" hx-push-url="true">
<input type="search" name="q" value="{q}" placeholder="Search notes" autofocus>
<select name="category">{options}</select>
<label>Since <input type="date" name="since" value="{since}"></label>
<label>Until <input type="date" name="until" value="{until}"></label>
<button type="submit">Search</button>
</form>
<div id="results">
{results}
</div>"##,
        q = escape_html(&q),
        options = category_options(&categories, selected.as_deref()),
        since = escape_html(params.since.as_deref().unwrap_or("")),
        until = escape_html(params.until.as_deref().unwrap_or("")),
        results = results,
    );

    Ok(Html(layout("Search", &body)))
}

// =============================================================================
// FRAGMENTS
// =============================================================================

/// GET /fragments/notes - note card list.
pub async fn notes_fragment(
    State(state): State<AppState>,
    Query(params): Query<ListNotesParams>,
) -> Result<Html<String>, WebError> {
    let notes = state.service.list(params.to_query()).await?;
    Ok(Html(note_card_list(&notes, &state.service)))
}

/// GET /fragments/search - search results.
pub async fn search_fragment(
    State(state): State<AppState>,
    Query(params): Query<SearchNotesParams>,
) -> Result<Html<String>, WebError> {
    let notes = state.service.search(params.to_query()).await?;
    let q = params.q.as_deref().unwrap_or("");
    Ok(Html(search_results(&notes, q, &state.service)))
}
