//! PostgreSQL note store.
//!
//! Full-text matching uses the generated `tsv` column
//! (`to_tsvector('english', content)`) with `websearch_to_tsquery`, which
//! understands quoted phrases, `or` and `-term`. Relevance is `ts_rank`.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use scratchpad_core::{
    new_v7, CategorySummary, Error, ListQuery, NewNote, Note, NoteStore, RecentQuery, Result,
    SearchQuery,
};

const NOTE_COLUMNS: &str = "id, category, content, created_at, updated_at";

/// Map sqlx failures, reporting pool exhaustion as unavailability.
fn db_error(err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::PoolTimedOut => {
            Error::Unavailable("timed out acquiring a database connection".to_string())
        }
        other => Error::Database(other),
    }
}

/// PostgreSQL implementation of [`NoteStore`].
#[derive(Clone)]
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    /// Create a new PgNoteStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

// =============================================================================
// SEARCH QUERY BUILDING
// =============================================================================

/// Positional parameters for a search statement, in bind order.
#[derive(Debug, Default)]
struct SearchParams<'a> {
    text: Option<&'a str>,
    category: Option<&'a str>,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

/// Build the search statement for the filters present in `query`.
///
/// Filters are appended in a fixed order (text, category, since, until) and
/// bound in that same order, followed by LIMIT and OFFSET.
fn build_search_sql(query: &SearchQuery) -> (String, SearchParams<'_>) {
    let mut sql = format!("SELECT {} FROM note WHERE TRUE ", NOTE_COLUMNS);
    let mut params = SearchParams::default();
    let mut param_idx = 1;
    let mut text_idx = None;

    if let Some(text) = query.text_query() {
        sql.push_str(&format!(
            "AND tsv @@ websearch_to_tsquery('english', ${}) ",
            param_idx
        ));
        params.text = Some(text);
        text_idx = Some(param_idx);
        param_idx += 1;
    }
    if let Some(category) = query.category_filter() {
        sql.push_str(&format!("AND category = ${} ", param_idx));
        params.category = Some(category);
        param_idx += 1;
    }
    if let Some(since) = query.since {
        sql.push_str(&format!("AND created_at >= ${} ", param_idx));
        params.since = Some(since);
        param_idx += 1;
    }
    if let Some(until) = query.until {
        sql.push_str(&format!("AND created_at <= ${} ", param_idx));
        params.until = Some(until);
        param_idx += 1;
    }

    match text_idx {
        Some(idx) => sql.push_str(&format!(
            "ORDER BY ts_rank(tsv, websearch_to_tsquery('english', ${})) DESC, created_at DESC, id DESC ",
            idx
        )),
        None => sql.push_str("ORDER BY created_at DESC, id DESC "),
    }

    sql.push_str(&format!("LIMIT ${} OFFSET ${}", param_idx, param_idx + 1));
    (sql, params)
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn insert(&self, note: NewNote) -> Result<Note> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO note (id, category, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {}",
            NOTE_COLUMNS
        );

        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(new_v7())
            .bind(&note.category)
            .bind(&note.content)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        debug!(
            subsystem = "db",
            component = "pg_store",
            op = "insert",
            note_id = %note.id,
            "Inserted note"
        );
        Ok(note)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Note> {
        let sql = format!("SELECT {} FROM note WHERE id = $1", NOTE_COLUMNS);
        sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or(Error::NotFound(id))
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {} FROM note
             WHERE ($1::text IS NULL OR category = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3",
            NOTE_COLUMNS
        );

        sqlx::query_as::<_, Note>(&sql)
            .bind(query.category_filter())
            .bind(query.effective_limit())
            .bind(query.effective_offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Note>> {
        let start = Instant::now();
        let (sql, params) = build_search_sql(query);

        let mut q = sqlx::query_as::<_, Note>(&sql);
        if let Some(text) = params.text {
            q = q.bind(text);
        }
        if let Some(category) = params.category {
            q = q.bind(category);
        }
        if let Some(since) = params.since {
            q = q.bind(since);
        }
        if let Some(until) = params.until {
            q = q.bind(until);
        }
        q = q
            .bind(query.effective_limit())
            .bind(query.effective_offset());

        let notes = q.fetch_all(&self.pool).await.map_err(db_error)?;

        debug!(
            subsystem = "db",
            component = "pg_store",
            op = "search",
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(notes)
    }

    async fn recent(&self, query: &RecentQuery) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {} FROM note
             WHERE ($1::timestamptz IS NULL OR created_at >= $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
            NOTE_COLUMNS
        );

        sqlx::query_as::<_, Note>(&sql)
            .bind(query.since)
            .bind(query.effective_limit())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        sqlx::query_as::<_, CategorySummary>(
            "SELECT category AS name, COUNT(*) AS count, MAX(created_at) AS last_note
             FROM note
             GROUP BY category
             ORDER BY last_note DESC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn count(&self, category: Option<&str>) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM note WHERE ($1::text IS NULL OR category = $1)")
                .bind(category)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(count)
    }
}
