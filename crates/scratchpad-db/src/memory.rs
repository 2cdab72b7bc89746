//! In-process note store.
//!
//! Follows the same filtering, ordering and pagination rules as
//! [`PgNoteStore`](crate::PgNoteStore) so the service and the HTTP layer can
//! be exercised without a database. Text matching is a simplified version of
//! `websearch_to_tsquery`: every bare term must occur as a word, quoted
//! phrases must occur as substrings, and `-term` excludes. There is no
//! stemming.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use scratchpad_core::{
    new_v7, CategorySummary, Error, ListQuery, NewNote, Note, NoteStore, RecentQuery, Result,
    SearchQuery,
};

#[derive(Debug, Clone)]
struct StoredNote {
    note: Note,
    /// Insertion order, breaks ties between identical timestamps.
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    notes: HashMap<Uuid, StoredNote>,
    next_seq: u64,
}

/// Note store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    inner: RwLock<Inner>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a note with an explicit creation time.
    ///
    /// Used to seed fixtures and imports whose timestamps predate the insert.
    pub async fn insert_at(&self, note: NewNote, created_at: DateTime<Utc>) -> Note {
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let note = Note {
            id: new_v7(),
            category: note.category,
            content: note.content,
            created_at,
            updated_at: created_at,
        };
        inner.notes.insert(
            note.id,
            StoredNote {
                note: note.clone(),
                seq,
            },
        );
        note
    }
}

// =============================================================================
// TEXT MATCHING
// =============================================================================

/// Lowercased alphanumeric words of `text`.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// A parsed search string.
#[derive(Debug, Default, PartialEq)]
struct TextQuery {
    terms: Vec<String>,
    phrases: Vec<String>,
    excluded: Vec<String>,
}

impl TextQuery {
    fn parse(raw: &str) -> Self {
        let mut query = TextQuery::default();
        let mut rest = raw;

        while let Some(open) = rest.find('"') {
            query.push_bare(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('"') {
                Some(close) => {
                    let phrase = after[..close].trim().to_lowercase();
                    if !words(&phrase).is_empty() {
                        query.phrases.push(phrase);
                    }
                    rest = &after[close + 1..];
                }
                // Unbalanced quote: treat the remainder as bare words.
                None => {
                    rest = after;
                    break;
                }
            }
        }
        query.push_bare(rest);
        query
    }

    fn push_bare(&mut self, segment: &str) {
        for token in segment.split_whitespace() {
            match token.strip_prefix('-') {
                Some(negated) => self.excluded.extend(words(negated)),
                None => self.terms.extend(words(token)),
            }
        }
    }

    /// True when the input held no searchable word at all.
    fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.phrases.is_empty() && self.excluded.is_empty()
    }

    /// Relevance of `content`, or `None` when it does not match.
    fn score(&self, content: &str) -> Option<f64> {
        let lowered = content.to_lowercase();
        let content_words = words(content);

        if self
            .excluded
            .iter()
            .any(|ex| content_words.iter().any(|w| w == ex))
        {
            return None;
        }

        let mut occurrences = 0usize;
        for term in &self.terms {
            let n = content_words.iter().filter(|w| *w == term).count();
            if n == 0 {
                return None;
            }
            occurrences += n;
        }
        for phrase in &self.phrases {
            let n = lowered.matches(phrase.as_str()).count();
            if n == 0 {
                return None;
            }
            occurrences += n;
        }

        let length = content_words.len().max(1) as f64;
        Some(occurrences as f64 / (1.0 + length.ln()))
    }
}

/// Newest first; insertion order breaks timestamp ties.
fn by_recency(a: &StoredNote, b: &StoredNote) -> Ordering {
    b.note
        .created_at
        .cmp(&a.note.created_at)
        .then_with(|| b.seq.cmp(&a.seq))
}

fn page(notes: Vec<Note>, limit: i64, offset: i64) -> Vec<Note> {
    notes
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(0))
        .collect()
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, note: NewNote) -> Result<Note> {
        let note = self.insert_at(note, Utc::now()).await;
        debug!(
            subsystem = "db",
            component = "memory_store",
            op = "insert",
            note_id = %note.id,
            "Inserted note"
        );
        Ok(note)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Note> {
        let inner = self.inner.read().await;
        inner
            .notes
            .get(&id)
            .map(|stored| stored.note.clone())
            .ok_or(Error::NotFound(id))
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Note>> {
        let inner = self.inner.read().await;
        let category = query.category_filter();

        let mut matched: Vec<&StoredNote> = inner
            .notes
            .values()
            .filter(|s| category.map_or(true, |c| s.note.category == c))
            .collect();
        matched.sort_by(|a, b| by_recency(a, b));

        Ok(page(
            matched.into_iter().map(|s| s.note.clone()).collect(),
            query.effective_limit(),
            query.effective_offset(),
        ))
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Note>> {
        let inner = self.inner.read().await;
        let category = query.category_filter();
        let text = query.text_query().map(TextQuery::parse);

        // Punctuation-only input yields an empty tsquery in Postgres, which matches nothing.
        if text.as_ref().is_some_and(TextQuery::is_empty) {
            return Ok(Vec::new());
        }

        let mut matched: Vec<(f64, &StoredNote)> = inner
            .notes
            .values()
            .filter(|s| category.map_or(true, |c| s.note.category == c))
            .filter(|s| query.since.map_or(true, |since| s.note.created_at >= since))
            .filter(|s| query.until.map_or(true, |until| s.note.created_at <= until))
            .filter_map(|s| match &text {
                Some(tq) => tq.score(&s.note.content).map(|score| (score, s)),
                None => Some((0.0, s)),
            })
            .collect();

        matched.sort_by(|(score_a, a), (score_b, b)| {
            score_b.total_cmp(score_a).then_with(|| by_recency(a, b))
        });

        Ok(page(
            matched.into_iter().map(|(_, s)| s.note.clone()).collect(),
            query.effective_limit(),
            query.effective_offset(),
        ))
    }

    async fn recent(&self, query: &RecentQuery) -> Result<Vec<Note>> {
        let inner = self.inner.read().await;

        let mut matched: Vec<&StoredNote> = inner
            .notes
            .values()
            .filter(|s| query.since.map_or(true, |since| s.note.created_at >= since))
            .collect();
        matched.sort_by(|a, b| by_recency(a, b));

        Ok(page(
            matched.into_iter().map(|s| s.note.clone()).collect(),
            query.effective_limit(),
            0,
        ))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound(id))
    }

    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        let inner = self.inner.read().await;

        let mut by_name: HashMap<&str, CategorySummary> = HashMap::new();
        for stored in inner.notes.values() {
            let note = &stored.note;
            by_name
                .entry(note.category.as_str())
                .and_modify(|summary| {
                    summary.count += 1;
                    if note.created_at > summary.last_note {
                        summary.last_note = note.created_at;
                    }
                })
                .or_insert_with(|| CategorySummary {
                    name: note.category.clone(),
                    count: 1,
                    last_note: note.created_at,
                });
        }

        let mut summaries: Vec<CategorySummary> = by_name.into_values().collect();
        summaries.sort_by(|a, b| {
            b.last_note
                .cmp(&a.last_note)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(summaries)
    }

    async fn count(&self, category: Option<&str>) -> Result<i64> {
        let inner = self.inner.read().await;
        let n = inner
            .notes
            .values()
            .filter(|s| category.map_or(true, |c| s.note.category == c))
            .count();
        Ok(n as i64)
    }
}
