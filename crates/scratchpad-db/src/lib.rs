//! # scratchpad-db
//!
//! Storage backends for scratchpad.
//!
//! This crate provides:
//! - Connection pool management
//! - [`PgNoteStore`], the PostgreSQL note store with tsvector full-text search
//! - [`MemoryNoteStore`], an in-process store with the same ordering rules
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scratchpad_db::{Database, NoteService, PoolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/scratchpad", PoolConfig::default()).await?;
//!     db.migrate().await?;
//!
//!     let service = NoteService::new(Arc::new(db.notes.clone()));
//!     let notes = service.list(Default::default()).await?;
//!     println!("{} notes", notes.len());
//!     Ok(())
//! }
//! ```
pub mod memory;
pub mod notes;
pub mod pool;

// Test fixtures for integration tests
// Compiled outside cfg(test) so integration tests (in tests/) can reach it
#[cfg(feature = "migrations")]
pub mod test_fixtures;

// Re-export core types
pub use scratchpad_core::*;

pub use memory::MemoryNoteStore;
pub use notes::PgNoteStore;
pub use pool::{create_pool, log_pool_metrics, PoolConfig};

/// Database context: the pool plus the note store built on it.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note store backed by `pool`.
    pub notes: PgNoteStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteStore::new(pool.clone()),
            pool,
        }
    }

    /// Connect to `url` with the given pool settings.
    pub async fn connect(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
