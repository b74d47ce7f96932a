//! Thread Repository Implementation
//!
//! PostgreSQL implementation of the ThreadRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{db_error, expect_one_row, map_unique_violation};
use crate::domain::error::{DomainError, EntityName, RepositoryMethod};
use crate::domain::{Thread, ThreadRepository};
use crate::infrastructure::database::TransactionContext;

/// Database row representation matching the threads table schema.
#[derive(Debug, sqlx::FromRow)]
struct ThreadRow {
    id: i64,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ThreadRow> for Thread {
    fn from(row: ThreadRow) -> Self {
        Thread {
            id: row.id,
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_THREAD: &str = "SELECT id, title, created_at, updated_at FROM threads";

/// PostgreSQL thread repository implementation.
#[derive(Clone)]
pub struct PgThreadRepository {
    pool: PgPool,
}

impl PgThreadRepository {
    /// Create a new PgThreadRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ThreadRepository<TransactionContext> for PgThreadRepository {
    async fn list(&self, after: i64, limit: i64) -> Result<Vec<Thread>, DomainError> {
        let rows = sqlx::query_as::<_, ThreadRow>(&format!(
            "{SELECT_THREAD} WHERE id > $1 ORDER BY id ASC LIMIT $2"
        ))
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error(RepositoryMethod::List, EntityName::Thread))?;

        Ok(rows.into_iter().map(Thread::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Thread>, DomainError> {
        let row = sqlx::query_as::<_, ThreadRow>(&format!("{SELECT_THREAD} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(RepositoryMethod::Read, EntityName::Thread))?;

        Ok(row.map(Thread::from))
    }

    async fn find_by_id(
        &self,
        tx: &mut TransactionContext,
        id: i64,
    ) -> Result<Option<Thread>, DomainError> {
        let row = sqlx::query_as::<_, ThreadRow>(&format!("{SELECT_THREAD} WHERE id = $1"))
            .bind(id)
            .fetch_optional(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Read, EntityName::Thread))?;

        Ok(row.map(Thread::from))
    }

    async fn find_by_title(
        &self,
        tx: &mut TransactionContext,
        title: &str,
    ) -> Result<Option<Thread>, DomainError> {
        let row = sqlx::query_as::<_, ThreadRow>(&format!("{SELECT_THREAD} WHERE title = $1"))
            .bind(title)
            .fetch_optional(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Read, EntityName::Thread))?;

        Ok(row.map(Thread::from))
    }

    async fn insert(
        &self,
        tx: &mut TransactionContext,
        thread: &Thread,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO threads (title, created_at, updated_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&thread.title)
        .bind(thread.created_at)
        .bind(thread.updated_at)
        .fetch_one(tx.conn())
        .await
        .map_err(map_unique_violation(
            RepositoryMethod::Insert,
            EntityName::Thread,
            || DomainError::already_exists(EntityName::Thread, "title", &thread.title),
        ))
    }

    async fn update(
        &self,
        tx: &mut TransactionContext,
        id: i64,
        title: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Thread, DomainError> {
        let row = sqlx::query_as::<_, ThreadRow>(
            r#"
            UPDATE threads
            SET title = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, title, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(updated_at)
        .fetch_optional(tx.conn())
        .await
        .map_err(map_unique_violation(
            RepositoryMethod::Update,
            EntityName::Thread,
            || DomainError::already_exists(EntityName::Thread, "title", title),
        ))?;

        row.map(Thread::from).ok_or_else(|| {
            DomainError::repository(
                RepositoryMethod::Update,
                EntityName::Thread,
                "expected 1 affected row, got 0",
            )
        })
    }

    async fn delete(&self, tx: &mut TransactionContext, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Delete, EntityName::Thread))?;

        expect_one_row(result, RepositoryMethod::Delete, EntityName::Thread)
    }
}
