//! Comment Repository Implementation
//!
//! PostgreSQL implementation of the CommentRepository trait. Reads join
//! `users` to project the author's name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{db_error, expect_one_row, map_foreign_key_violation};
use crate::domain::error::{DomainError, EntityName, RepositoryMethod};
use crate::domain::{Author, Comment, CommentRepository};
use crate::infrastructure::database::TransactionContext;

/// Foreign key from `comments.user_id`; the other one points at threads.
const USER_FOREIGN_KEY: &str = "comments_user_id_fkey";

/// Comment row joined with its author.
#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    thread_id: i64,
    user_id: i64,
    user_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            content: row.content,
            thread_id: row.thread_id,
            author: Author::new(row.user_id, row.user_name),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COMMENT: &str = r#"
    SELECT c.id, c.content, c.thread_id, c.user_id, u.name AS user_name,
           c.created_at, c.updated_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

/// PostgreSQL comment repository implementation.
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository<TransactionContext> for PgCommentRepository {
    async fn list_by_thread(
        &self,
        thread_id: i64,
        after: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{SELECT_COMMENT} WHERE c.thread_id = $1 AND c.id > $2 ORDER BY c.id ASC LIMIT $3"
        ))
        .bind(thread_id)
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error(RepositoryMethod::List, EntityName::Comment))?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!("{SELECT_COMMENT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(RepositoryMethod::Read, EntityName::Comment))?;

        Ok(row.map(Comment::from))
    }

    async fn find_by_id(
        &self,
        tx: &mut TransactionContext,
        id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!("{SELECT_COMMENT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Read, EntityName::Comment))?;

        Ok(row.map(Comment::from))
    }

    async fn insert(
        &self,
        tx: &mut TransactionContext,
        comment: &Comment,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (content, user_id, thread_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&comment.content)
        .bind(comment.author.id)
        .bind(comment.thread_id)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .fetch_one(tx.conn())
        .await
        .map_err(map_foreign_key_violation(
            RepositoryMethod::Insert,
            EntityName::Comment,
            |constraint| match constraint {
                Some(USER_FOREIGN_KEY) => {
                    DomainError::not_found(EntityName::User, "id", comment.author.id)
                }
                _ => DomainError::not_found(EntityName::Thread, "id", comment.thread_id),
            },
        ))
    }

    async fn update(
        &self,
        tx: &mut TransactionContext,
        id: i64,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH updated AS (
                UPDATE comments
                SET content = $2, updated_at = $3
                WHERE id = $1
                RETURNING id, content, thread_id, user_id, created_at, updated_at
            )
            SELECT c.id, c.content, c.thread_id, c.user_id, u.name AS user_name,
                   c.created_at, c.updated_at
            FROM updated c
            JOIN users u ON u.id = c.user_id
            "#,
        )
        .bind(id)
        .bind(content)
        .bind(updated_at)
        .fetch_optional(tx.conn())
        .await
        .map_err(db_error(RepositoryMethod::Update, EntityName::Comment))?;

        row.map(Comment::from).ok_or_else(|| {
            DomainError::repository(
                RepositoryMethod::Update,
                EntityName::Comment,
                "expected 1 affected row, got 0",
            )
        })
    }

    async fn delete(&self, tx: &mut TransactionContext, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Delete, EntityName::Comment))?;

        expect_one_row(result, RepositoryMethod::Delete, EntityName::Comment)
    }
}
