//! Session Repository Implementation
//!
//! PostgreSQL implementation of the SessionRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::db_error;
use crate::domain::error::{DomainError, EntityName, RepositoryMethod};
use crate::domain::{Session, SessionRepository};
use crate::infrastructure::database::TransactionContext;

/// Database row representation matching the sessions table schema.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: String,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session::new(row.id, row.user_id, row.created_at)
    }
}

/// PostgreSQL session repository implementation.
///
/// Sessions are only touched inside transactions, so it holds no pool.
#[derive(Clone, Default)]
pub struct PgSessionRepository;

impl PgSessionRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionRepository<TransactionContext> for PgSessionRepository {
    async fn find_by_id(
        &self,
        tx: &mut TransactionContext,
        id: &str,
    ) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, created_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(tx.conn())
        .await
        .map_err(db_error(RepositoryMethod::Read, EntityName::Session))?;

        Ok(row.map(Session::from))
    }

    async fn insert(
        &self,
        tx: &mut TransactionContext,
        session: &Session,
    ) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO sessions (id, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(&session.id)
            .bind(session.user_id)
            .bind(session.created_at)
            .execute(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Insert, EntityName::Session))?;

        Ok(())
    }

    async fn delete(&self, tx: &mut TransactionContext, id: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Delete, EntityName::Session))?;

        Ok(())
    }
}
