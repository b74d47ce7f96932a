//! User Repository Implementation
//!
//! PostgreSQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{db_error, expect_one_row, map_unique_violation};
use crate::domain::error::{DomainError, EntityName, RepositoryMethod};
use crate::domain::{User, UserRepository};
use crate::infrastructure::database::TransactionContext;

/// Database row representation matching the users table schema.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    session_id: Option<String>,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            session_id: row.session_id,
            password: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_USER: &str =
    "SELECT id, name, session_id, password, created_at, updated_at FROM users";

/// PostgreSQL user repository implementation.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository<TransactionContext> for PgUserRepository {
    async fn find_by_name(
        &self,
        tx: &mut TransactionContext,
        name: &str,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE name = $1"))
            .bind(name)
            .fetch_optional(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Read, EntityName::User))?;

        Ok(row.map(User::from))
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE session_id = $1"))
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(RepositoryMethod::Read, EntityName::User))?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, tx: &mut TransactionContext, user: &User) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, session_id, password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.session_id)
        .bind(&user.password)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(tx.conn())
        .await
        .map_err(map_unique_violation(
            RepositoryMethod::Insert,
            EntityName::User,
            || DomainError::already_exists(EntityName::User, "name", &user.name),
        ))
    }

    async fn update(&self, tx: &mut TransactionContext, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET session_id = $2, password = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.session_id)
        .bind(&user.password)
        .bind(user.updated_at)
        .execute(tx.conn())
        .await
        .map_err(db_error(RepositoryMethod::Update, EntityName::User))?;

        expect_one_row(result, RepositoryMethod::Update, EntityName::User)
    }

    async fn clear_session(
        &self,
        tx: &mut TransactionContext,
        session_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET session_id = NULL, updated_at = $2 WHERE session_id = $1")
            .bind(session_id)
            .bind(updated_at)
            .execute(tx.conn())
            .await
            .map_err(db_error(RepositoryMethod::Update, EntityName::User))?;

        Ok(())
    }
}
