//! In-memory storage backend.
//!
//! Implements the unit of work, every repository trait and the health probe
//! on top of plain ordered maps. A transaction works on its own copy of the
//! tables: commit publishes the copy, rollback (or dropping the handle)
//! discards it. Commits are optimistic; a transaction whose base version is
//! stale fails to commit.
//!
//! Besides the data it keeps a journal of repository calls, commit and
//! rollback counters, and per-(method, entity) failure injection, which the
//! test-suite uses to observe transactional behavior.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::entities::{
    Comment, CommentRepository, Session, SessionRepository, Thread, ThreadRepository, User,
    UserRepository,
};
use crate::domain::error::{DomainError, EntityName, RepositoryMethod, TransactionStage};
use crate::domain::unit_of_work::{StorageHealth, UnitOfWork};

/// Committed contents of the store.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: BTreeMap<i64, User>,
    pub sessions: BTreeMap<String, Session>,
    pub threads: BTreeMap<i64, Thread>,
    pub comments: BTreeMap<i64, Comment>,
    next_user_id: i64,
    next_thread_id: i64,
    next_comment_id: i64,
    version: u64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    /// Comment with the author name projected from `users`.
    fn project(&self, comment: &Comment) -> Comment {
        let mut comment = comment.clone();
        if let Some(user) = self.users.get(&comment.author.id) {
            comment.author.name = user.name.clone();
        }
        comment
    }
}

/// Transaction handle of the in-memory store.
#[derive(Debug)]
pub struct MemoryTx {
    tables: Tables,
    base_version: u64,
}

#[derive(Debug, Default)]
struct Journal {
    calls: Vec<(RepositoryMethod, EntityName)>,
    commits: usize,
    rollbacks: usize,
    failures: HashSet<(RepositoryMethod, EntityName)>,
    fail_begin: bool,
    fail_commit: bool,
    fail_rollback: bool,
}

#[derive(Debug, Default)]
struct Inner {
    tables: Mutex<Tables>,
    journal: Mutex<Journal>,
}

/// Shared handle to an in-memory database.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

fn injected(method: RepositoryMethod, entity: EntityName) -> DomainError {
    DomainError::repository(method, entity, format!("injected {method} failure on {entity}"))
}

fn constraint(method: RepositoryMethod, entity: EntityName, what: &str) -> DomainError {
    DomainError::repository(method, entity, what.to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed tables.
    pub fn snapshot(&self) -> Tables {
        self.inner.tables.lock().clone()
    }

    /// Mutate committed tables directly, bypassing the journal.
    pub fn seed<F>(&self, f: F)
    where
        F: FnOnce(&mut Tables),
    {
        let mut tables = self.inner.tables.lock();
        f(&mut tables);
        tables.version += 1;
    }

    /// Insert threads with consecutive ids, returning the ids.
    pub fn seed_threads<I, S>(&self, titles: I, at: DateTime<Utc>) -> Vec<i64>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids = Vec::new();
        self.seed(|t| {
            for title in titles {
                let id = Tables::next_id(&mut t.next_thread_id);
                t.threads.insert(
                    id,
                    Thread {
                        id,
                        title: title.into(),
                        created_at: at,
                        updated_at: at,
                    },
                );
                ids.push(id);
            }
        });
        ids
    }

    /// Make every call of `method` on `entity` fail.
    pub fn fail_on(&self, method: RepositoryMethod, entity: EntityName) {
        self.inner.journal.lock().failures.insert((method, entity));
    }

    pub fn fail_begin(&self) {
        self.inner.journal.lock().fail_begin = true;
    }

    pub fn fail_commit(&self) {
        self.inner.journal.lock().fail_commit = true;
    }

    pub fn fail_rollback(&self) {
        self.inner.journal.lock().fail_rollback = true;
    }

    /// Repository calls made so far, in order.
    pub fn calls(&self) -> Vec<(RepositoryMethod, EntityName)> {
        self.inner.journal.lock().calls.clone()
    }

    /// Number of calls of `method` on `entity`.
    pub fn call_count(&self, method: RepositoryMethod, entity: EntityName) -> usize {
        self.inner
            .journal
            .lock()
            .calls
            .iter()
            .filter(|call| **call == (method, entity))
            .count()
    }

    pub fn commits(&self) -> usize {
        self.inner.journal.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.inner.journal.lock().rollbacks
    }

    fn record(&self, method: RepositoryMethod, entity: EntityName) -> Result<(), DomainError> {
        let mut journal = self.inner.journal.lock();
        journal.calls.push((method, entity));
        if journal.failures.contains(&(method, entity)) {
            return Err(injected(method, entity));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, DomainError> {
        if self.inner.journal.lock().fail_begin {
            return Err(DomainError::transaction(
                TransactionStage::Begin,
                "injected begin failure",
            ));
        }
        let tables = self.snapshot();
        let base_version = tables.version;
        Ok(MemoryTx {
            tables,
            base_version,
        })
    }

    async fn commit(&self, tx: MemoryTx) -> Result<(), DomainError> {
        if self.inner.journal.lock().fail_commit {
            return Err(DomainError::transaction(
                TransactionStage::Commit,
                "injected commit failure",
            ));
        }
        let mut tables = self.inner.tables.lock();
        if tables.version != tx.base_version {
            return Err(DomainError::transaction(
                TransactionStage::Commit,
                "could not serialize access due to concurrent update",
            ));
        }
        let mut published = tx.tables;
        published.version = tx.base_version + 1;
        *tables = published;
        drop(tables);

        self.inner.journal.lock().commits += 1;
        Ok(())
    }

    async fn rollback(&self, tx: MemoryTx) -> Result<(), DomainError> {
        drop(tx);
        let mut journal = self.inner.journal.lock();
        if journal.fail_rollback {
            return Err(DomainError::transaction(
                TransactionStage::Rollback,
                "injected rollback failure",
            ));
        }
        journal.rollbacks += 1;
        Ok(())
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository<MemoryTx> for MemoryStore {
    async fn find_by_name(
        &self,
        tx: &mut MemoryTx,
        name: &str,
    ) -> Result<Option<User>, DomainError> {
        self.record(RepositoryMethod::Read, EntityName::User)?;
        Ok(tx.tables.users.values().find(|u| u.name == name).cloned())
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<User>, DomainError> {
        self.record(RepositoryMethod::Read, EntityName::User)?;
        let tables = self.inner.tables.lock();
        Ok(tables
            .users
            .values()
            .find(|u| u.session_id.as_deref() == Some(session_id))
            .cloned())
    }

    async fn insert(&self, tx: &mut MemoryTx, user: &User) -> Result<i64, DomainError> {
        self.record(RepositoryMethod::Insert, EntityName::User)?;
        let tables = &mut tx.tables;
        if tables.users.values().any(|u| u.name == user.name) {
            return Err(DomainError::already_exists(EntityName::User, "name", &user.name));
        }
        let id = Tables::next_id(&mut tables.next_user_id);
        tables.users.insert(id, User { id, ..user.clone() });
        Ok(id)
    }

    async fn update(&self, tx: &mut MemoryTx, user: &User) -> Result<(), DomainError> {
        self.record(RepositoryMethod::Update, EntityName::User)?;
        match tx.tables.users.get_mut(&user.id) {
            Some(row) => {
                row.session_id = user.session_id.clone();
                row.password = user.password.clone();
                row.updated_at = user.updated_at;
                Ok(())
            }
            None => Err(constraint(
                RepositoryMethod::Update,
                EntityName::User,
                "expected 1 affected row, got 0",
            )),
        }
    }

    async fn clear_session(
        &self,
        tx: &mut MemoryTx,
        session_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.record(RepositoryMethod::Update, EntityName::User)?;
        for user in tx.tables.users.values_mut() {
            if user.session_id.as_deref() == Some(session_id) {
                user.session_id = None;
                user.updated_at = updated_at;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository<MemoryTx> for MemoryStore {
    async fn find_by_id(
        &self,
        tx: &mut MemoryTx,
        id: &str,
    ) -> Result<Option<Session>, DomainError> {
        self.record(RepositoryMethod::Read, EntityName::Session)?;
        Ok(tx.tables.sessions.get(id).cloned())
    }

    async fn insert(&self, tx: &mut MemoryTx, session: &Session) -> Result<(), DomainError> {
        self.record(RepositoryMethod::Insert, EntityName::Session)?;
        if tx.tables.sessions.contains_key(&session.id) {
            return Err(constraint(
                RepositoryMethod::Insert,
                EntityName::Session,
                "duplicate key value violates unique constraint \"sessions_pkey\"",
            ));
        }
        tx.tables.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, tx: &mut MemoryTx, id: &str) -> Result<(), DomainError> {
        self.record(RepositoryMethod::Delete, EntityName::Session)?;
        tx.tables.sessions.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ThreadRepository<MemoryTx> for MemoryStore {
    async fn list(&self, after: i64, limit: i64) -> Result<Vec<Thread>, DomainError> {
        self.record(RepositoryMethod::List, EntityName::Thread)?;
        let take = usize::try_from(limit).unwrap_or(0);
        let tables = self.inner.tables.lock();
        Ok(tables
            .threads
            .range(after.saturating_add(1)..)
            .take(take)
            .map(|(_, t)| t.clone())
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Thread>, DomainError> {
        self.record(RepositoryMethod::Read, EntityName::Thread)?;
        Ok(self.inner.tables.lock().threads.get(&id).cloned())
    }

    async fn find_by_id(
        &self,
        tx: &mut MemoryTx,
        id: i64,
    ) -> Result<Option<Thread>, DomainError> {
        self.record(RepositoryMethod::Read, EntityName::Thread)?;
        Ok(tx.tables.threads.get(&id).cloned())
    }

    async fn find_by_title(
        &self,
        tx: &mut MemoryTx,
        title: &str,
    ) -> Result<Option<Thread>, DomainError> {
        self.record(RepositoryMethod::Read, EntityName::Thread)?;
        Ok(tx.tables.threads.values().find(|t| t.title == title).cloned())
    }

    async fn insert(&self, tx: &mut MemoryTx, thread: &Thread) -> Result<i64, DomainError> {
        self.record(RepositoryMethod::Insert, EntityName::Thread)?;
        let tables = &mut tx.tables;
        if tables.threads.values().any(|t| t.title == thread.title) {
            return Err(DomainError::already_exists(
                EntityName::Thread,
                "title",
                &thread.title,
            ));
        }
        let id = Tables::next_id(&mut tables.next_thread_id);
        tables.threads.insert(id, Thread { id, ..thread.clone() });
        Ok(id)
    }

    async fn update(
        &self,
        tx: &mut MemoryTx,
        id: i64,
        title: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Thread, DomainError> {
        self.record(RepositoryMethod::Update, EntityName::Thread)?;
        let tables = &mut tx.tables;
        if tables.threads.values().any(|t| t.title == title && t.id != id) {
            return Err(DomainError::already_exists(EntityName::Thread, "title", title));
        }
        match tables.threads.get_mut(&id) {
            Some(row) => {
                row.title = title.to_string();
                row.updated_at = updated_at;
                Ok(row.clone())
            }
            None => Err(constraint(
                RepositoryMethod::Update,
                EntityName::Thread,
                "expected 1 affected row, got 0",
            )),
        }
    }

    async fn delete(&self, tx: &mut MemoryTx, id: i64) -> Result<(), DomainError> {
        self.record(RepositoryMethod::Delete, EntityName::Thread)?;
        let tables = &mut tx.tables;
        if tables.threads.remove(&id).is_none() {
            return Err(constraint(
                RepositoryMethod::Delete,
                EntityName::Thread,
                "expected 1 affected row, got 0",
            ));
        }
        tables.comments.retain(|_, c| c.thread_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository<MemoryTx> for MemoryStore {
    async fn list_by_thread(
        &self,
        thread_id: i64,
        after: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, DomainError> {
        self.record(RepositoryMethod::List, EntityName::Comment)?;
        let take = usize::try_from(limit).unwrap_or(0);
        let tables = self.inner.tables.lock();
        Ok(tables
            .comments
            .range(after.saturating_add(1)..)
            .map(|(_, c)| c)
            .filter(|c| c.thread_id == thread_id)
            .take(take)
            .map(|c| tables.project(c))
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        self.record(RepositoryMethod::Read, EntityName::Comment)?;
        let tables = self.inner.tables.lock();
        Ok(tables.comments.get(&id).map(|c| tables.project(c)))
    }

    async fn find_by_id(
        &self,
        tx: &mut MemoryTx,
        id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        self.record(RepositoryMethod::Read, EntityName::Comment)?;
        Ok(tx.tables.comments.get(&id).map(|c| tx.tables.project(c)))
    }

    async fn insert(&self, tx: &mut MemoryTx, comment: &Comment) -> Result<i64, DomainError> {
        self.record(RepositoryMethod::Insert, EntityName::Comment)?;
        let tables = &mut tx.tables;
        let id = Tables::next_id(&mut tables.next_comment_id);
        tables.comments.insert(id, Comment { id, ..comment.clone() });
        Ok(id)
    }

    async fn update(
        &self,
        tx: &mut MemoryTx,
        id: i64,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Comment, DomainError> {
        self.record(RepositoryMethod::Update, EntityName::Comment)?;
        let tables = &mut tx.tables;
        let Some(row) = tables.comments.get_mut(&id) else {
            return Err(constraint(
                RepositoryMethod::Update,
                EntityName::Comment,
                "expected 1 affected row, got 0",
            ));
        };
        row.content = content.to_string();
        row.updated_at = updated_at;
        let row = row.clone();
        Ok(tables.project(&row))
    }

    async fn delete(&self, tx: &mut MemoryTx, id: i64) -> Result<(), DomainError> {
        self.record(RepositoryMethod::Delete, EntityName::Comment)?;
        if tx.tables.comments.remove(&id).is_none() {
            return Err(constraint(
                RepositoryMethod::Delete,
                EntityName::Comment,
                "expected 1 affected row, got 0",
            ));
        }
        Ok(())
    }
}
