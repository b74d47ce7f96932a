//! Thread Service
//!
//! Listing and lookup read straight from storage; create, update and delete
//! each run in their own transaction behind a uniqueness or existence check.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use super::error::{Operation, ServiceError};
use super::transaction::{begin, close_transaction};
use crate::domain::entities::{Thread, ThreadCandidate, ThreadList, ThreadRepository};
use crate::domain::error::{DomainError, EntityName};
use crate::domain::services::{Clock, ThreadDomainService};
use crate::domain::unit_of_work::UnitOfWork;
use crate::domain::value_objects::{Page, PageRequest};
use crate::shared::validation::validate_input;

/// Thread service trait
#[async_trait]
pub trait ThreadService: Send + Sync {
    /// List threads after the cursor in ascending id order.
    async fn list_threads(&self, page: PageRequest) -> Result<ThreadList, ServiceError>;

    async fn get_thread(&self, id: i64) -> Result<Thread, ServiceError>;

    async fn create_thread(&self, candidate: ThreadCandidate) -> Result<Thread, ServiceError>;

    async fn update_thread(
        &self,
        id: i64,
        candidate: ThreadCandidate,
    ) -> Result<Thread, ServiceError>;

    async fn delete_thread(&self, id: i64) -> Result<(), ServiceError>;
}

/// ThreadService implementation
pub struct ThreadServiceImpl<U, TR>
where
    U: UnitOfWork,
    TR: ThreadRepository<U::Tx>,
{
    uow: Arc<U>,
    threads: Arc<TR>,
    domain: ThreadDomainService<TR>,
    clock: Arc<dyn Clock>,
}

impl<U, TR> ThreadServiceImpl<U, TR>
where
    U: UnitOfWork,
    TR: ThreadRepository<U::Tx>,
{
    pub fn new(uow: Arc<U>, threads: Arc<TR>, clock: Arc<dyn Clock>) -> Self {
        Self {
            uow,
            domain: ThreadDomainService::new(threads.clone()),
            threads,
            clock,
        }
    }

    async fn create_thread_in(
        &self,
        tx: &mut U::Tx,
        candidate: ThreadCandidate,
        now: DateTime<Utc>,
    ) -> Result<Thread, DomainError> {
        if self.domain.exists_by_title(tx, &candidate.title).await? {
            return Err(DomainError::already_exists(
                EntityName::Thread,
                "title",
                &candidate.title,
            ));
        }

        let mut thread = Thread {
            id: 0,
            title: candidate.title,
            created_at: now,
            updated_at: now,
        };
        thread.id = self.threads.insert(tx, &thread).await?;
        Ok(thread)
    }

    async fn update_thread_in(
        &self,
        tx: &mut U::Tx,
        id: i64,
        candidate: ThreadCandidate,
        now: DateTime<Utc>,
    ) -> Result<Thread, DomainError> {
        if !self.domain.exists_by_id(tx, id).await? {
            return Err(DomainError::not_found(EntityName::Thread, "id", id));
        }
        if let Some(owner) = self.threads.find_by_title(tx, &candidate.title).await? {
            if owner.id != id {
                return Err(DomainError::already_exists(
                    EntityName::Thread,
                    "title",
                    &candidate.title,
                ));
            }
        }

        self.threads.update(tx, id, &candidate.title, now).await
    }

    async fn delete_thread_in(&self, tx: &mut U::Tx, id: i64) -> Result<(), DomainError> {
        if !self.domain.exists_by_id(tx, id).await? {
            return Err(DomainError::not_found(EntityName::Thread, "id", id));
        }
        self.threads.delete(tx, id).await
    }
}

#[async_trait]
impl<U, TR> ThreadService for ThreadServiceImpl<U, TR>
where
    U: UnitOfWork,
    TR: ThreadRepository<U::Tx>,
{
    async fn list_threads(&self, page: PageRequest) -> Result<ThreadList, ServiceError> {
        const OP: Operation = Operation::ListThreads;

        validate_input(&page).map_err(|e| OP.fail(e))?;
        let rows = self
            .threads
            .list(page.cursor, page.fetch_size())
            .await
            .map_err(|e| OP.fail(e))?;
        if rows.is_empty() {
            return Err(OP.fail(DomainError::not_found(
                EntityName::Thread,
                "cursor",
                page.cursor,
            )));
        }
        Ok(Page::from_fetched(rows, &page))
    }

    async fn get_thread(&self, id: i64) -> Result<Thread, ServiceError> {
        const OP: Operation = Operation::GetThread;

        self.threads
            .get(id)
            .await
            .map_err(|e| OP.fail(e))?
            .ok_or_else(|| OP.fail(DomainError::not_found(EntityName::Thread, "id", id)))
    }

    #[instrument(skip_all, fields(title = %candidate.title))]
    async fn create_thread(&self, candidate: ThreadCandidate) -> Result<Thread, ServiceError> {
        const OP: Operation = Operation::CreateThread;

        validate_input(&candidate).map_err(|e| OP.fail(e))?;
        let now = self.clock.now();

        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.create_thread_in(&mut tx, candidate, now).await;
        let thread = close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!(thread_id = thread.id, "thread created");
        Ok(thread)
    }

    #[instrument(skip_all, fields(thread_id = id))]
    async fn update_thread(
        &self,
        id: i64,
        candidate: ThreadCandidate,
    ) -> Result<Thread, ServiceError> {
        const OP: Operation = Operation::UpdateThread;

        validate_input(&candidate).map_err(|e| OP.fail(e))?;
        let now = self.clock.now();

        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.update_thread_in(&mut tx, id, candidate, now).await;
        let thread = close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!("thread updated");
        Ok(thread)
    }

    #[instrument(skip_all, fields(thread_id = id))]
    async fn delete_thread(&self, id: i64) -> Result<(), ServiceError> {
        const OP: Operation = Operation::DeleteThread;

        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.delete_thread_in(&mut tx, id).await;
        close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!("thread deleted");
        Ok(())
    }
}
