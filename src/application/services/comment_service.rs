//! Comment Service
//!
//! Same shape as the thread service: read-through listing and lookup,
//! transactional create/update/delete. Timestamps come from the injected
//! clock, never from storage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use super::error::{Operation, ServiceError};
use super::transaction::{begin, close_transaction};
use crate::domain::entities::{
    Comment, CommentCandidate, CommentList, CommentPatch, CommentRepository,
};
use crate::domain::error::{DomainError, EntityName};
use crate::domain::services::{Clock, CommentDomainService};
use crate::domain::unit_of_work::UnitOfWork;
use crate::domain::value_objects::{Page, PageRequest};
use crate::shared::validation::validate_input;

/// Comment service trait
#[async_trait]
pub trait CommentService: Send + Sync {
    /// List a thread's comments after the cursor in ascending id order.
    async fn list_comments(
        &self,
        thread_id: i64,
        page: PageRequest,
    ) -> Result<CommentList, ServiceError>;

    async fn get_comment(&self, id: i64) -> Result<Comment, ServiceError>;

    async fn create_comment(&self, candidate: CommentCandidate) -> Result<Comment, ServiceError>;

    async fn update_comment(&self, id: i64, patch: CommentPatch) -> Result<Comment, ServiceError>;

    async fn delete_comment(&self, id: i64) -> Result<(), ServiceError>;
}

/// CommentService implementation
pub struct CommentServiceImpl<U, CR>
where
    U: UnitOfWork,
    CR: CommentRepository<U::Tx>,
{
    uow: Arc<U>,
    comments: Arc<CR>,
    domain: CommentDomainService<CR>,
    clock: Arc<dyn Clock>,
}

impl<U, CR> CommentServiceImpl<U, CR>
where
    U: UnitOfWork,
    CR: CommentRepository<U::Tx>,
{
    pub fn new(uow: Arc<U>, comments: Arc<CR>, clock: Arc<dyn Clock>) -> Self {
        Self {
            uow,
            domain: CommentDomainService::new(comments.clone()),
            comments,
            clock,
        }
    }

    async fn create_comment_in(
        &self,
        tx: &mut U::Tx,
        candidate: CommentCandidate,
        now: DateTime<Utc>,
    ) -> Result<Comment, DomainError> {
        let mut comment = Comment {
            id: 0,
            content: candidate.content,
            thread_id: candidate.thread_id,
            author: candidate.author,
            created_at: now,
            updated_at: now,
        };
        comment.id = self.comments.insert(tx, &comment).await?;
        Ok(comment)
    }

    async fn update_comment_in(
        &self,
        tx: &mut U::Tx,
        id: i64,
        patch: CommentPatch,
        now: DateTime<Utc>,
    ) -> Result<Comment, DomainError> {
        if !self.domain.exists_by_id(tx, id).await? {
            return Err(DomainError::not_found(EntityName::Comment, "id", id));
        }
        self.comments.update(tx, id, &patch.content, now).await
    }

    async fn delete_comment_in(&self, tx: &mut U::Tx, id: i64) -> Result<(), DomainError> {
        if !self.domain.exists_by_id(tx, id).await? {
            return Err(DomainError::not_found(EntityName::Comment, "id", id));
        }
        self.comments.delete(tx, id).await
    }
}

#[async_trait]
impl<U, CR> CommentService for CommentServiceImpl<U, CR>
where
    U: UnitOfWork,
    CR: CommentRepository<U::Tx>,
{
    async fn list_comments(
        &self,
        thread_id: i64,
        page: PageRequest,
    ) -> Result<CommentList, ServiceError> {
        const OP: Operation = Operation::ListComments;

        validate_input(&page).map_err(|e| OP.fail(e))?;
        let rows = self
            .comments
            .list_by_thread(thread_id, page.cursor, page.fetch_size())
            .await
            .map_err(|e| OP.fail(e))?;
        if rows.is_empty() {
            return Err(OP.fail(DomainError::not_found(
                EntityName::Comment,
                "thread_id",
                thread_id,
            )));
        }
        Ok(Page::from_fetched(rows, &page))
    }

    async fn get_comment(&self, id: i64) -> Result<Comment, ServiceError> {
        const OP: Operation = Operation::GetComment;

        self.comments
            .get(id)
            .await
            .map_err(|e| OP.fail(e))?
            .ok_or_else(|| OP.fail(DomainError::not_found(EntityName::Comment, "id", id)))
    }

    #[instrument(
        skip_all,
        fields(thread_id = candidate.thread_id, author_id = candidate.author.id)
    )]
    async fn create_comment(&self, candidate: CommentCandidate) -> Result<Comment, ServiceError> {
        const OP: Operation = Operation::CreateComment;

        validate_input(&candidate).map_err(|e| OP.fail(e))?;
        let now = self.clock.now();

        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.create_comment_in(&mut tx, candidate, now).await;
        let comment = close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!(comment_id = comment.id, "comment created");
        Ok(comment)
    }

    #[instrument(skip_all, fields(comment_id = id))]
    async fn update_comment(&self, id: i64, patch: CommentPatch) -> Result<Comment, ServiceError> {
        const OP: Operation = Operation::UpdateComment;

        validate_input(&patch).map_err(|e| OP.fail(e))?;
        let now = self.clock.now();

        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.update_comment_in(&mut tx, id, patch, now).await;
        let comment = close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!("comment updated");
        Ok(comment)
    }

    #[instrument(skip_all, fields(comment_id = id))]
    async fn delete_comment(&self, id: i64) -> Result<(), ServiceError> {
        const OP: Operation = Operation::DeleteComment;

        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.delete_comment_in(&mut tx, id).await;
        close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!("comment deleted");
        Ok(())
    }
}
