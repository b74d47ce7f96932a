//! Authentication Service
//!
//! Sign-up, login, logout and session resolution. Every mutating call runs
//! in one transaction that is committed only if the whole use case succeeds.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use super::error::{Operation, ServiceError};
use super::transaction::{begin, close_transaction};
use crate::domain::entities::{
    Credentials, Session, SessionRepository, User, UserCandidate, UserRepository,
};
use crate::domain::error::{DomainError, EntityName};
use crate::domain::services::{
    Clock, IdentityService, SessionDomainService, UserDomainService, UserFactory,
};
use crate::domain::unit_of_work::UnitOfWork;
use crate::shared::validation::validate_input;

/// Default bound on session id generation attempts.
pub const DEFAULT_MAX_SESSION_ID_ATTEMPTS: u32 = 5;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Register a new user and open its first session.
    async fn sign_up(&self, candidate: UserCandidate) -> Result<User, ServiceError>;

    /// Authenticate and replace the user's session with a new one.
    async fn login(&self, credentials: Credentials) -> Result<User, ServiceError>;

    /// End a session. Unknown sessions are not an error.
    async fn logout(&self, session_id: &str) -> Result<(), ServiceError>;

    /// Resolve the user owning a session.
    async fn current_user(&self, session_id: &str) -> Result<User, ServiceError>;
}

/// AuthenticationService implementation
pub struct AuthenticationServiceImpl<U, UR, SR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Tx>,
    SR: SessionRepository<U::Tx>,
{
    uow: Arc<U>,
    users: Arc<UR>,
    sessions: Arc<SR>,
    user_domain: UserDomainService<UR>,
    session_domain: SessionDomainService<SR>,
    identity: Arc<dyn IdentityService>,
    clock: Arc<dyn Clock>,
    max_session_id_attempts: u32,
}

impl<U, UR, SR> AuthenticationServiceImpl<U, UR, SR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Tx>,
    SR: SessionRepository<U::Tx>,
{
    /// Create a new AuthenticationServiceImpl
    pub fn new(
        uow: Arc<U>,
        users: Arc<UR>,
        sessions: Arc<SR>,
        identity: Arc<dyn IdentityService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            uow,
            user_domain: UserDomainService::new(users.clone()),
            session_domain: SessionDomainService::new(sessions.clone()),
            users,
            sessions,
            identity,
            clock,
            max_session_id_attempts: DEFAULT_MAX_SESSION_ID_ATTEMPTS,
        }
    }

    /// Bound the session id retry loop. Values below one are raised to one.
    pub fn with_max_session_id_attempts(mut self, attempts: u32) -> Self {
        self.max_session_id_attempts = attempts.max(1);
        self
    }

    /// Generate a session id that no stored session uses and that differs
    /// from `previous`.
    async fn unique_session_id(
        &self,
        tx: &mut U::Tx,
        previous: Option<&str>,
    ) -> Result<String, DomainError> {
        for attempt in 1..=self.max_session_id_attempts {
            let candidate = self.identity.new_session_id();
            if previous == Some(candidate.as_str()) {
                warn!(attempt, "generated session id equals the previous one");
                continue;
            }
            if !self.session_domain.exists_by_id(tx, &candidate).await? {
                return Ok(candidate);
            }
            warn!(attempt, "session id collision");
        }
        Err(DomainError::SessionIdExhausted {
            attempts: self.max_session_id_attempts,
        })
    }

    async fn sign_up_in(&self, tx: &mut U::Tx, mut user: User) -> Result<User, DomainError> {
        if self.user_domain.exists_by_name(tx, &user.name).await? {
            return Err(DomainError::already_exists(
                EntityName::User,
                "name",
                &user.name,
            ));
        }

        let session_id = self.unique_session_id(tx, None).await?;
        user.session_id = Some(session_id.clone());
        user.id = self.users.insert(tx, &user).await?;

        let session = Session::new(session_id, user.id, user.created_at);
        self.sessions.insert(tx, &session).await?;
        Ok(user)
    }

    async fn login_in(
        &self,
        tx: &mut U::Tx,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_name(tx, &credentials.name)
            .await?
            .ok_or(DomainError::AuthenticationFailed)?;
        if !self
            .identity
            .verify_password(&credentials.password, &user.password)?
        {
            return Err(DomainError::AuthenticationFailed);
        }

        let previous = user.session_id.take();
        let session_id = self.unique_session_id(tx, previous.as_deref()).await?;
        if let Some(previous) = &previous {
            self.sessions.delete(tx, previous).await?;
        }
        self.sessions
            .insert(tx, &Session::new(session_id.clone(), user.id, now))
            .await?;

        user.session_id = Some(session_id);
        user.updated_at = now;
        self.users.update(tx, &user).await?;
        Ok(user)
    }

    async fn logout_in(
        &self,
        tx: &mut U::Tx,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.sessions.delete(tx, session_id).await?;
        self.users.clear_session(tx, session_id, now).await
    }
}

#[async_trait]
impl<U, UR, SR> AuthenticationService for AuthenticationServiceImpl<U, UR, SR>
where
    U: UnitOfWork,
    UR: UserRepository<U::Tx>,
    SR: SessionRepository<U::Tx>,
{
    #[instrument(skip_all, fields(name = %candidate.name))]
    async fn sign_up(&self, candidate: UserCandidate) -> Result<User, ServiceError> {
        const OP: Operation = Operation::SignUp;

        let user = UserFactory::create(&candidate, self.identity.as_ref(), self.clock.now())
            .map_err(|e| OP.fail(e))?;

        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.sign_up_in(&mut tx, user).await;
        let user = close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!(user_id = user.id, "user signed up");
        Ok(user)
    }

    #[instrument(skip_all, fields(name = %credentials.name))]
    async fn login(&self, credentials: Credentials) -> Result<User, ServiceError> {
        const OP: Operation = Operation::Login;

        validate_input(&credentials).map_err(|e| OP.fail(e))?;
        let now = self.clock.now();

        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.login_in(&mut tx, &credentials, now).await;
        let user = close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!(user_id = user.id, "user logged in");
        Ok(user)
    }

    #[instrument(skip_all)]
    async fn logout(&self, session_id: &str) -> Result<(), ServiceError> {
        const OP: Operation = Operation::Logout;

        let now = self.clock.now();
        let mut tx = begin(self.uow.as_ref(), OP).await?;
        let result = self.logout_in(&mut tx, session_id, now).await;
        close_transaction(self.uow.as_ref(), tx, OP, result).await?;

        info!("session closed");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn current_user(&self, session_id: &str) -> Result<User, ServiceError> {
        const OP: Operation = Operation::CurrentUser;

        self.users
            .find_by_session(session_id)
            .await
            .map_err(|e| OP.fail(e))?
            .ok_or_else(|| OP.fail(DomainError::not_found(EntityName::Session, "id", session_id)))
    }
}
