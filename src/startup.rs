//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthenticationService, AuthenticationServiceImpl, CommentService, CommentServiceImpl,
    ThreadService, ThreadServiceImpl,
};
use crate::config::Settings;
use crate::domain::services::{Clock, IdentityService, SystemClock};
use crate::domain::StorageHealth;
use crate::infrastructure::database::{self, PgUnitOfWork};
use crate::infrastructure::repositories::{
    PgCommentRepository, PgSessionRepository, PgThreadRepository, PgUserRepository,
};
use crate::infrastructure::{Argon2IdentityService, MemoryStore};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthenticationService>,
    pub threads: Arc<dyn ThreadService>,
    pub comments: Arc<dyn CommentService>,
    pub health: Arc<dyn StorageHealth>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Services backed by PostgreSQL.
    pub fn postgres(pool: PgPool, settings: Settings) -> Self {
        let uow = Arc::new(PgUnitOfWork::new(pool.clone()));
        let identity: Arc<dyn IdentityService> = Arc::new(Argon2IdentityService::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let auth = AuthenticationServiceImpl::new(
            uow.clone(),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgSessionRepository::new()),
            identity,
            clock.clone(),
        )
        .with_max_session_id_attempts(settings.auth.max_session_id_attempts);
        let threads = ThreadServiceImpl::new(
            uow.clone(),
            Arc::new(PgThreadRepository::new(pool.clone())),
            clock.clone(),
        );
        let comments =
            CommentServiceImpl::new(uow.clone(), Arc::new(PgCommentRepository::new(pool)), clock);

        Self {
            auth: Arc::new(auth),
            threads: Arc::new(threads),
            comments: Arc::new(comments),
            health: uow,
            settings: Arc::new(settings),
        }
    }

    /// Services backed by a single in-memory store.
    pub fn in_memory(
        store: MemoryStore,
        identity: Arc<dyn IdentityService>,
        clock: Arc<dyn Clock>,
        settings: Settings,
    ) -> Self {
        let store = Arc::new(store);

        let auth = AuthenticationServiceImpl::new(
            store.clone(),
            store.clone(),
            store.clone(),
            identity,
            clock.clone(),
        )
        .with_max_session_id_attempts(settings.auth.max_session_id_attempts);
        let threads = ThreadServiceImpl::new(store.clone(), store.clone(), clock.clone());
        let comments = CommentServiceImpl::new(store.clone(), store.clone(), clock);

        Self {
            auth: Arc::new(auth),
            threads: Arc::new(threads),
            comments: Arc::new(comments),
            health: store,
            settings: Arc::new(settings),
        }
    }
}

/// Router with the tracing and CORS layers applied.
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db).await?;
            tracing::info!("Database migrations applied");
        }

        let addr = settings.server_addr();
        let router = build_router(AppState::postgres(db, settings));

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
