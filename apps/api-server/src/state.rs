//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{
    BlogPostRepository, CommentRepository, PasswordService, TokenService, UserRepository,
};
use blog_core::use_cases::{AuthUseCases, BlogPostUseCases, CommentUseCases};
use blog_infra::{Argon2PasswordService, DatabaseConnections, InMemoryStore, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
use blog_infra::{PostgresBlogPostRepository, PostgresCommentRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: BlogPostUseCases,
    pub comments: CommentUseCases,
    pub auth: AuthUseCases,
    /// `None` when serving from the in-memory store.
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Wire the use cases onto PostgreSQL when `db` is given, otherwise onto a
    /// fresh in-memory store.
    pub fn new(db: Option<Arc<DatabaseConnections>>, jwt: JwtConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(jwt));

        #[cfg(feature = "postgres")]
        if let Some(db) = db {
            let posts = Arc::new(PostgresBlogPostRepository::new(db.main.clone()));
            let comments = Arc::new(PostgresCommentRepository::new(db.main.clone()));
            let users = Arc::new(PostgresUserRepository::new(db.main.clone()));
            tracing::info!(storage = "postgres", "Application state initialized");
            return Self::assemble(posts, comments, users, passwords, tokens, Some(db));
        }

        #[cfg(not(feature = "postgres"))]
        if db.is_some() {
            tracing::warn!("Built without the postgres feature - ignoring database handle");
        }

        let store = InMemoryStore::new();
        tracing::info!(storage = "memory", "Application state initialized");
        Self::assemble(
            Arc::new(store.blog_posts()),
            Arc::new(store.comments()),
            Arc::new(store.users()),
            passwords,
            tokens,
            None,
        )
    }

    /// State backed by an empty in-memory store.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::new(None, jwt)
    }

    fn assemble(
        posts: Arc<dyn BlogPostRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        db: Option<Arc<DatabaseConnections>>,
    ) -> Self {
        Self {
            posts: BlogPostUseCases::new(posts.clone(), comments.clone()),
            comments: CommentUseCases::new(comments, posts),
            auth: AuthUseCases::new(users, passwords, tokens),
            db,
        }
    }

    pub fn storage_name(&self) -> &'static str {
        if self.db.is_some() { "postgres" } else { "memory" }
    }

    /// Storage round trip; the in-memory store is always reachable.
    pub async fn storage_healthy(&self) -> bool {
        match &self.db {
            Some(db) => db.is_healthy().await,
            None => true,
        }
    }
}

/// Open the database pool described by `config`, applying migrations when
/// asked. Any failure falls back to the in-memory store.
#[cfg(feature = "postgres")]
pub async fn connect_storage(config: &AppConfig) -> Option<Arc<DatabaseConnections>> {
    use migration::MigratorTrait;

    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return None;
    };

    let connections = match DatabaseConnections::init(db_config).await {
        Ok(connections) => connections,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return None;
        }
    };

    if config.run_migrations {
        match migration::Migrator::up(&connections.main, None).await {
            Ok(()) => tracing::info!("Database migrations applied"),
            Err(e) => tracing::error!(error = %e, "Failed to apply database migrations"),
        }
    }

    Some(Arc::new(connections))
}

#[cfg(not(feature = "postgres"))]
pub async fn connect_storage(config: &AppConfig) -> Option<Arc<DatabaseConnections>> {
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory repositories");
    None
}
