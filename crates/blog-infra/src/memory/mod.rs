//! In-memory storage backend - used as fallback when PostgreSQL is unavailable.
//!
//! All three repositories share one set of tables behind a single lock, so
//! cross-table rules (cascading delete, parent checks) hold atomically.
//! Data is lost on process restart.

mod comments;
mod posts;
mod users;

use std::sync::Arc;

use tokio::sync::RwLock;

use blog_core::domain::{BlogPost, Comment, User};

pub use comments::InMemoryCommentRepository;
pub use posts::InMemoryBlogPostRepository;
pub use users::InMemoryUserRepository;

/// Rows kept in insertion order.
#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) posts: Vec<BlogPost>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) users: Vec<User>,
}

pub(crate) type SharedTables = Arc<RwLock<Tables>>;

/// Handle to an in-memory database. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: SharedTables,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blog_posts(&self) -> InMemoryBlogPostRepository {
        InMemoryBlogPostRepository::new(self.tables.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository::new(self.tables.clone())
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.tables.clone())
    }
}
