use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BlogPost, Comment, PostSummary, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Insert a new entity and return it as stored.
    async fn add(&self, entity: T) -> Result<T, RepoError>;

    /// Find an entity by its unique ID.
    async fn get_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. `RepoError::NotFound` if nothing was deleted.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Blog post repository.
///
/// Deleting a post must also remove its comments, whatever the backend.
#[async_trait]
pub trait BlogPostRepository: BaseRepository<BlogPost, Uuid> {
    /// All posts, newest first, each with its live comment count.
    async fn list_with_comment_counts(&self) -> Result<Vec<PostSummary>, RepoError>;

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;

    /// Up to `limit` posts, newest first.
    async fn recent(&self, limit: u64) -> Result<Vec<BlogPost>, RepoError>;
}

/// Selects which comments [`CommentRepository::list`] returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentFilter {
    pub blog_post_id: Option<Uuid>,
    pub approved: Option<bool>,
}

impl CommentFilter {
    pub fn for_post(blog_post_id: Uuid) -> Self {
        Self {
            blog_post_id: Some(blog_post_id),
            approved: None,
        }
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Insert `comment` only if its parent post exists, as one atomic step.
    /// Returns `RepoError::NotFound` when the post is missing.
    async fn add_to_post(&self, comment: Comment) -> Result<Comment, RepoError>;

    /// Comments matching `filter`, oldest first.
    async fn list(&self, filter: CommentFilter) -> Result<Vec<Comment>, RepoError>;

    async fn count_for_post(&self, blog_post_id: Uuid) -> Result<u64, RepoError>;

    async fn count(&self, filter: CommentFilter) -> Result<u64, RepoError>;

    /// Up to `limit` comments across all posts, newest first.
    async fn recent(&self, limit: u64) -> Result<Vec<Comment>, RepoError>;
}

/// Selects which users [`UserRepository::list`] returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter {
    pub active: Option<bool>,
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address (compared lower-cased).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;

    /// Users matching `filter`, newest first.
    async fn list(&self, filter: UserFilter) -> Result<Vec<User>, RepoError>;
}
