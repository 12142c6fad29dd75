use async_trait::async_trait;
use uuid::Uuid;

use blog_core::domain::Comment;
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentFilter, CommentRepository};

use super::{SharedTables, Tables};

/// In-memory comment repository.
#[derive(Clone)]
pub struct InMemoryCommentRepository {
    tables: SharedTables,
}

impl InMemoryCommentRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

fn has_post(tables: &Tables, id: Uuid) -> bool {
    tables.posts.iter().any(|p| p.id == id)
}

fn matches(filter: &CommentFilter, comment: &Comment) -> bool {
    filter.blog_post_id.is_none_or(|id| comment.blog_post_id == id)
        && filter.approved.is_none_or(|a| comment.is_approved == a)
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn add(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !has_post(&tables, comment.blog_post_id) {
            return Err(RepoError::Constraint(format!(
                "blog post {} does not exist",
                comment.blog_post_id
            )));
        }
        if tables.comments.iter().any(|c| c.id == comment.id) {
            return Err(RepoError::Constraint(format!(
                "duplicate comment id {}",
                comment.id
            )));
        }
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn add_to_post(&self, comment: Comment) -> Result<Comment, RepoError> {
        // Check and insert under one write guard.
        let mut tables = self.tables.write().await;
        if !has_post(&tables, comment.blog_post_id) {
            return Err(RepoError::NotFound);
        }
        if tables.comments.iter().any(|c| c.id == comment.id) {
            return Err(RepoError::Constraint(format!(
                "duplicate comment id {}",
                comment.id
            )));
        }
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list(&self, filter: CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut found: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| matches(&filter, c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn count_for_post(&self, blog_post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.blog_post_id == blog_post_id)
            .count() as u64)
    }

    async fn count(&self, filter: CommentFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().filter(|c| matches(&filter, c)).count() as u64)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;

        let mut found: Vec<&Comment> = tables.comments.iter().rev().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(found
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
