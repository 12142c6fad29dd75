use std::sync::Arc;

use uuid::Uuid;

use super::BLOG_POST;
use crate::domain::{BlogPost, PostChanges, PostStatistics, PostSummary, PostWithComments};
use crate::error::DomainError;
use crate::ports::{BlogPostRepository, CommentFilter, CommentRepository};

/// Blog post operations.
#[derive(Clone)]
pub struct BlogPostUseCases {
    posts: Arc<dyn BlogPostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl BlogPostUseCases {
    pub fn new(posts: Arc<dyn BlogPostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    pub async fn create_post(&self, title: String, content: String) -> Result<BlogPost, DomainError> {
        let post = BlogPost::new(title, content)?;
        let stored = self.posts.add(post).await?;

        tracing::info!(post_id = %stored.id, "Blog post created");
        Ok(stored)
    }

    /// Every post, newest first, with its comment count.
    pub async fn list_posts(&self) -> Result<Vec<PostSummary>, DomainError> {
        Ok(self.posts.list_with_comment_counts().await?)
    }

    /// A post with all of its comments, oldest first.
    pub async fn get_post(&self, id: Uuid) -> Result<PostWithComments, DomainError> {
        let post = self
            .posts
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(BLOG_POST, id))?;

        let comments = self.comments.list(CommentFilter::for_post(id)).await?;

        Ok(PostWithComments { post, comments })
    }

    pub async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<BlogPost, DomainError> {
        if changes.is_empty() {
            return Err(DomainError::validation(
                "At least one field (title or content) must be provided",
            ));
        }

        let mut post = self
            .posts
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(BLOG_POST, id))?;

        post.update(changes)?;

        let stored = self
            .posts
            .update(post)
            .await
            .map_err(|e| DomainError::from_repo(e, BLOG_POST, id))?;

        tracing::info!(post_id = %id, "Blog post updated");
        Ok(stored)
    }

    /// Delete a post; its comments go with it.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts
            .delete(id)
            .await
            .map_err(|e| DomainError::from_repo(e, BLOG_POST, id))?;

        tracing::info!(post_id = %id, "Blog post deleted");
        Ok(())
    }

    /// The `limit` newest posts.
    pub async fn recent_posts(&self, limit: u64) -> Result<Vec<BlogPost>, DomainError> {
        Ok(self.posts.recent(limit).await?)
    }

    /// Total post count and the `recent` newest posts.
    pub async fn statistics(&self, recent: u64) -> Result<PostStatistics, DomainError> {
        let total_posts = self.posts.count().await?;
        let recent_posts = self.posts.recent(recent).await?;

        Ok(PostStatistics {
            total_posts,
            recent_posts,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::Comment;
    use crate::error::RepoError;
    use crate::ports::BaseRepository;

    /// Storage whose every call fails with a connection error.
    struct Offline;

    fn offline() -> RepoError {
        RepoError::Connection("connection refused".to_string())
    }

    #[async_trait]
    impl BaseRepository<BlogPost, Uuid> for Offline {
        async fn add(&self, _: BlogPost) -> Result<BlogPost, RepoError> {
            Err(offline())
        }
        async fn get_by_id(&self, _: Uuid) -> Result<Option<BlogPost>, RepoError> {
            Err(offline())
        }
        async fn update(&self, _: BlogPost) -> Result<BlogPost, RepoError> {
            Err(offline())
        }
        async fn delete(&self, _: Uuid) -> Result<(), RepoError> {
            Err(offline())
        }
    }

    #[async_trait]
    impl BlogPostRepository for Offline {
        async fn list_with_comment_counts(&self) -> Result<Vec<PostSummary>, RepoError> {
            Err(offline())
        }
        async fn exists(&self, _: Uuid) -> Result<bool, RepoError> {
            Err(offline())
        }
        async fn count(&self) -> Result<u64, RepoError> {
            Err(offline())
        }
        async fn recent(&self, _: u64) -> Result<Vec<BlogPost>, RepoError> {
            Err(offline())
        }
    }

    #[async_trait]
    impl BaseRepository<Comment, Uuid> for Offline {
        async fn add(&self, _: Comment) -> Result<Comment, RepoError> {
            Err(offline())
        }
        async fn get_by_id(&self, _: Uuid) -> Result<Option<Comment>, RepoError> {
            Err(offline())
        }
        async fn update(&self, _: Comment) -> Result<Comment, RepoError> {
            Err(offline())
        }
        async fn delete(&self, _: Uuid) -> Result<(), RepoError> {
            Err(offline())
        }
    }

    #[async_trait]
    impl CommentRepository for Offline {
        async fn add_to_post(&self, _: Comment) -> Result<Comment, RepoError> {
            Err(offline())
        }
        async fn list(&self, _: CommentFilter) -> Result<Vec<Comment>, RepoError> {
            Err(offline())
        }
        async fn count_for_post(&self, _: Uuid) -> Result<u64, RepoError> {
            Err(offline())
        }
        async fn count(&self, _: CommentFilter) -> Result<u64, RepoError> {
            Err(offline())
        }
        async fn recent(&self, _: u64) -> Result<Vec<Comment>, RepoError> {
            Err(offline())
        }
    }

    fn use_cases() -> BlogPostUseCases {
        let repo = Arc::new(Offline);
        BlogPostUseCases::new(repo.clone(), repo)
    }

    #[tokio::test]
    async fn test_storage_outage_is_reported_not_swallowed() {
        let posts = use_cases();

        assert!(matches!(
            posts.list_posts().await,
            Err(DomainError::StorageUnavailable(_))
        ));
        assert!(matches!(
            posts.create_post("Hello".into(), "World".into()).await,
            Err(DomainError::StorageUnavailable(_))
        ));
        assert!(matches!(
            posts.delete_post(Uuid::new_v4()).await,
            Err(DomainError::StorageUnavailable(_))
        ));
        assert!(matches!(
            posts.statistics(5).await,
            Err(DomainError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_validation_runs_before_storage() {
        let posts = use_cases();

        let result = posts.create_post(String::new(), "World".into()).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let result = posts
            .update_post(Uuid::new_v4(), PostChanges::default())
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
