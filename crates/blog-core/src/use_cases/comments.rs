use std::sync::Arc;

use uuid::Uuid;

use super::{BLOG_POST, COMMENT};
use crate::domain::{Comment, CommentChanges, CommentStatistics, ModerationAction};
use crate::error::DomainError;
use crate::ports::{BlogPostRepository, CommentFilter, CommentRepository};

/// Comment operations.
#[derive(Clone)]
pub struct CommentUseCases {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn BlogPostRepository>,
}

impl CommentUseCases {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn BlogPostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Attach a new comment to `post_id`.
    ///
    /// The insert re-checks the post inside the same storage transaction, so a
    /// post deleted after the first check still yields `NotFound` and no comment.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        content: String,
        author_name: Option<String>,
        author_email: Option<String>,
    ) -> Result<Comment, DomainError> {
        if !self.posts.exists(post_id).await? {
            return Err(DomainError::not_found(BLOG_POST, post_id));
        }

        let comment = Comment::new(post_id, content, author_name, author_email)?;
        let stored = self
            .comments
            .add_to_post(comment)
            .await
            .map_err(|e| DomainError::from_repo(e, BLOG_POST, post_id))?;

        tracing::info!(post_id = %post_id, comment_id = %stored.id, "Comment added");
        Ok(stored)
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(COMMENT, id))
    }

    /// Comments of one post, oldest first.
    pub async fn list_comments(
        &self,
        post_id: Uuid,
        approved_only: bool,
    ) -> Result<Vec<Comment>, DomainError> {
        if !self.posts.exists(post_id).await? {
            return Err(DomainError::not_found(BLOG_POST, post_id));
        }

        let mut filter = CommentFilter::for_post(post_id);
        if approved_only {
            filter = filter.approved(true);
        }
        Ok(self.comments.list(filter).await?)
    }

    /// Comments across all posts waiting for approval, oldest first.
    pub async fn list_pending(&self) -> Result<Vec<Comment>, DomainError> {
        Ok(self
            .comments
            .list(CommentFilter::default().approved(false))
            .await?)
    }

    pub async fn update_comment(
        &self,
        id: Uuid,
        changes: CommentChanges,
    ) -> Result<Comment, DomainError> {
        let mut comment = self.get_comment(id).await?;
        comment.update(changes)?;
        self.store(comment).await
    }

    pub async fn approve_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        let mut comment = self.get_comment(id).await?;
        comment.approve();
        self.store(comment).await
    }

    pub async fn reject_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        let mut comment = self.get_comment(id).await?;
        comment.reject();
        self.store(comment).await
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<(), DomainError> {
        self.comments
            .delete(id)
            .await
            .map_err(|e| DomainError::from_repo(e, COMMENT, id))?;

        tracing::info!(comment_id = %id, "Comment deleted");
        Ok(())
    }

    /// Apply `action` to every comment in `ids`.
    ///
    /// All ids are resolved before anything is written, so a missing id
    /// yields `NotFound` and leaves every comment untouched.
    pub async fn moderate_batch(
        &self,
        ids: &[Uuid],
        action: ModerationAction,
    ) -> Result<Vec<Comment>, DomainError> {
        let mut batch = Vec::with_capacity(ids.len());
        for &id in ids {
            batch.push(self.get_comment(id).await?);
        }

        let mut moderated = Vec::with_capacity(batch.len());
        for mut comment in batch {
            match action {
                ModerationAction::Approve => comment.approve(),
                ModerationAction::Reject => comment.reject(),
            }
            moderated.push(self.store(comment).await?);
        }

        tracing::info!(count = moderated.len(), ?action, "Comments moderated");
        Ok(moderated)
    }

    /// The `limit` newest comments across all posts.
    pub async fn recent_comments(&self, limit: u64) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.recent(limit).await?)
    }

    pub async fn statistics(&self, recent: u64) -> Result<CommentStatistics, DomainError> {
        let total_comments = self.comments.count(CommentFilter::default()).await?;
        let pending_approval = self
            .comments
            .count(CommentFilter::default().approved(false))
            .await?;
        let recent_comments = self.comments.recent(recent).await?;

        Ok(CommentStatistics {
            total_comments,
            pending_approval,
            recent_comments,
        })
    }

    async fn store(&self, comment: Comment) -> Result<Comment, DomainError> {
        let id = comment.id;
        self.comments
            .update(comment)
            .await
            .map_err(|e| DomainError::from_repo(e, COMMENT, id))
    }
}
