use async_trait::async_trait;
use uuid::Uuid;

use blog_core::domain::{BlogPost, PostSummary};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, BlogPostRepository};

use super::SharedTables;

/// In-memory blog post repository.
#[derive(Clone)]
pub struct InMemoryBlogPostRepository {
    tables: SharedTables,
}

impl InMemoryBlogPostRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl BaseRepository<BlogPost, Uuid> for InMemoryBlogPostRepository {
    async fn add(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint(format!(
                "duplicate blog post id {}",
                post.id
            )));
        }
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, post: BlogPost) -> Result<BlogPost, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(RepoError::NotFound);
        }

        // Cascade, same as the ON DELETE CASCADE foreign key.
        let comments_before = tables.comments.len();
        tables.comments.retain(|c| c.blog_post_id != id);
        tracing::debug!(
            post_id = %id,
            removed_comments = comments_before - tables.comments.len(),
            "Deleted blog post"
        );
        Ok(())
    }
}

#[async_trait]
impl BlogPostRepository for InMemoryBlogPostRepository {
    async fn list_with_comment_counts(&self) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.tables.read().await;

        // Reverse first so equal timestamps keep newest-inserted first after the stable sort.
        let mut posts: Vec<&BlogPost> = tables.posts.iter().rev().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts
            .into_iter()
            .map(|post| PostSummary {
                post: post.clone(),
                comment_count: tables
                    .comments
                    .iter()
                    .filter(|c| c.blog_post_id == post.id)
                    .count() as u64,
            })
            .collect())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().any(|p| p.id == id))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.posts.len() as u64)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<BlogPost>, RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&BlogPost> = tables.posts.iter().rev().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use blog_core::domain::Comment;
    use blog_core::ports::CommentRepository;

    use super::*;
    use crate::memory::InMemoryStore;

    #[tokio::test]
    async fn test_add_and_get() {
        let repo = InMemoryStore::new().blog_posts();
        let post = BlogPost::new("Hello", "World").unwrap();

        repo.add(post.clone()).await.unwrap();

        assert_eq!(repo.get_by_id(post.id).await.unwrap(), Some(post.clone()));
        assert!(repo.exists(post.id).await.unwrap());
        assert!(!repo.exists(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let repo = InMemoryStore::new().blog_posts();
        let post = BlogPost::new("Hello", "World").unwrap();

        repo.add(post.clone()).await.unwrap();
        let result = repo.add(post).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let repo = InMemoryStore::new().blog_posts();
        let post = BlogPost::new("Ghost", "Never stored").unwrap();

        assert!(matches!(repo.update(post).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_comments() {
        let store = InMemoryStore::new();
        let posts = store.blog_posts();
        let comments = store.comments();

        let doomed = posts.add(BlogPost::new("Doomed", "x").unwrap()).await.unwrap();
        let kept = posts.add(BlogPost::new("Kept", "y").unwrap()).await.unwrap();
        for post_id in [doomed.id, doomed.id, kept.id] {
            let comment = Comment::new(post_id, "hi", None, None).unwrap();
            comments.add_to_post(comment).await.unwrap();
        }

        posts.delete(doomed.id).await.unwrap();

        assert_eq!(comments.count_for_post(doomed.id).await.unwrap(), 0);
        assert_eq!(comments.count_for_post(kept.id).await.unwrap(), 1);
        assert!(matches!(
            posts.delete(doomed.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_counts() {
        let store = InMemoryStore::new();
        let posts = store.blog_posts();
        let comments = store.comments();

        let first = posts.add(BlogPost::new("First", "a").unwrap()).await.unwrap();
        let second = posts.add(BlogPost::new("Second", "b").unwrap()).await.unwrap();
        comments
            .add_to_post(Comment::new(first.id, "nice", None, None).unwrap())
            .await
            .unwrap();

        let summaries = posts.list_with_comment_counts().await.unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].post.id, second.id);
        assert_eq!(summaries[0].comment_count, 0);
        assert_eq!(summaries[1].post.id, first.id);
        assert_eq!(summaries[1].comment_count, 1);
    }

    #[tokio::test]
    async fn test_count_and_recent() {
        let repo = InMemoryStore::new().blog_posts();
        let mut ids = Vec::new();
        for title in ["One", "Two", "Three"] {
            ids.push(repo.add(BlogPost::new(title, "x").unwrap()).await.unwrap().id);
        }

        assert_eq!(repo.count().await.unwrap(), 3);

        let recent = repo.recent(2).await.unwrap();
        assert_eq!(
            recent.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ids[2], ids[1]]
        );
        assert!(repo.recent(0).await.unwrap().is_empty());
    }
}
