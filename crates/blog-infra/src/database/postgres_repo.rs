//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{BlogPost, Comment, PostSummary, User};
use blog_core::error::RepoError;
use blog_core::ports::{
    BlogPostRepository, CommentFilter, CommentRepository, UserFilter, UserRepository,
};

use super::entity::blog_post::{self, Entity as BlogPostEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL blog post repository.
pub type PostgresBlogPostRepository = PostgresBaseRepository<BlogPostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// Row shape of the post listing query: post columns plus the aggregated count.
#[derive(Debug, FromQueryResult)]
struct PostWithCommentCount {
    id: Uuid,
    title: String,
    content: String,
    created_at: DateTimeWithTimeZone,
    updated_at: DateTimeWithTimeZone,
    comment_count: i64,
}

impl From<PostWithCommentCount> for PostSummary {
    fn from(row: PostWithCommentCount) -> Self {
        Self {
            post: BlogPost {
                id: row.id,
                title: row.title,
                content: row.content,
                created_at: row.created_at.into(),
                updated_at: row.updated_at.into(),
            },
            comment_count: row.comment_count.max(0) as u64,
        }
    }
}

#[async_trait]
impl BlogPostRepository for PostgresBlogPostRepository {
    async fn list_with_comment_counts(&self) -> Result<Vec<PostSummary>, RepoError> {
        tracing::debug!("Listing blog posts with comment counts");

        // One LEFT JOIN + GROUP BY instead of a count query per post.
        let rows = BlogPostEntity::find()
            .column_as(comment::Column::Id.count(), "comment_count")
            .join(JoinType::LeftJoin, blog_post::Relation::Comments.def())
            .group_by(blog_post::Column::Id)
            .order_by_desc(blog_post::Column::CreatedAt)
            .into_model::<PostWithCommentCount>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        let found = BlogPostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.is_some())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        BlogPostEntity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<BlogPost>, RepoError> {
        let result = BlogPostEntity::find()
            .order_by_desc(blog_post::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn add_to_post(&self, new_comment: Comment) -> Result<Comment, RepoError> {
        let post_id = new_comment.blog_post_id;
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // FOR SHARE keeps the parent from being deleted until we commit.
        let parent = BlogPostEntity::find_by_id(post_id)
            .lock_shared()
            .one(&txn)
            .await
            .map_err(map_db_err)?;

        if parent.is_none() {
            txn.rollback().await.map_err(map_db_err)?;
            tracing::debug!(post_id = %post_id, "Parent post missing, comment rejected");
            return Err(RepoError::NotFound);
        }

        let model = comment::ActiveModel::from(new_comment)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn list(&self, filter: CommentFilter) -> Result<Vec<Comment>, RepoError> {
        tracing::debug!(?filter, "Listing comments");

        let result = filtered_comments(filter)
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_for_post(&self, blog_post_id: Uuid) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::BlogPostId.eq(blog_post_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn count(&self, filter: CommentFilter) -> Result<u64, RepoError> {
        filtered_comments(filter)
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .order_by_desc(comment::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

fn filtered_comments(filter: CommentFilter) -> Select<CommentEntity> {
    let mut query = CommentEntity::find();
    if let Some(post_id) = filter.blog_post_id {
        query = query.filter(comment::Column::BlogPostId.eq(post_id));
    }
    if let Some(approved) = filter.approved {
        query = query.filter(comment::Column::IsApproved.eq(approved));
    }
    query
}

fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn list(&self, filter: UserFilter) -> Result<Vec<User>, RepoError> {
        let mut query = UserEntity::find();
        if let Some(active) = filter.active {
            query = query.filter(user::Column::IsActive.eq(active));
        }

        let result = query
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
