use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comment::Comment;
use crate::error::DomainError;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// BlogPost entity - a published article that owns its comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl BlogPost {
    /// Create a new post with a fresh id and identical timestamps.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let title = validate_title(title.into())?;
        let content = validate_content(content.into())?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            content,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply `changes`. Either every provided field is valid and applied, or nothing changes.
    pub fn update(&mut self, changes: PostChanges) -> Result<(), DomainError> {
        let title = changes.title.map(validate_title).transpose()?;
        let content = changes.content.map(validate_content).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_title(title: String) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("Title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation(format!(
            "Title cannot exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

/// Blank content is rejected, otherwise the text is kept byte for byte.
fn validate_content(content: String) -> Result<String, DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("Content cannot be empty"));
    }
    Ok(content)
}

/// A post as shown in listings, with its live comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: BlogPost,
    pub comment_count: u64,
}

/// A post together with its comments, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithComments {
    pub post: BlogPost,
    pub comments: Vec<Comment>,
}

impl PostWithComments {
    pub fn comment_count(&self) -> u64 {
        self.comments.len() as u64
    }
}

/// Totals plus the latest posts, for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostStatistics {
    pub total_posts: u64,
    pub recent_posts: Vec<BlogPost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_sets_matching_timestamps() {
        let post = BlogPost::new("Hello", "World").unwrap();

        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn test_new_post_ids_are_unique() {
        let a = BlogPost::new("A", "B").unwrap();
        let b = BlogPost::new("A", "B").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_rejects_blank_title_and_content() {
        assert!(matches!(
            BlogPost::new("   ", "body"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            BlogPost::new("title", ""),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_content_whitespace_is_preserved() {
        let body = "    fn main() {}\n\nIndented code block above.\n";
        let mut post = BlogPost::new("Hello", body).unwrap();
        assert_eq!(post.content, body);

        let edited = "\n  - item\n";
        post.update(PostChanges {
            title: None,
            content: Some(edited.into()),
        })
        .unwrap();
        assert_eq!(post.content, edited);
    }

    #[test]
    fn test_title_length_limit_counts_characters() {
        let max = "é".repeat(MAX_TITLE_LEN);
        assert!(BlogPost::new(max, "body").is_ok());

        let too_long = "a".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(
            BlogPost::new(too_long, "body"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_update_keeps_omitted_fields() {
        let mut post = BlogPost::new("Title", "Body").unwrap();
        let before = post.updated_at;

        post.update(PostChanges {
            title: Some("New title".into()),
            content: None,
        })
        .unwrap();

        assert_eq!(post.title, "New title");
        assert_eq!(post.content, "Body");
        assert!(post.updated_at >= before);
    }

    #[test]
    fn test_failed_update_changes_nothing() {
        let mut post = BlogPost::new("Title", "Body").unwrap();
        let snapshot = post.clone();

        let result = post.update(PostChanges {
            title: Some("Fine".into()),
            content: Some("  ".into()),
        });

        assert!(result.is_err());
        assert_eq!(post, snapshot);
    }
}
