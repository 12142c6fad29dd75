use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

pub const DEFAULT_AUTHOR_NAME: &str = "Anonymous";
pub const MAX_COMMENT_LEN: usize = 1000;
pub const MAX_AUTHOR_NAME_LEN: usize = 100;
pub const MAX_AUTHOR_EMAIL_LEN: usize = 255;

/// Comment entity - always attached to exactly one blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub blog_post_id: Uuid,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a comment.
#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

impl Comment {
    /// Create a comment for `blog_post_id`. Missing author fields fall back to
    /// `"Anonymous"` and an empty email.
    pub fn new(
        blog_post_id: Uuid,
        content: impl Into<String>,
        author_name: Option<String>,
        author_email: Option<String>,
    ) -> Result<Self, DomainError> {
        let content = validate_content(content.into())?;
        let author_name = validate_author_name(author_name.unwrap_or_default())?;
        let author_email = validate_author_email(author_email.unwrap_or_default())?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            blog_post_id,
            content,
            author_name,
            author_email,
            is_approved: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(&mut self, changes: CommentChanges) -> Result<(), DomainError> {
        let content = changes.content.map(validate_content).transpose()?;
        let author_name = changes.author_name.map(validate_author_name).transpose()?;
        let author_email = changes.author_email.map(validate_author_email).transpose()?;

        if let Some(content) = content {
            self.content = content;
        }
        if let Some(name) = author_name {
            self.author_name = name;
        }
        if let Some(email) = author_email {
            self.author_email = email;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn approve(&mut self) {
        if !self.is_approved {
            self.is_approved = true;
            self.updated_at = Utc::now();
        }
    }

    pub fn reject(&mut self) {
        if self.is_approved {
            self.is_approved = false;
            self.updated_at = Utc::now();
        }
    }
}

/// Moderation decision applied to a batch of comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentStatistics {
    pub total_comments: u64,
    pub pending_approval: u64,
    pub recent_comments: Vec<Comment>,
}

fn validate_content(content: String) -> Result<String, DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("Comment content cannot be empty"));
    }
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(DomainError::validation(format!(
            "Comment content cannot exceed {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(content)
}

fn validate_author_name(name: String) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(DEFAULT_AUTHOR_NAME.to_string());
    }
    if name.chars().count() > MAX_AUTHOR_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Author name cannot exceed {MAX_AUTHOR_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_author_email(email: String) -> Result<String, DomainError> {
    let email = email.trim();
    if email.chars().count() > MAX_AUTHOR_EMAIL_LEN {
        return Err(DomainError::validation(format!(
            "Author email cannot exceed {MAX_AUTHOR_EMAIL_LEN} characters"
        )));
    }
    if !email.is_empty() && !email.contains('@') {
        return Err(DomainError::validation(
            "Author email must be a valid email address",
        ));
    }
    Ok(email.to_string())
}
