//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Posts ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Partial update; at least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entry of `GET /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comment_count: u64,
}

/// `GET /api/posts/{id}`: the post and all of its comments, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub comment_count: u64,
}

// --- Comments ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub blog_post_id: Uuid,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string of `GET /api/posts/{id}/comments`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CommentListQuery {
    #[serde(default)]
    pub approved_only: bool,
}

// --- Auth ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// `username` accepts either the username or the email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

// --- Health ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub storage: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_flattened() {
        let now = Utc::now();
        let summary = PostSummaryResponse {
            post: PostResponse {
                id: Uuid::nil(),
                title: "Hello".to_string(),
                content: "World".to_string(),
                created_at: now,
                updated_at: now,
            },
            comment_count: 2,
        };

        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["title"], "Hello");
        assert_eq!(value["comment_count"], 2);
        assert!(value.get("post").is_none());
    }

    #[test]
    fn test_comment_request_author_fields_optional() {
        let req: CreateCommentRequest = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();

        assert_eq!(req.content, "hi");
        assert!(req.author_name.is_none());
        assert!(req.author_email.is_none());
    }

    #[test]
    fn test_update_request_accepts_partial_body() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();

        assert_eq!(req.title.as_deref(), Some("New"));
        assert!(req.content.is_none());
    }
}
