//! Domain -> wire type conversions.

use blog_core::domain::{BlogPost, Comment, PostSummary, PostWithComments, User};
use blog_shared::dto::{
    CommentResponse, PostDetailResponse, PostResponse, PostSummaryResponse, UserResponse,
};

pub(crate) fn post_response(post: BlogPost) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub(crate) fn post_summary_response(summary: PostSummary) -> PostSummaryResponse {
    PostSummaryResponse {
        post: post_response(summary.post),
        comment_count: summary.comment_count,
    }
}

pub(crate) fn post_detail_response(detail: PostWithComments) -> PostDetailResponse {
    let comment_count = detail.comment_count();
    PostDetailResponse {
        post: post_response(detail.post),
        comments: detail.comments.into_iter().map(comment_response).collect(),
        comment_count,
    }
}

pub(crate) fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        blog_post_id: comment.blog_post_id,
        content: comment.content,
        author_name: comment.author_name,
        author_email: comment.author_email,
        is_approved: comment.is_approved,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub(crate) fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        is_active: user.is_active,
        is_superuser: user.is_superuser,
        created_at: user.created_at,
    }
}
