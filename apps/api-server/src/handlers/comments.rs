//! Comment handlers. Commenting is open to anonymous visitors.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_shared::dto::{CommentListQuery, CreateCommentRequest};

use super::convert::comment_response;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let comment = state
        .comments
        .add_comment(path.into_inner(), req.content, req.author_name, req.author_email)
        .await?;

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// GET /api/posts/{id}/comments?approved_only=true
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<CommentListQuery>,
) -> AppResult<HttpResponse> {
    let comments = state
        .comments
        .list_comments(path.into_inner(), query.approved_only)
        .await?;

    Ok(HttpResponse::Ok().json(
        comments
            .into_iter()
            .map(comment_response)
            .collect::<Vec<_>>(),
    ))
}
