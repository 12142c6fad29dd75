//! Blog post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::domain::PostChanges;
use blog_shared::dto::{CreatePostRequest, UpdatePostRequest};

use super::convert::{post_detail_response, post_response, post_summary_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts().await?;

    Ok(HttpResponse::Ok().json(
        posts
            .into_iter()
            .map(post_summary_response)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/posts - Protected route
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state.posts.create_post(req.title, req.content).await?;

    tracing::debug!(user_id = %identity.user.id, post_id = %post.id, "Post created via API");
    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post_detail_response(post)))
}

/// PUT /api/posts/{id} - Protected route
pub async fn update_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
    };
    let post = state.posts.update_post(path.into_inner(), changes).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/posts/{id} - Protected route
pub async fn delete_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete_post(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
