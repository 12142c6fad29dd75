//! Authentication handlers.

use actix_web::{HttpResponse, web};

use blog_core::use_cases::RegisterUser;
use blog_shared::MessageResponse;
use blog_shared::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterUserRequest};

use super::convert::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .auth
        .register(RegisterUser {
            username: req.username,
            email: req.email,
            password: req.password,
            full_name: req.full_name,
        })
        .await?;

    Ok(HttpResponse::Created().json(user_response(user)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state.auth.authenticate(&req.username, &req.password).await?;
    let issued = state.auth.issue_token(user)?;

    tracing::info!(user_id = %issued.user.id, "User logged in");
    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: issued.access_token,
        token_type: issued.token_type.to_string(),
        expires_in: issued.expires_in,
        user: user_response(issued.user),
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(user_response(identity.user)))
}

/// POST /api/auth/change-password - Protected route
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    state
        .auth
        .change_password(identity.user.id, &req.current_password, &req.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password changed successfully")))
}
