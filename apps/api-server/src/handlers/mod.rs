//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod convert;
mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::bad_request_handler;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(bad_request_handler))
        .app_data(web::PathConfig::default().error_handler(bad_request_handler))
        .app_data(web::QueryConfig::default().error_handler(bad_request_handler))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}", web::put().to(posts::update_post))
                        .route("/{id}", web::delete().to(posts::delete_post))
                        .route("/{id}/comments", web::post().to(comments::add_comment))
                        .route("/{id}/comments", web::get().to(comments::list_comments)),
                )
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me))
                        .route("/change-password", web::post().to(auth::change_password)),
                ),
        );
}

#[cfg(test)]
mod tests;
