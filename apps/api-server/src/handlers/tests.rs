use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use blog_infra::JwtConfig;

use super::configure_routes;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::AppState;

const PASSWORD: &str = "Sup3r!secret";

fn test_state() -> AppState {
    AppState::in_memory(JwtConfig {
        secret: "handler-test-secret".to_string(),
        ..JwtConfig::default()
    })
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

/// Register `alice` and evaluate to a bearer token for her.
macro_rules! login {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": PASSWORD,
            }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "alice", "password": PASSWORD }))
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        assert_eq!(body["token_type"], "Bearer");

        body["access_token"].as_str().unwrap().to_string()
    }};
}

#[actix_rt::test]
async fn test_health_reports_memory_storage() {
    let app = test_app!(test_state());

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}

#[actix_rt::test]
async fn test_request_id_is_echoed() {
    let app = test_app!(test_state());

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((REQUEST_ID_HEADER, "trace-me"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "trace-me");
}

#[actix_rt::test]
async fn test_writes_require_bearer_token() {
    let app = test_app!(test_state());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "title": "Hello", "content": "World" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .set_json(json!({ "title": "Hello", "content": "World" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_expired_token_gets_its_own_problem_title() {
    let app = test_app!(AppState::in_memory(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_minutes: -5,
        ..JwtConfig::default()
    }));
    let token = login!(&app);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["title"], "Token Expired");
}

#[actix_rt::test]
async fn test_post_and_comment_lifecycle() {
    let app = test_app!(test_state());
    let token = login!(&app);
    let bearer = ("Authorization", format!("Bearer {token}"));

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer.clone())
        .set_json(json!({ "title": "Hello", "content": "World" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    let post_id = post["id"].as_str().unwrap().to_string();
    assert_eq!(post["created_at"], post["updated_at"]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["title"], "Hello");
    assert_eq!(detail["content"], "World");
    assert_eq!(detail["comments"], json!([]));

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .set_json(json!({ "content": "First!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Value = test::read_body_json(resp).await;
    assert_eq!(comment["author_name"], "Anonymous");
    assert_eq!(comment["author_email"], "");

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["id"], post["id"]);
    assert_eq!(listed[0]["comment_count"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["comment_count"], 1);
    assert_eq!(detail["comments"][0]["id"], comment["id"]);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(bearer.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    // Error responses are correlated through the header, not the body.
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["status"], 404);
    assert!(problem.get("request_id").is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_update_post() {
    let app = test_app!(test_state());
    let token = login!(&app);
    let bearer = ("Authorization", format!("Bearer {token}"));

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer.clone())
        .set_json(json!({ "title": "Draft", "content": "Body" }))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer.clone())
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer.clone())
        .set_json(json!({ "title": "Final" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["content"], "Body");
}

#[actix_rt::test]
async fn test_bad_input_is_a_problem_document() {
    let app = test_app!(test_state());
    let token = login!(&app);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "title": "   ", "content": "World" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["title"], "Bad Request");

    let req = test::TestRequest::get().uri("/api/posts/not-a-uuid").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app!(test_state());
    login!(&app);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "alice_again",
            "email": "ALICE@example.com",
            "password": PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_me_and_change_password() {
    let app = test_app!(test_state());
    let token = login!(&app);
    let bearer = ("Authorization", format!("Bearer {token}"));

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer.clone())
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["username"], "alice");
    assert!(me.get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/change-password")
        .insert_header(bearer.clone())
        .set_json(json!({ "current_password": "Wr0ng!pass", "new_password": "N3w!secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/auth/change-password")
        .insert_header(bearer.clone())
        .set_json(json!({ "current_password": PASSWORD, "new_password": "N3w!secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "alice@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_comments_filtered_by_approval() {
    let state = test_state();
    let app = test_app!(state.clone());
    let token = login!(&app);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "title": "T", "content": "C" }))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/posts/{}/comments", post["id"].as_str().unwrap());

    for content in ["kept", "hidden"] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({ "content": content, "author_name": "Bo" }))
            .to_request();
        let comment: Value = test::call_and_read_body_json(&app, req).await;
        if content == "hidden" {
            let id = comment["id"].as_str().unwrap().parse().unwrap();
            state.comments.reject_comment(id).await.unwrap();
        }
    }

    let req = test::TestRequest::get()
        .uri(&format!("{uri}?approved_only=true"))
        .to_request();
    let visible: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(visible.as_array().unwrap().len(), 1);
    assert_eq!(visible[0]["content"], "kept");

    let req = test::TestRequest::get().uri(&uri).to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}
