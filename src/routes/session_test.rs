use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::routing::post;
use tower::ServiceExt;

use super::*;
use crate::state::test_helpers::{MockBackend, test_app_state};

fn router(backend: Arc<MockBackend>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .with_state(test_app_state(backend))
}

async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect()
}

fn signup_body() -> serde_json::Value {
    serde_json::json!({
        "username": "jane@example.com",
        "password": "longenough",
        "password2": "longenough",
        "first_name": "Jane",
        "last_name": "Doe",
    })
}

// =============================================================================
// session_cookie
// =============================================================================

#[test]
fn session_cookie_attributes() {
    let cookie = session_cookie(ACCESS_COOKIE, "tok".into(), true);
    assert_eq!(cookie.name(), "accessToken");
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_ne!(cookie.http_only(), Some(true));
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_sets_both_cookies() {
    let backend = Arc::new(MockBackend::default());
    let response = post_json(
        router(backend.clone()),
        "/login",
        serde_json::json!({ "username": "jane", "password": "pw" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("accessToken=access-jane")), "{cookies:?}");
    assert!(cookies.iter().any(|c| c.starts_with("refreshToken=refresh-1")), "{cookies:?}");
    assert_eq!(body_json(response).await["ok"], true);
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn login_rejected_sets_no_cookies() {
    let backend = Arc::new(MockBackend::failing(BackendError::Status { status: 400, body: String::new() }));
    let response = post_json(router(backend), "/login", serde_json::json!({ "username": "jane", "password": "x" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Email or password may be wrong.");
}

#[tokio::test]
async fn login_transport_failure_is_bad_gateway() {
    let backend = Arc::new(MockBackend::failing(BackendError::Request("connection refused".into())));
    let response = post_json(router(backend), "/login", serde_json::json!({ "username": "jane", "password": "x" })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"], BACKEND_UNAVAILABLE);
}

#[tokio::test]
async fn login_unreadable_reply_does_not_blame_credentials() {
    let backend = Arc::new(MockBackend::failing(BackendError::Parse("missing field `access`".into())));
    let response = post_json(router(backend), "/login", serde_json::json!({ "username": "jane", "password": "pw" })).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(set_cookies(&response).is_empty());
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_ne!(body["error"], LOGIN_FAILED);
    assert_eq!(body["error"], BACKEND_UNAVAILABLE);
}

// =============================================================================
// signup
// =============================================================================

#[tokio::test]
async fn signup_success() {
    let backend = Arc::new(MockBackend::default());
    let response = post_json(router(backend.clone()), "/signup", signup_body()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["message"], "User registration is success.");
    let bodies = backend.bodies.lock().unwrap().clone();
    assert_eq!(bodies[0]["first_name"], "Jane");
}

#[tokio::test]
async fn signup_short_password_never_reaches_backend() {
    let backend = Arc::new(MockBackend::default());
    let mut body = signup_body();
    body["password"] = "short".into();
    body["password2"] = "short".into();
    let response = post_json(router(backend.clone()), "/signup", body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"], "Password must be at least 8 characters long.");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn signup_mismatched_passwords() {
    let mut body = signup_body();
    body["password2"] = "different-one".into();
    let response = post_json(router(Arc::new(MockBackend::default())), "/signup", body).await;
    assert_eq!(body_json(response).await["error"], "Passwords don't match!");
}

#[tokio::test]
async fn signup_backend_rejection() {
    let backend = Arc::new(MockBackend::failing(BackendError::Status { status: 400, body: "{}".into() }));
    let response = post_json(router(backend), "/signup", signup_body()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "User with this email already exists.");
}

#[tokio::test]
async fn signup_transport_failure_is_bad_gateway() {
    let backend = Arc::new(MockBackend::failing(BackendError::Request("timed out".into())));
    let response = post_json(router(backend), "/signup", signup_body()).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"], BACKEND_UNAVAILABLE);
}
