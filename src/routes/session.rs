//! Session routes — login and signup server actions.
//!
//! Login stores the backend's token pair in two cookies: `refreshToken`
//! (read by the route guard as the session signal) and `accessToken` (sent
//! back as a bearer token on API calls). Neither is `HttpOnly`; browser
//! code reads the access token directly.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;

use crate::backend::BackendError;
use crate::backend::types::{Credentials, SignupForm, Validate};
use crate::guard::SESSION_COOKIE;
use crate::state::AppState;

pub const ACCESS_COOKIE: &str = "accessToken";

const LOGIN_FAILED: &str = "Email or password may be wrong.";
const SIGNUP_OK: &str = "User registration is success.";
const SIGNUP_FAILED: &str = "User with this email already exists.";
const BACKEND_UNAVAILABLE: &str = "Something went wrong. Please try again later.";

pub(crate) fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// `POST /api/session/login` — exchange credentials, set session cookies.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Json(credentials): Json<Credentials>) -> Response {
    match state.backend.login(&credentials).await {
        Ok(tokens) => {
            tracing::info!(username = %credentials.username, "login succeeded");
            let jar = jar
                .add(session_cookie(ACCESS_COOKIE, tokens.access, state.cookie_secure))
                .add(session_cookie(SESSION_COOKIE, tokens.refresh, state.cookie_secure));
            (jar, Json(json!({ "ok": true }))).into_response()
        }
        Err(BackendError::Status { status, .. }) => {
            tracing::warn!(username = %credentials.username, %status, "login rejected");
            (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false, "error": LOGIN_FAILED }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "login request failed");
            (StatusCode::BAD_GATEWAY, Json(json!({ "ok": false, "error": BACKEND_UNAVAILABLE }))).into_response()
        }
    }
}

/// `POST /api/session/signup` — validate and forward a registration.
pub async fn signup(State(state): State<AppState>, Json(form): Json<SignupForm>) -> Response {
    if let Err(e) = form.validate() {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": e.to_string() }))).into_response();
    }

    match state.backend.register(&form).await {
        Ok(()) => {
            tracing::info!(username = %form.username, "registration succeeded");
            (StatusCode::CREATED, Json(json!({ "ok": true, "message": SIGNUP_OK }))).into_response()
        }
        Err(BackendError::Status { status, .. }) => {
            tracing::warn!(username = %form.username, %status, "registration rejected");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": SIGNUP_FAILED }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "registration request failed");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": BACKEND_UNAVAILABLE }))).into_response()
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
