//! Axum middleware that applies the route guard to every navigation.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use super::{GuardDecision, SESSION_COOKIE, normalize_path};
use crate::state::AppState;

/// Whether the jar carries a non-empty session cookie.
#[must_use]
pub fn session_present(jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .map(Cookie::value)
        .is_some_and(|value| !value.is_empty())
}

/// Gate a request on the route table. Excluded paths skip classification.
///
/// Matching runs on the normalized path so encoded or dotted variants of a
/// protected page cannot reach the static site unclassified.
pub async fn route_guard(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let path = normalize_path(request.uri().path());
    if state.routes.is_excluded(&path) {
        return next.run(request).await;
    }

    match state.routes.decide(&path, session_present(&jar)) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(target) => {
            let class = state.routes.classify(&path);
            tracing::debug!(%path, ?class, %target, "route guard redirect");
            Redirect::temporary(target).into_response()
        }
    }
}

#[cfg(test)]
#[path = "middleware_test.rs"]
mod tests;
