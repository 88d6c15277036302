//! CRUD forwarding routes for users, agencies, agents, and specializations.
//!
//! SYSTEM CONTEXT
//! ==============
//! Dashboard screens call these JSON endpoints; each handler validates the
//! form, forwards the browser's `accessToken` cookie as a bearer token, and
//! decodes the backend's answer into the typed record before returning it.
//! Handlers are generic over a [`Binding`] so every collection shares one
//! implementation.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::session::ACCESS_COOKIE;
use crate::backend::types::{
    Agency, AgencyForm, Agent, AgentForm, FormError, Page, PageQuery, Specialization, SpecializationForm, User,
    UserForm, Validate,
};
use crate::backend::{BackendError, Resource, UpdateMethod};
use crate::state::AppState;

// =============================================================================
// BINDINGS
// =============================================================================

/// Ties a backend collection to its record and form types.
pub trait Binding: Send + Sync + 'static {
    const RESOURCE: Resource;
    /// Whether listings take `?page=&limit=`.
    const PAGINATED: bool = false;
    type Record: DeserializeOwned + Serialize + Send;
    type Form: DeserializeOwned + Serialize + Validate + Send;
}

pub struct Users;
pub struct Agencies;
pub struct Agents;
pub struct Specializations;

impl Binding for Users {
    const RESOURCE: Resource = Resource::Users;
    const PAGINATED: bool = true;
    type Record = User;
    type Form = UserForm;
}

impl Binding for Agencies {
    const RESOURCE: Resource = Resource::Agencies;
    type Record = Agency;
    type Form = AgencyForm;
}

impl Binding for Agents {
    const RESOURCE: Resource = Resource::Agents;
    type Record = Agent;
    type Form = AgentForm;
}

impl Binding for Specializations {
    const RESOURCE: Resource = Resource::Specializations;
    type Record = Specialization;
    type Form = SpecializationForm;
}

/// Register list/create and update/delete routes for one binding.
fn bind<B: Binding>(router: Router<AppState>, collection: &str) -> Router<AppState> {
    let item = format!("{collection}/{{id}}");
    let item_route = match B::RESOURCE.update_method() {
        UpdateMethod::Put => axum::routing::put(update::<B>),
        UpdateMethod::Patch => axum::routing::patch(update::<B>),
    };
    router
        .route(collection, get(list::<B>).post(create::<B>))
        .route(&item, item_route.delete(remove::<B>))
}

/// All CRUD routes under `/api`.
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = bind::<Users>(router, "/api/users");
    let router = bind::<Agencies>(router, "/api/agencies");
    let router = bind::<Agents>(router, "/api/agents");
    bind::<Specializations>(router, "/api/specializations")
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub(crate) fn backend_error_to_status(err: &BackendError) -> StatusCode {
    match err {
        BackendError::Status { status: 401, .. } => StatusCode::UNAUTHORIZED,
        BackendError::Status { status: 403, .. } => StatusCode::FORBIDDEN,
        BackendError::Status { status: 404, .. } => StatusCode::NOT_FOUND,
        BackendError::Status { .. }
        | BackendError::Request(_)
        | BackendError::Parse(_)
        | BackendError::HttpClientBuild(_) => StatusCode::BAD_GATEWAY,
    }
}

fn backend_failure(resource: Resource, op: &str, err: &BackendError) -> Response {
    let status = backend_error_to_status(err);
    if status == StatusCode::BAD_GATEWAY {
        tracing::error!(resource = resource.label(), op, error = %err, "backend call failed");
    } else {
        tracing::warn!(resource = resource.label(), op, error = %err, "backend refused call");
    }
    error_body(status, format!("Failed to {op} {}", resource.label()))
}

fn form_failure(err: &FormError) -> Response {
    error_body(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

fn access_token(jar: &CookieJar) -> Option<&str> {
    jar.get(ACCESS_COOKIE)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
}

fn typed<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, BackendError> {
    Ok(serde_json::from_value(value)?)
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Serialize)]
pub struct ListResponse<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub total_pages: u64,
}

/// `GET /api/{collection}` — list records.
pub async fn list<B: Binding>(State(state): State<AppState>, jar: CookieJar, Query(query): Query<PageQuery>) -> Response {
    let (limit, offset) = query.limit_offset();
    let window = B::PAGINATED.then_some((limit, offset));
    let result = state
        .backend
        .list(B::RESOURCE, access_token(&jar), window)
        .await
        .and_then(|page| page.typed::<B::Record>().map_err(BackendError::from));

    match result {
        Ok(page) => {
            let total_pages = if B::PAGINATED { page.total_pages(limit) } else { 1 };
            Json(ListResponse { page, total_pages }).into_response()
        }
        Err(e) => backend_failure(B::RESOURCE, "load", &e),
    }
}

/// `POST /api/{collection}` — create a record.
pub async fn create<B: Binding>(State(state): State<AppState>, jar: CookieJar, Json(form): Json<B::Form>) -> Response {
    if let Err(e) = form.validate() {
        return form_failure(&e);
    }
    let body = match serde_json::to_value(&form) {
        Ok(body) => body,
        Err(e) => return backend_failure(B::RESOURCE, "create", &e.into()),
    };

    let result = state
        .backend
        .create(B::RESOURCE, access_token(&jar), &body)
        .await
        .and_then(typed::<B::Record>);

    match result {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => backend_failure(B::RESOURCE, "create", &e),
    }
}

/// `PUT|PATCH /api/{collection}/{id}` — update a record.
pub async fn update<B: Binding>(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<u64>,
    Json(form): Json<B::Form>,
) -> Response {
    if let Err(e) = form.validate() {
        return form_failure(&e);
    }
    let body = match serde_json::to_value(&form) {
        Ok(body) => body,
        Err(e) => return backend_failure(B::RESOURCE, "update", &e.into()),
    };

    let result = state
        .backend
        .update(B::RESOURCE, access_token(&jar), id, &body)
        .await
        .and_then(typed::<B::Record>);

    match result {
        Ok(record) => Json(record).into_response(),
        Err(e) => backend_failure(B::RESOURCE, "update", &e),
    }
}

/// `DELETE /api/{collection}/{id}` — delete a record.
pub async fn remove<B: Binding>(State(state): State<AppState>, jar: CookieJar, Path(id): Path<u64>) -> Response {
    match state
        .backend
        .delete(B::RESOURCE, access_token(&jar), id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => backend_failure(B::RESOURCE, "delete", &e),
    }
}

#[cfg(test)]
#[path = "resources_test.rs"]
mod tests;
