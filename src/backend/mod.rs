//! Backend — typed client for the brokerage REST API.
//!
//! DESIGN
//! ======
//! Routes talk to the backend through the object-safe [`BackendApi`] trait,
//! held as `Arc<dyn BackendApi>` in `AppState`. [`BackendClient`] is the
//! reqwest implementation; tests substitute a mock. Resource calls carry
//! raw JSON so one set of trait methods serves every [`Resource`]; typed
//! validation and decoding happen at the route layer.
//!
//! Every call except login and register takes the caller's access token and
//! forwards it as `Authorization: Bearer <token>` when non-empty.

pub mod client;
pub mod types;

pub use client::BackendClient;
use serde_json::Value;
use types::{Credentials, Page, SignupForm, TokenPair};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("backend request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("backend response parse failed: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

// =============================================================================
// RESOURCES
// =============================================================================

/// A CRUD collection exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Agencies,
    Agents,
    Specializations,
}

/// HTTP verb the backend expects for updates of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Put,
    Patch,
}

impl Resource {
    #[must_use]
    pub fn collection_path(self) -> &'static str {
        match self {
            Self::Users => "/users/user/",
            Self::Agencies => "/agency/agencies/",
            Self::Agents => "/agency/agents/",
            Self::Specializations => "/agency/specializations/",
        }
    }

    #[must_use]
    pub fn item_path(self, id: u64) -> String {
        format!("{}{id}/", self.collection_path())
    }

    #[must_use]
    pub fn update_method(self) -> UpdateMethod {
        match self {
            Self::Users | Self::Specializations => UpdateMethod::Patch,
            Self::Agencies | Self::Agents => UpdateMethod::Put,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Agencies => "agencies",
            Self::Agents => "agents",
            Self::Specializations => "specializations",
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Operations the console performs against the backend.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// Exchange credentials for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// [`BackendError::Status`] when the backend rejects the credentials.
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, BackendError>;

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// [`BackendError::Status`] when the backend refuses the registration.
    async fn register(&self, form: &SignupForm) -> Result<(), BackendError>;

    /// List a collection, optionally paginated by `(limit, offset)`.
    async fn list(
        &self,
        resource: Resource,
        token: Option<&str>,
        window: Option<(u32, u32)>,
    ) -> Result<Page<Value>, BackendError>;

    async fn create(&self, resource: Resource, token: Option<&str>, body: &Value) -> Result<Value, BackendError>;

    async fn update(
        &self,
        resource: Resource,
        token: Option<&str>,
        id: u64,
        body: &Value,
    ) -> Result<Value, BackendError>;

    async fn delete(&self, resource: Resource, token: Option<&str>, id: u64) -> Result<(), BackendError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
