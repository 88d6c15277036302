//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers and the route-guard middleware
//! via the `State` extractor. Everything in it is immutable after start-up:
//! the route table, the backend client, and cookie policy.

use std::sync::Arc;

use crate::backend::BackendApi;
use crate::guard::RouteTable;

/// Clone is required by Axum; inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub backend: Arc<dyn BackendApi>,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(routes: RouteTable, backend: Arc<dyn BackendApi>, cookie_secure: bool) -> Self {
        Self { routes: Arc::new(routes), backend, cookie_secure }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use serde_json::Value;

    use super::*;
    use crate::backend::types::{Credentials, Page, SignupForm, TokenPair};
    use crate::backend::{BackendError, Resource};

    /// A recorded backend call: operation, resource label, forwarded token.
    pub type Call = (&'static str, &'static str, Option<String>);

    /// In-memory `BackendApi` that records calls and returns canned data.
    #[derive(Default)]
    pub struct MockBackend {
        /// When set, every call fails with this error.
        pub fail: Option<BackendError>,
        /// Page returned by `list`.
        pub page: Page<Value>,
        pub calls: Mutex<Vec<Call>>,
        pub bodies: Mutex<Vec<Value>>,
    }

    impl MockBackend {
        #[must_use]
        pub fn failing(err: BackendError) -> Self {
            Self { fail: Some(err), ..Self::default() }
        }

        #[must_use]
        pub fn with_page(page: Page<Value>) -> Self {
            Self { page, ..Self::default() }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, op: &'static str, resource: &'static str, token: Option<&str>) -> Result<(), BackendError> {
            self.calls
                .lock()
                .unwrap()
                .push((op, resource, token.map(str::to_owned)));
            match &self.fail {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait::async_trait]
    impl BackendApi for MockBackend {
        async fn login(&self, credentials: &Credentials) -> Result<TokenPair, BackendError> {
            self.record("login", "session", None)?;
            Ok(TokenPair { access: format!("access-{}", credentials.username), refresh: "refresh-1".into() })
        }

        async fn register(&self, form: &SignupForm) -> Result<(), BackendError> {
            self.record("register", "session", None)?;
            self.bodies
                .lock()
                .unwrap()
                .push(serde_json::to_value(form).unwrap());
            Ok(())
        }

        async fn list(
            &self,
            resource: Resource,
            token: Option<&str>,
            _window: Option<(u32, u32)>,
        ) -> Result<Page<Value>, BackendError> {
            self.record("list", resource.label(), token)?;
            Ok(self.page.clone())
        }

        async fn create(&self, resource: Resource, token: Option<&str>, body: &Value) -> Result<Value, BackendError> {
            self.record("create", resource.label(), token)?;
            self.bodies.lock().unwrap().push(body.clone());
            let mut created = body.clone();
            created["id"] = serde_json::json!(1);
            Ok(created)
        }

        async fn update(
            &self,
            resource: Resource,
            token: Option<&str>,
            id: u64,
            body: &Value,
        ) -> Result<Value, BackendError> {
            self.record("update", resource.label(), token)?;
            self.bodies.lock().unwrap().push(body.clone());
            let mut updated = body.clone();
            updated["id"] = serde_json::json!(id);
            Ok(updated)
        }

        async fn delete(&self, resource: Resource, token: Option<&str>, _id: u64) -> Result<(), BackendError> {
            self.record("delete", resource.label(), token)
        }
    }

    /// `AppState` with the default route table around the given mock.
    #[must_use]
    pub fn test_app_state(backend: Arc<MockBackend>) -> AppState {
        AppState::new(RouteTable::default(), backend, false)
    }
}
