//! reqwest implementation of [`BackendApi`].
//!
//! Thin HTTP wrapper over the backend endpoints. Response parsing lives in
//! pure functions (`parse_page`, `parse_body`) for testability.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{Credentials, Page, SignupForm, TokenPair};
use super::{BackendApi, BackendError, BackendTimeouts, Resource, UpdateMethod};

const LOGIN_PATH: &str = "/users/login/";
const REGISTER_PATH: &str = "/users/register/";

// =============================================================================
// CLIENT
// =============================================================================

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client rooted at `base_url` (trailing `/` is trimmed).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if reqwest cannot build the client.
    pub fn new(base_url: &str, timeouts: BackendTimeouts) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(builder: RequestBuilder) -> Result<String, BackendError> {
        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, BackendError> {
        let text = Self::send(builder).await?;
        parse_body(&text)
    }
}

/// Attach `Authorization: Bearer <token>` when a non-empty token is present.
pub(crate) fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

#[async_trait::async_trait]
impl BackendApi for BackendClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, BackendError> {
        let builder = self.http.post(self.url(LOGIN_PATH)).json(credentials);
        Self::send_json(builder).await
    }

    async fn register(&self, form: &SignupForm) -> Result<(), BackendError> {
        let builder = self.http.post(self.url(REGISTER_PATH)).json(form);
        Self::send(builder).await.map(|_| ())
    }

    async fn list(
        &self,
        resource: Resource,
        token: Option<&str>,
        window: Option<(u32, u32)>,
    ) -> Result<Page<Value>, BackendError> {
        let mut builder = self.http.get(self.url(resource.collection_path()));
        if let Some((limit, offset)) = window {
            builder = builder.query(&[("limit", limit), ("offset", offset)]);
        }
        let text = Self::send(authorized(builder, token)).await?;
        parse_page(&text)
    }

    async fn create(&self, resource: Resource, token: Option<&str>, body: &Value) -> Result<Value, BackendError> {
        let builder = self.http.post(self.url(resource.collection_path())).json(body);
        Self::send_json(authorized(builder, token)).await
    }

    async fn update(
        &self,
        resource: Resource,
        token: Option<&str>,
        id: u64,
        body: &Value,
    ) -> Result<Value, BackendError> {
        let url = self.url(&resource.item_path(id));
        let builder = match resource.update_method() {
            UpdateMethod::Put => self.http.put(url),
            UpdateMethod::Patch => self.http.patch(url),
        };
        Self::send_json(authorized(builder.json(body), token)).await
    }

    async fn delete(&self, resource: Resource, token: Option<&str>, id: u64) -> Result<(), BackendError> {
        let builder = self.http.delete(self.url(&resource.item_path(id)));
        Self::send(authorized(builder, token)).await.map(|_| ())
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a JSON body; an empty body decodes as `null`.
pub(crate) fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, BackendError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    Ok(serde_json::from_str(text)?)
}

/// Parse a list response: either a pagination envelope or a bare array.
pub(crate) fn parse_page(text: &str) -> Result<Page<Value>, BackendError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => Ok(Page::from_items(items)),
        envelope @ Value::Object(_) => Ok(serde_json::from_value(envelope)?),
        other => Err(BackendError::Parse(format!("unexpected list response: {other}"))),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
