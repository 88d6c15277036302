//! Backend payload types — transient mirrors of the REST resources.
//!
//! These records are owned by the backend; the console only carries them
//! between the browser and the API. Forms are validated before submission
//! with the same rules the dashboard screens apply.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_PHONE_LEN: usize = 10;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

// =============================================================================
// ERROR
// =============================================================================

/// A form failed client-side validation. Messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,
    #[error("Passwords don't match!")]
    PasswordMismatch,
    #[error("Phone number is too short")]
    PhoneTooShort,
    #[error("Role must be at least 1")]
    InvalidRole,
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
}

/// Client-side checks run before a form is forwarded to the backend.
pub trait Validate {
    /// # Errors
    ///
    /// Returns the first rule the form violates.
    fn validate(&self) -> Result<(), FormError> {
        Ok(())
    }
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(())
}

fn require_url(value: &str, field: &'static str) -> Result<(), FormError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|_| FormError::InvalidUrl(field))
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token pair issued by `POST /users/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
}

impl Validate for SignupForm {
    fn validate(&self) -> Result<(), FormError> {
        require(&self.first_name, "First name")?;
        require(&self.last_name, "Last name")?;
        require(&self.username, "Email")?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        if self.password != self.password2 {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub gender: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub website: String,
    pub linkedin: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Option<u32>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserForm {
    pub username: String,
    pub phone_number: String,
    pub password: String,
    pub role: u32,
    pub is_verified: bool,
    pub profile: Profile,
}

impl Validate for UserForm {
    fn validate(&self) -> Result<(), FormError> {
        require(&self.username, "Username")?;
        if self.phone_number.chars().count() < MIN_PHONE_LEN {
            return Err(FormError::PhoneTooShort);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        if self.role < 1 {
            return Err(FormError::InvalidRole);
        }
        let p = &self.profile;
        require_url(&p.website, "Website")?;
        require_url(&p.linkedin, "LinkedIn")?;
        require_url(&p.facebook, "Facebook")?;
        require_url(&p.twitter, "Twitter")?;
        require_url(&p.instagram, "Instagram")?;
        Ok(())
    }
}

// =============================================================================
// AGENCIES, AGENTS, SPECIALIZATIONS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
    pub id: u64,
    pub user: u64,
    pub agency: u64,
    pub license_number: String,
    pub experience_years: u32,
    #[serde(default)]
    pub specializations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyForm {
    pub user: u64,
    pub agency: u64,
    pub license_number: String,
    pub experience_years: u32,
    #[serde(default)]
    pub specializations: Vec<String>,
}

impl Validate for AgencyForm {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: u64,
    pub user: u64,
    pub license_number: String,
    pub experience_years: u32,
    #[serde(default)]
    pub specializations: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentForm {
    pub user: u64,
    pub license_number: String,
    pub experience_years: u32,
    #[serde(default)]
    pub specializations: Vec<u64>,
}

impl Validate for AgentForm {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialization {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecializationForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for SpecializationForm {
    fn validate(&self) -> Result<(), FormError> {
        require(&self.name, "Name")
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Paginated list envelope returned by the backend's list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap an unpaginated list.
    #[must_use]
    pub fn from_items(results: Vec<T>) -> Self {
        Self { count: results.len() as u64, next: None, previous: None, results }
    }

    /// Number of pages at `limit` items per page; never less than one.
    #[must_use]
    pub fn total_pages(&self, limit: u32) -> u64 {
        if limit == 0 {
            return 1;
        }
        self.count.div_ceil(u64::from(limit)).max(1)
    }
}

impl Page<serde_json::Value> {
    /// Deserialize every result into a typed record.
    ///
    /// # Errors
    ///
    /// Returns the first record that does not match `T`.
    pub fn typed<T: DeserializeOwned>(self) -> Result<Page<T>, serde_json::Error> {
        let results = self
            .results
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(Page { count: self.count, next: self.next, previous: self.previous, results })
    }
}

/// `?page=&limit=` query for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, limit: DEFAULT_PAGE_LIMIT }
    }
}

impl PageQuery {
    /// Effective `(limit, offset)`; page 0 is treated as page 1.
    #[must_use]
    pub fn limit_offset(self) -> (u32, u32) {
        let limit = if self.limit == 0 { DEFAULT_PAGE_LIMIT } else { self.limit };
        let page = self.page.max(1);
        (limit, (page - 1).saturating_mul(limit))
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
