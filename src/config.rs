//! Process configuration parsed from environment variables.

use std::path::PathBuf;

use crate::backend::{BackendTimeouts, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::guard::{
    DEFAULT_EXCLUDED_PREFIXES, DEFAULT_PROTECTED_ROUTES, DEFAULT_PUBLIC_ROUTES, RouteTable, to_owned_list,
};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SITE_DIR: &str = "site";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("route entry in {var} must start with '/': {entry:?}")]
    BadRoute { var: &'static str, entry: String },
    #[error("excluded prefix in {var} must not start with '/': {entry:?}")]
    BadPrefix { var: &'static str, entry: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub site_dir: PathBuf,
    pub cookie_secure: bool,
    pub routes: RouteTable,
    pub timeouts: BackendTimeouts,
}

impl Config {
    /// Build typed config from the process environment.
    ///
    /// Required:
    /// - `BACKEND_URL`
    ///
    /// Optional:
    /// - `PORT` (default 3000), `SITE_DIR` (default `site`)
    /// - `COOKIE_SECURE` (default false)
    /// - `PUBLIC_ROUTES`, `PROTECTED_ROUTES`, `GUARD_EXCLUDED_PREFIXES`: comma lists
    /// - `BACKEND_REQUEST_TIMEOUT_SECS` (default 30), `BACKEND_CONNECT_TIMEOUT_SECS` (default 10)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL")
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("BACKEND_URL"))?;

        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let site_dir = lookup("SITE_DIR").map_or_else(|| PathBuf::from(DEFAULT_SITE_DIR), PathBuf::from);

        let cookie_secure = match lookup("COOKIE_SECURE") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "COOKIE_SECURE", value: raw })?,
        };

        let public = parse_routes("PUBLIC_ROUTES", lookup("PUBLIC_ROUTES"), DEFAULT_PUBLIC_ROUTES)?;
        let protected = parse_routes("PROTECTED_ROUTES", lookup("PROTECTED_ROUTES"), DEFAULT_PROTECTED_ROUTES)?;
        let excluded = parse_prefixes("GUARD_EXCLUDED_PREFIXES", lookup("GUARD_EXCLUDED_PREFIXES"))?;

        let timeouts = BackendTimeouts {
            request_secs: parse_or(
                "BACKEND_REQUEST_TIMEOUT_SECS",
                lookup("BACKEND_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            connect_secs: parse_or(
                "BACKEND_CONNECT_TIMEOUT_SECS",
                lookup("BACKEND_CONNECT_TIMEOUT_SECS"),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self {
            port,
            backend_url,
            site_dir,
            cookie_secure,
            routes: RouteTable::new(public, protected, excluded),
            timeouts,
        })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_routes(var: &'static str, raw: Option<String>, defaults: &[&str]) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(to_owned_list(defaults));
    };
    let entries = split_list(&raw);
    if let Some(bad) = entries.iter().find(|e| !e.starts_with('/')) {
        return Err(ConfigError::BadRoute { var, entry: bad.clone() });
    }
    Ok(entries)
}

/// Exclusion prefixes are compared against the text after the leading `/`.
fn parse_prefixes(var: &'static str, raw: Option<String>) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(to_owned_list(DEFAULT_EXCLUDED_PREFIXES));
    };
    let entries = split_list(&raw);
    if let Some(bad) = entries.iter().find(|e| e.starts_with('/')) {
        return Err(ConfigError::BadPrefix { var, entry: bad.clone() });
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
