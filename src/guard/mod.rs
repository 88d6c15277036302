//! Route guard — session-presence gating for dashboard navigation.
//!
//! DESIGN
//! ======
//! Every navigable path is classified against two immutable lists (public,
//! protected) held in a [`RouteTable`] built once at start-up. The decision
//! is a pure function of the path and a single boolean: whether the
//! `refreshToken` cookie is present and non-empty. Paths are matched in
//! their decoded, dot-free form (see [`normalize_path`]).
//!
//! | session | class       | decision               |
//! |---------|-------------|------------------------|
//! | present | public      | redirect `/dashboard`  |
//! | absent  | protected   | redirect `/`           |
//! | any     | other cases | allow                  |
//!
//! TRADE-OFFS
//! ==========
//! Cookie presence is only a proxy for "logged in": the token is never
//! parsed or verified here. Real access control lives in the backend, which
//! validates the bearer token on every API call.

pub mod middleware;

use percent_encoding::percent_decode_str;

/// Paths reachable without a session.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &["/", "/login", "/signup"];
/// Paths that require a session.
pub const DEFAULT_PROTECTED_ROUTES: &[&str] = &["/dashboard", "/profile", "/settings"];
/// Raw prefixes (after the leading `/`) that bypass the guard entirely.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["api", "_next/static", "_next/image", "favicon.ico"];

/// Cookie whose presence signals an active session.
pub const SESSION_COOKIE: &str = "refreshToken";
/// Where unauthenticated visitors of protected paths are sent.
pub const LOGIN_TARGET: &str = "/";
/// Where authenticated visitors of public paths are sent.
pub const DASHBOARD_TARGET: &str = "/dashboard";

// =============================================================================
// DECISION TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Protected,
    Unclassified,
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Pass the request through unmodified.
    Allow,
    /// Send the browser elsewhere.
    Redirect(&'static str),
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// Immutable route configuration consulted by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    public: Vec<String>,
    protected: Vec<String>,
    excluded: Vec<String>,
}

impl RouteTable {
    #[must_use]
    pub fn new(public: Vec<String>, protected: Vec<String>, excluded: Vec<String>) -> Self {
        Self { public, protected, excluded }
    }

    #[must_use]
    pub fn public(&self) -> &[String] {
        &self.public
    }

    #[must_use]
    pub fn protected(&self) -> &[String] {
        &self.protected
    }

    #[must_use]
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Classify a path. Public membership is checked before protected.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.public.iter().any(|entry| path_matches(path, entry)) {
            RouteClass::Public
        } else if self.protected.iter().any(|entry| path_matches(path, entry)) {
            RouteClass::Protected
        } else {
            RouteClass::Unclassified
        }
    }

    /// Decide what to do with a navigation to `path`.
    ///
    /// Membership in both lists is tolerated: with a session the public
    /// redirect wins, without one the protected redirect wins.
    #[must_use]
    pub fn decide(&self, path: &str, session_present: bool) -> GuardDecision {
        let is_public = self.public.iter().any(|entry| path_matches(path, entry));
        let is_protected = self.protected.iter().any(|entry| path_matches(path, entry));

        match (session_present, is_public, is_protected) {
            (true, true, _) => GuardDecision::Redirect(DASHBOARD_TARGET),
            (false, _, true) => GuardDecision::Redirect(LOGIN_TARGET),
            _ => GuardDecision::Allow,
        }
    }

    /// Whether the request pipeline skips the guard for this path.
    ///
    /// Matches the raw text after the leading `/`, so `api` also covers
    /// `/apiary`.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);
        self.excluded.iter().any(|prefix| rest.starts_with(prefix.as_str()))
    }

    /// Pairs of (public, protected) entries where one shadows the other.
    #[must_use]
    pub fn overlaps(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for public in &self.public {
            for protected in &self.protected {
                if path_matches(public, protected) || path_matches(protected, public) {
                    pairs.push((public.as_str(), protected.as_str()));
                }
            }
        }
        pairs
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(
            to_owned_list(DEFAULT_PUBLIC_ROUTES),
            to_owned_list(DEFAULT_PROTECTED_ROUTES),
            to_owned_list(DEFAULT_EXCLUDED_PREFIXES),
        )
    }
}

pub(crate) fn to_owned_list(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| (*s).to_owned()).collect()
}

/// Canonical form of a request path, as the static file service resolves it.
///
/// Percent-escapes are decoded (including `%2F`), empty and `.` segments
/// are dropped, and `..` pops the previous segment. The result always
/// starts with `/` and carries no trailing slash except for the root.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Exact match, or prefix match on a path-segment boundary.
#[must_use]
pub fn path_matches(path: &str, entry: &str) -> bool {
    path == entry
        || path
            .strip_prefix(entry)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
