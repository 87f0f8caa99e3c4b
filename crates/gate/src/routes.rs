//! Static route table and path classification.
//!
//! The table is an immutable configuration value: built and validated once
//! at process start, then shared by reference into every request. There is
//! no runtime mutation.

use serde::Deserialize;
use thiserror::Error;

/// Authorization category of a request path.
///
/// Exactly one class applies per path; [`RouteTable::classify`] resolves
/// overlaps by the precedence documented there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathClass {
    /// Reachable with or without a credential (login page, health probe).
    Public,
    /// Backend API namespace; authorization is delegated downstream.
    ApiPassthrough,
    /// Framework and static assets; never gated.
    StaticAsset,
    /// The landing page, handled specially by the decision layer.
    Root,
    /// Requires the admin role.
    AdminRestricted,
    /// Requires the approver (or admin) role.
    ApproverRestricted,
    /// Requires any authenticated bearer.
    GenericProtected,
}

impl PathClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathClass::Public => "public",
            PathClass::ApiPassthrough => "api_passthrough",
            PathClass::StaticAsset => "static_asset",
            PathClass::Root => "root",
            PathClass::AdminRestricted => "admin_restricted",
            PathClass::ApproverRestricted => "approver_restricted",
            PathClass::GenericProtected => "generic_protected",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route entry must not be empty")]
    EmptyEntry,

    #[error("route entry must start with '/': {0}")]
    NotAbsolute(String),

    #[error("route entry appears in more than one set: {0}")]
    DuplicateEntry(String),
}

/// Immutable path-classification table.
///
/// Entries match a path when they equal it exactly or when the path
/// continues past the entry at a `/` boundary, so `/admin` matches
/// `/admin/users` but not `/administrivia`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTable {
    /// Reachable anonymously; wins over every other set.
    #[serde(default = "default_public")]
    public: Vec<String>,

    /// Namespace proxied to the backend API.
    #[serde(default = "default_api_prefix")]
    api_prefix: String,

    /// Framework-internal and static asset prefixes.
    #[serde(default = "default_static_assets")]
    static_assets: Vec<String>,

    /// Surfaces requiring the admin role.
    #[serde(default = "default_admin")]
    admin: Vec<String>,

    /// Surfaces requiring the approver (or admin) role.
    #[serde(default = "default_approver")]
    approver: Vec<String>,
}

fn default_public() -> Vec<String> {
    vec!["/login".to_string(), "/healthz".to_string()]
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_static_assets() -> Vec<String> {
    vec![
        "/_next".to_string(),
        "/static".to_string(),
        "/favicon.ico".to_string(),
    ]
}

fn default_admin() -> Vec<String> {
    vec!["/admin".to_string()]
}

fn default_approver() -> Vec<String> {
    vec!["/approvals".to_string()]
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            public: default_public(),
            api_prefix: default_api_prefix(),
            static_assets: default_static_assets(),
            admin: default_admin(),
            approver: default_approver(),
        }
    }
}

impl RouteTable {
    /// Validate the table once at startup.
    ///
    /// Every entry must be an absolute, non-empty path, and no entry may
    /// appear in more than one set (overlap by *prefix* is legal and
    /// resolved by precedence; the same literal entry twice is a config
    /// mistake).
    pub fn validate(&self) -> Result<(), RouteTableError> {
        let mut seen: Vec<&str> = Vec::new();

        let sets = self
            .public
            .iter()
            .chain(std::iter::once(&self.api_prefix))
            .chain(self.static_assets.iter())
            .chain(self.admin.iter())
            .chain(self.approver.iter());

        for entry in sets {
            if entry.is_empty() {
                return Err(RouteTableError::EmptyEntry);
            }
            if !entry.starts_with('/') {
                return Err(RouteTableError::NotAbsolute(entry.clone()));
            }
            if seen.contains(&entry.as_str()) {
                return Err(RouteTableError::DuplicateEntry(entry.clone()));
            }
            seen.push(entry);
        }

        Ok(())
    }

    /// Classify a request path.
    ///
    /// Precedence (first match wins):
    /// Public > ApiPassthrough > StaticAsset > Root > AdminRestricted >
    /// ApproverRestricted > GenericProtected.
    pub fn classify(&self, path: &str) -> PathClass {
        if self.public.iter().any(|p| entry_matches(p, path)) {
            return PathClass::Public;
        }
        if entry_matches(&self.api_prefix, path) {
            return PathClass::ApiPassthrough;
        }
        if self.static_assets.iter().any(|p| entry_matches(p, path)) {
            return PathClass::StaticAsset;
        }
        if path == "/" {
            return PathClass::Root;
        }
        if self.admin.iter().any(|p| entry_matches(p, path)) {
            return PathClass::AdminRestricted;
        }
        if self.approver.iter().any(|p| entry_matches(p, path)) {
            return PathClass::ApproverRestricted;
        }
        PathClass::GenericProtected
    }
}

/// Equality, or continuation past the entry at a `/` boundary.
fn entry_matches(entry: &str, path: &str) -> bool {
    match path.strip_prefix(entry) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
