//! Routing errors
//!
//! Two kinds of failure come out of the router:
//!
//! - **Request-shape errors** (`InvalidRequest`, `NotFound`, `DuplicateParameter`,
//!   `ReservedKeyCollision`) are routine. The HTTP layer answers them with a plain 404.
//! - **Configuration errors** (`NoRootPageFound`) mean the site tree is missing a root
//!   for the host/language and are always logged.
//!
//! Redirects are not errors; see [`crate::Resolution::Redirect`].

use thiserror::Error;

/// Result alias used throughout the router
pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate parameter: {0}")]
    DuplicateParameter(String),

    #[error("reserved auto-item key used as parameter: {0}")]
    ReservedKeyCollision(String),

    #[error("no root page found (host \"{host}\", languages \"{}\")", .languages.join(", "))]
    NoRootPageFound { host: String, languages: Vec<String> },

    #[error("page lookup failed: {0}")]
    Lookup(#[from] anyhow::Error),
}

/// Coarse classification of a [`RouteError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad or ambiguous request, answered with 404
    Request,
    /// Missing site setup
    Configuration,
    /// The page-lookup collaborator failed
    Collaborator,
}

impl RouteError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound(reason.into())
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidRequest(_)
            | Self::NotFound(_)
            | Self::DuplicateParameter(_)
            | Self::ReservedKeyCollision(_) => ErrorClass::Request,
            Self::NoRootPageFound { .. } => ErrorClass::Configuration,
            Self::Lookup(_) => ErrorClass::Collaborator,
        }
    }

    /// Whether the end user should simply see "not found"
    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::Request
    }
}
