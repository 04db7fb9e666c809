//! Error types for admin-session operations.
//!
//! Every failure surfaces as a distinct, inspectable variant so callers can
//! branch on cause. None of these are retried internally.

use std::fmt;

use thiserror::Error;

/// Result type alias for admin-session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the admin interface.
#[derive(Error, Debug)]
pub enum Error {
    /// Login was rejected: unexpected status, or no session cookie issued.
    #[error("authentication failed: {reason}")]
    Authentication {
        /// HTTP status observed on the login response, if one arrived.
        status: Option<u16>,
        /// Failure reason.
        reason: String,
    },

    /// A state-changing command targeted a plugin already in that state.
    /// Raised before any network request is made.
    #[error("plugin {plugin} is already {state}")]
    State {
        /// Plugin name as reported by the listing page.
        plugin: String,
        /// The state the plugin is already in.
        state: PluginState,
    },

    /// An expected element or link is absent from the page markup, which
    /// usually means the site's admin markup differs from what this client
    /// was written against.
    #[error("{0}")]
    NotFound(String),

    /// A fetched page or action request returned a non-success status.
    #[error("request to {url} returned status {status}")]
    UnexpectedStatus {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code received.
        status: u16,
    },

    /// Transport-level failure (connect, timeout, TLS, protocol).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The site URL or a scraped href could not be parsed or resolved.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A declared capability that is not built yet.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Observed activation state of a plugin, as reported by the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// The plugin row carried the `active` class.
    Active,
    /// Any other row class.
    Inactive,
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginState::Active => write!(f, "active"),
            PluginState::Inactive => write!(f, "inactive"),
        }
    }
}
