// Copyright 2026 wp-pilot contributors
// SPDX-License-Identifier: Apache-2.0

//! Drive a WordPress admin interface over an authenticated HTTP session.
//!
//! There is no documented API behind this crate — it automates the
//! browser-facing HTML admin pages: form-based login with cookies as proof
//! of authentication, then scraping server-rendered markup to read plugin
//! state and to locate the action links that change it. That makes it
//! deliberately fragile: it targets one application's specific admin
//! markup and breaks if the markup changes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use wp_pilot::{AdminSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> wp_pilot::Result<()> {
//!     let session = AdminSession::login(SessionConfig::new(
//!         "https://blog.example.com",
//!         "admin",
//!         "password",
//!     ))
//!     .await?;
//!
//!     for plugin in session.list_plugins().await? {
//!         println!("{} {:?} active={}", plugin.name, plugin.version, plugin.active);
//!     }
//!
//!     session.activate_plugin("akismet").await?;
//!     Ok(())
//! }
//! ```
//!
//! Errors carry their cause as distinct variants ([`Error::Authentication`],
//! [`Error::State`], [`Error::NotFound`], ...) so callers can branch rather
//! than catch; nothing is retried internally.

pub mod config;
pub mod error;
pub mod http;
pub mod scrape;
pub mod session;
pub mod upload;

pub use config::{FtpCredentials, SessionConfig};
pub use error::{Error, PluginState, Result};
pub use scrape::{Plugin, PluginAction};
pub use session::AdminSession;
pub use upload::{PluginArchive, UploadStrategy};
