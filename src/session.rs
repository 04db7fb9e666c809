//! Authenticated admin session and the plugin operations built on it.
//!
//! [`AdminSession::login`] performs the form login and keeps the resulting
//! cookies as the sole proof of authentication; every operation after that
//! is one or more sequential round trips against the admin pages, with all
//! markup interpretation delegated to [`crate::scrape`].
//!
//! The session is synchronous in spirit: one logical operation at a time,
//! no locking, not designed for concurrent callers. There is no automatic
//! re-login — when the session expires, operations start failing and the
//! caller reconstructs.

use std::fmt;

use tracing::{debug, info};
use url::Url;

use crate::config::{FtpCredentials, SessionConfig};
use crate::error::{Error, PluginState, Result};
use crate::http::{HttpClient, HttpResponse};
use crate::scrape::{self, Plugin, PluginAction};
use crate::upload::{self, PluginArchive, UploadStrategy};

/// Name prefix of the cookie that proves a logged-in session.
const AUTH_COOKIE_PREFIX: &str = "wordpress_logged_in_";

/// Cookie the login form expects to find, proving cookies are enabled.
const TEST_COOKIE: &str = "wordpress_test_cookie=WP Cookie check; Path=/";

/// An authenticated session against one site's admin interface.
///
/// Constructed by [`AdminSession::login`]; dropped to end the session (the
/// admin interface has no explicit logout in this flow).
pub struct AdminSession {
    http: HttpClient,
    site_url: String,
    admin_url: String,
    /// Admin URL with a trailing slash, the base scraped hrefs resolve
    /// against.
    admin_base: Url,
    plugin_list_url: String,
    login_url: String,
    ftp: Option<FtpCredentials>,
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("site_url", &self.site_url)
            .field("login_url", &self.login_url)
            .finish_non_exhaustive()
    }
}

impl AdminSession {
    /// Log into the site and return the authenticated session.
    ///
    /// Discovers the login endpoint by following redirects from the admin
    /// URL, then POSTs the login form. Success requires status 200 and a
    /// cookie named with the `wordpress_logged_in_` prefix; anything else
    /// is [`Error::Authentication`]. A failed-login page rendered with 200
    /// is rejected by the cookie clause — the site only issues that cookie
    /// on a successful login.
    pub async fn login(config: SessionConfig) -> Result<Self> {
        let site_url = config.site_url.trim_end_matches('/').to_string();
        let admin_url = format!("{site_url}/wp-admin");
        let admin_base = Url::parse(&format!("{admin_url}/"))?;
        let plugin_list_url = format!("{admin_url}/plugins.php");

        let http = HttpClient::new(config.timeout)?;

        // The server redirects the bare admin URL to its canonical login
        // endpoint; the final URL is what the form posts back to.
        let probe = http.get(&admin_url, &[]).await?;
        let login_url = probe.final_url;
        debug!(%login_url, "resolved login endpoint");

        let site = Url::parse(&site_url)?;
        http.set_cookie(&site, TEST_COOKIE);

        let headers = vec![
            ("Origin".to_string(), site_url.clone()),
            ("Referer".to_string(), login_url.clone()),
        ];
        let form = [
            ("log".to_string(), config.login.clone()),
            ("pwd".to_string(), config.password.clone()),
            ("wp-submit".to_string(), "Log In".to_string()),
            ("redirect_to".to_string(), admin_url.clone()),
            ("testcookie".to_string(), "1".to_string()),
            ("rememberme".to_string(), "forever".to_string()),
        ];

        let resp = http.post_form(&login_url, &form, &headers).await?;
        if resp.status != 200 {
            return Err(Error::Authentication {
                status: Some(resp.status),
                reason: format!("unexpected login status {}", resp.status),
            });
        }
        if !http.has_cookie_with_prefix(&site, AUTH_COOKIE_PREFIX) {
            return Err(Error::Authentication {
                status: Some(resp.status),
                reason: "no valid session cookie after login".to_string(),
            });
        }

        info!(site = %site_url, "logged in");
        Ok(Self {
            http,
            site_url,
            admin_url,
            admin_base,
            plugin_list_url,
            login_url,
            ftp: config.ftp,
        })
    }

    /// The admin base URL, e.g. `https://site/wp-admin`.
    pub fn admin_url(&self) -> &str {
        &self.admin_url
    }

    /// The login URL the admin URL resolved to.
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Which transport [`Self::install_plugin`] will use, decided by the
    /// credentials supplied at construction.
    pub fn upload_strategy(&self) -> UploadStrategy {
        UploadStrategy::from_credentials(self.ftp.as_ref())
    }

    /// List installed plugins with their version and activation state.
    ///
    /// Rebuilt fresh from the listing page on every call; a site with no
    /// plugins yields an empty vec.
    pub async fn list_plugins(&self) -> Result<Vec<Plugin>> {
        let page = self.fetch_plugin_page().await?;
        let plugins = scrape::parse_plugin_list(&page.body)?;
        debug!(count = plugins.len(), "listed plugins");
        Ok(plugins)
    }

    /// Whether the named plugin is currently listed as active.
    pub async fn is_plugin_active(&self, name: &str) -> Result<bool> {
        let plugins = self.list_plugins().await?;
        Ok(plugins.iter().any(|p| p.name == name && p.active))
    }

    /// Activate an inactive plugin.
    ///
    /// [`Error::State`] if the plugin is already active (checked first, so
    /// no action request is issued), [`Error::NotFound`] if its row has no
    /// activate link.
    pub async fn activate_plugin(&self, name: &str) -> Result<()> {
        self.toggle_plugin(name, PluginAction::Activate).await
    }

    /// Deactivate an active plugin. Symmetric to [`Self::activate_plugin`].
    pub async fn deactivate_plugin(&self, name: &str) -> Result<()> {
        self.toggle_plugin(name, PluginAction::Deactivate).await
    }

    /// Upload and install a plugin archive, over HTTP or FTP depending on
    /// construction-time credentials.
    pub async fn install_plugin(&self, archive: PluginArchive) -> Result<()> {
        match &self.ftp {
            Some(creds) => upload::install_via_ftp(creds, archive).await,
            None => {
                upload::install_via_http(
                    &self.http,
                    &self.admin_base,
                    archive,
                    &self.page_headers(),
                )
                .await
            }
        }
    }

    /// Check the observed state, locate the action link, and issue exactly
    /// one follow-up GET to it.
    async fn toggle_plugin(&self, name: &str, action: PluginAction) -> Result<()> {
        let active = self.is_plugin_active(name).await?;
        let blocked = match action {
            PluginAction::Activate => active,
            PluginAction::Deactivate => !active,
        };
        if blocked {
            return Err(Error::State {
                plugin: name.to_string(),
                state: if active {
                    PluginState::Active
                } else {
                    PluginState::Inactive
                },
            });
        }

        let page = self.fetch_plugin_page().await?;
        let href = scrape::find_action_link(&page.body, name, action)?;
        let target = self.admin_base.join(&href)?;

        let resp = self.http.get(target.as_str(), &self.page_headers()).await?;
        if !resp.is_success() {
            return Err(Error::UnexpectedStatus {
                url: resp.url,
                status: resp.status,
            });
        }

        info!(plugin = name, action = action.section_class(), "plugin action issued");
        Ok(())
    }

    async fn fetch_plugin_page(&self) -> Result<HttpResponse> {
        let resp = self
            .http
            .get(&self.plugin_list_url, &self.page_headers())
            .await?;
        if !resp.is_success() {
            return Err(Error::UnexpectedStatus {
                url: resp.url,
                status: resp.status,
            });
        }
        Ok(resp)
    }

    /// Origin and Referer sent on every request after login.
    fn page_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Origin".to_string(), self.site_url.clone()),
            ("Referer".to_string(), self.login_url.clone()),
        ]
    }
}
