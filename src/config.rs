//! Construction-time configuration for an admin session.
//!
//! Credentials and the target site URL are supplied programmatically; there
//! is no config file and nothing is persisted.

use std::time::Duration;

/// FTP credentials for the file-transfer upload strategy.
///
/// Supplying these at construction selects FTP as the plugin-upload
/// transport. The FTP path itself is a declared capability that still needs
/// a full design; see [`crate::upload::UploadStrategy`].
#[derive(Debug, Clone)]
pub struct FtpCredentials {
    /// FTP account name.
    pub user: String,
    /// FTP account password.
    pub password: String,
}

/// Everything needed to open an authenticated admin session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Site base URL, e.g. `https://blog.example.com` (no trailing slash).
    pub site_url: String,
    /// WordPress account login.
    pub login: String,
    /// WordPress account password.
    pub password: String,
    /// Optional FTP credentials; when present, plugin uploads go over FTP.
    pub ftp: Option<FtpCredentials>,
    /// Per-request timeout. A hung network call fails instead of blocking
    /// the session forever.
    pub timeout: Duration,
}

impl SessionConfig {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Configuration with the default timeout and no FTP credentials.
    pub fn new(
        site_url: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            site_url: site_url.into(),
            login: login.into(),
            password: password.into(),
            ftp: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Supply FTP credentials, selecting the FTP upload strategy.
    pub fn with_ftp(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.ftp = Some(FtpCredentials {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_ftp_and_thirty_second_timeout() {
        let cfg = SessionConfig::new("https://example.com", "admin", "hunter2");
        assert!(cfg.ftp.is_none());
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn with_ftp_records_credentials() {
        let cfg = SessionConfig::new("https://example.com", "admin", "hunter2")
            .with_ftp("ftpuser", "ftppass");
        let ftp = cfg.ftp.expect("ftp credentials");
        assert_eq!(ftp.user, "ftpuser");
    }
}
