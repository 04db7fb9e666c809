//! Plugin-archive upload strategies.
//!
//! Two transports are declared for getting a plugin archive onto the site,
//! selected by which credentials the session was constructed with:
//!
//! - **Http** — drive the admin upload form directly: fetch the upload page
//!   for its one-time `_wpnonce` token, then POST the archive as a
//!   multipart body. Used when only site credentials were supplied.
//! - **Ftp** — copy the archive over FTP into the plugin directory. Selected
//!   when FTP credentials were supplied, but the transfer itself still needs
//!   a full design; it currently surfaces [`Error::Unsupported`].

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};
use url::Url;

use crate::config::FtpCredentials;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::scrape;

/// Relative URL of the page whose form carries the upload nonce.
const UPLOAD_PAGE: &str = "plugin-install.php?tab=upload";

/// Relative URL the upload form posts to.
const UPLOAD_ENDPOINT: &str = "update.php?action=upload-plugin";

/// A plugin archive to install, typically a zip file read from disk.
#[derive(Debug, Clone)]
pub struct PluginArchive {
    /// File name presented to the upload form, e.g. `my-plugin.zip`.
    pub file_name: String,
    /// Raw archive bytes.
    pub bytes: Vec<u8>,
}

impl PluginArchive {
    /// Wrap raw archive bytes under the given file name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// How plugin archives reach the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStrategy {
    /// Direct multipart POST to the admin upload endpoint.
    Http,
    /// File transfer into the plugin directory.
    Ftp,
}

impl UploadStrategy {
    /// Pick the strategy from the credentials supplied at construction:
    /// FTP credentials select the FTP transport, otherwise HTTP.
    pub fn from_credentials(ftp: Option<&FtpCredentials>) -> Self {
        if ftp.is_some() {
            UploadStrategy::Ftp
        } else {
            UploadStrategy::Http
        }
    }
}

/// Upload and install an archive through the admin upload form.
///
/// Fetches the upload page, scrapes the hidden `_wpnonce` token, and posts
/// the archive with it. Any non-success status on either round trip is
/// surfaced as [`Error::UnexpectedStatus`].
pub async fn install_via_http(
    client: &HttpClient,
    admin_base: &Url,
    archive: PluginArchive,
    headers: &[(String, String)],
) -> Result<()> {
    let upload_page_url = admin_base.join(UPLOAD_PAGE)?;
    let page = client.get(upload_page_url.as_str(), headers).await?;
    if !page.is_success() {
        return Err(Error::UnexpectedStatus {
            url: page.url,
            status: page.status,
        });
    }

    let nonce = scrape::find_nonce(&page.body)?;
    debug!(file = %archive.file_name, "scraped upload nonce");

    let file_name = archive.file_name.clone();
    let part = Part::bytes(archive.bytes)
        .file_name(archive.file_name)
        .mime_str("application/zip")?;
    let form = Form::new()
        .text("_wpnonce", nonce)
        .text("install-plugin-submit", "Install Now")
        .part("pluginzip", part);

    let endpoint = admin_base.join(UPLOAD_ENDPOINT)?;
    let resp = client.post_multipart(endpoint.as_str(), form, headers).await?;
    if !resp.is_success() {
        return Err(Error::UnexpectedStatus {
            url: resp.url,
            status: resp.status,
        });
    }

    info!(file = %file_name, "uploaded plugin archive");
    Ok(())
}

/// Upload an archive over FTP. Declared capability; not built.
pub async fn install_via_ftp(
    _credentials: &FtpCredentials,
    _archive: PluginArchive,
) -> Result<()> {
    Err(Error::Unsupported("ftp plugin upload is not implemented"))
}
