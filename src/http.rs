//! HTTP client wrapping reqwest.
//!
//! Not a browser — just HTTP requests with a shared cookie jar and headers
//! that mimic a common desktop browser, so the admin interface treats the
//! session like an ordinary logged-in visitor. Redirects are followed (the
//! login flow depends on landing on the resolved login URL) and every
//! request carries an explicit timeout.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION};
use url::Url;

use crate::error::Result;

/// Fixed desktop user-agent sent on every request.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Response from a single HTTP request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for the admin session.
///
/// The cookie jar is the session: whatever the server sets during login is
/// replayed on every later request, and the jar can be inspected to confirm
/// the authentication cookie is present.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    jar: Arc<Jar>,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with browser-mimicking headers and a fresh cookie jar.
    pub fn new(timeout: Duration) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(CONNECTION, HeaderValue::from_static("Keep-Alive"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_provider(jar.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            jar,
            timeout,
        })
    }

    /// Perform a single GET request. No retries.
    pub async fn get(&self, url: &str, extra_headers: &[(String, String)]) -> Result<HttpResponse> {
        let mut builder = self.client.get(url).timeout(self.timeout);
        for (name, value) in extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let r = builder.send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await.unwrap_or_default();

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            body,
        })
    }

    /// POST url-encoded form data.
    pub async fn post_form(
        &self,
        url: &str,
        form_fields: &[(String, String)],
        extra_headers: &[(String, String)],
    ) -> Result<HttpResponse> {
        let mut builder = self.client.post(url).timeout(self.timeout);
        for (name, value) in extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = builder.form(form_fields);

        let r = builder.send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await.unwrap_or_default();

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            body,
        })
    }

    /// POST a multipart body (plugin archive uploads).
    pub async fn post_multipart(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
        extra_headers: &[(String, String)],
    ) -> Result<HttpResponse> {
        let mut builder = self.client.post(url).timeout(self.timeout);
        for (name, value) in extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = builder.multipart(form);

        let r = builder.send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await.unwrap_or_default();

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            body,
        })
    }

    /// Seed a cookie into the jar for the given URL.
    pub fn set_cookie(&self, url: &Url, cookie: &str) {
        self.jar.add_cookie_str(cookie, url);
    }

    /// Whether the jar holds a cookie for `url` whose name starts with
    /// `prefix`.
    pub fn has_cookie_with_prefix(&self, url: &Url, prefix: &str) -> bool {
        let Some(header) = self.jar.cookies(url) else {
            return false;
        };
        let Ok(cookies) = header.to_str() else {
            return false;
        };
        cookies.split("; ").any(|pair| {
            pair.split_once('=')
                .is_some_and(|(name, _)| name.starts_with(prefix))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_prefix_lookup_matches_seeded_cookie() {
        let client = HttpClient::new(Duration::from_secs(5)).expect("client");
        let url = Url::parse("https://example.com/wp-admin").expect("url");

        assert!(!client.has_cookie_with_prefix(&url, "wordpress_logged_in_"));

        client.set_cookie(&url, "wordpress_logged_in_abc123=token; Path=/");
        assert!(client.has_cookie_with_prefix(&url, "wordpress_logged_in_"));
        assert!(!client.has_cookie_with_prefix(&url, "wordpress_sec_"));
    }

    #[test]
    fn success_statuses_are_the_2xx_range() {
        let ok = HttpResponse {
            url: String::new(),
            final_url: String::new(),
            status: 200,
            body: String::new(),
        };
        assert!(ok.is_success());

        let redirect = HttpResponse { status: 302, ..ok.clone() };
        assert!(!redirect.is_success());

        let server_error = HttpResponse { status: 500, ..ok };
        assert!(!server_error.is_success());
    }
}
