//! HTTP access to the catalog site.

use std::time::Duration;

use catpub_core::RetryPolicy;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

/// Desktop browser identity sent with every catalog request.
pub const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.0.4758.80 Safari/537.36 Edg/98.0.1108.50";

/// GET client for the catalog site.
///
/// Certificate verification is disabled because the catalog host has served
/// broken chains in the past. The single `reqwest::Client` is reused for the
/// whole run so connections are pooled.
pub struct SiteFetcher {
    client: Client,
    site_root: Url,
    timeout: Duration,
    policy: RetryPolicy,
}

impl SiteFetcher {
    /// Creates a fetcher rooted at `site_root` with the given default timeout
    /// and transport retry policy.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `site_root` does not parse.
    /// - [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        site_root: &str,
        timeout_secs: u64,
        policy: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        let normalised = format!("{}/", site_root.trim_end_matches('/'));
        let site_root = Url::parse(&normalised).map_err(|e| ScraperError::InvalidUrl {
            url: site_root.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            site_root,
            timeout: Duration::from_secs(timeout_secs),
            policy,
        })
    }

    #[must_use]
    pub fn site_root(&self) -> &Url {
        &self.site_root
    }

    /// Sends a GET with `headers` plus the browser user agent, retrying
    /// transport failures under the fetcher's policy.
    ///
    /// Any HTTP status is returned as-is; callers inspect it themselves.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] once every attempt failed at the
    /// transport level.
    pub async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, ScraperError> {
        let mut merged = headers.cloned().unwrap_or_default();
        merged.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(BROWSER_UA),
        );

        retry_with_backoff(self.policy, || {
            let merged = merged.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .timeout(timeout)
                    .headers(merged)
                    .send()
                    .await?;
                Ok(response)
            }
        })
        .await
    }

    /// Fetches `url` and returns the body when the status is 200.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on transport failure after all retries.
    /// - [`ScraperError::UnexpectedStatus`] for anything but 200.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.fetch(url, self.timeout, None).await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalises_site_root() {
        let fetcher =
            SiteFetcher::new("https://www.lily-bearing.com", 30, RetryPolicy::immediate(1))
                .unwrap();
        assert_eq!(fetcher.site_root().as_str(), "https://www.lily-bearing.com/");
    }

    #[test]
    fn new_rejects_relative_root() {
        let result = SiteFetcher::new("lily-bearing", 30, RetryPolicy::immediate(1));
        assert!(matches!(result, Err(ScraperError::InvalidUrl { .. })));
    }
}
