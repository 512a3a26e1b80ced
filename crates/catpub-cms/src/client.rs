//! HTTP client for the CMS REST API and its product lookup endpoint.
//!
//! Wraps two `reqwest` clients: one for authenticated REST calls and one for
//! downloading source images, which must not follow redirects. Each remote
//! operation lives in its own module (`categories`, `existence`, `media`,
//! `articles`) as an `impl CmsClient` block.

use std::time::Duration;

use catpub_core::{MediaFields, RetryPolicy};
use reqwest::{Client, RequestBuilder, Url};

use crate::articles::ArticleDefaults;
use crate::error::CmsError;

const POSTS_PATH: &str = "wp-json/wp/v2/posts";
const CATEGORIES_PATH: &str = "wp-json/wp/v2/categories";
const MEDIA_PATH: &str = "wp-json/wp/v2/media";
const LOOKUP_PATH: &str = "product_Api.php";

/// Retry schedules for each kind of CMS call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmsPolicies {
    pub lookup: RetryPolicy,
    pub category: RetryPolicy,
    pub download: RetryPolicy,
    pub upload: RetryPolicy,
    pub article: RetryPolicy,
}

impl Default for CmsPolicies {
    fn default() -> Self {
        Self {
            lookup: RetryPolicy::existence_lookup(),
            category: RetryPolicy::category_create(),
            download: RetryPolicy::image_download(),
            upload: RetryPolicy::media_upload(),
            article: RetryPolicy::article_write(),
        }
    }
}

impl CmsPolicies {
    /// Same attempt caps as [`CmsPolicies::default`] without any waiting.
    #[must_use]
    pub fn immediate() -> Self {
        let d = Self::default();
        Self {
            lookup: RetryPolicy::immediate(d.lookup.attempts),
            category: RetryPolicy::immediate(d.category.attempts),
            download: RetryPolicy::immediate(d.download.attempts),
            upload: RetryPolicy::immediate(d.upload.attempts),
            article: RetryPolicy::immediate(d.article.attempts),
        }
    }
}

/// Client for the CMS REST API.
///
/// Use [`CmsClient::new`] with the production origin, or point it at a
/// wiremock server in tests.
pub struct CmsClient {
    pub(crate) client: Client,
    pub(crate) downloader: Client,
    base_url: Url,
    user: String,
    app_password: String,
    pub(crate) policies: CmsPolicies,
    pub(crate) media_fields: MediaFields,
    pub(crate) article_defaults: ArticleDefaults,
}

impl CmsClient {
    /// Creates a client for the CMS at `base_url` authenticating as `user`.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::InvalidBaseUrl`] if `base_url` does not parse and
    /// [`CmsError::Http`] if either `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        user: &str,
        app_password: &str,
        timeout_secs: u64,
        image_timeout_secs: u64,
    ) -> Result<Self, CmsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let downloader = Client::builder()
            .timeout(Duration::from_secs(image_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CmsError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            downloader,
            base_url: parsed,
            user: user.to_owned(),
            app_password: app_password.to_owned(),
            policies: CmsPolicies::default(),
            media_fields: MediaFields::Full,
            article_defaults: ArticleDefaults::default(),
        })
    }

    #[must_use]
    pub fn with_policies(mut self, policies: CmsPolicies) -> Self {
        self.policies = policies;
        self
    }

    #[must_use]
    pub fn with_media_fields(mut self, fields: MediaFields) -> Self {
        self.media_fields = fields;
        self
    }

    #[must_use]
    pub fn with_article_defaults(mut self, defaults: ArticleDefaults) -> Self {
        self.article_defaults = defaults;
        self
    }

    pub(crate) fn posts_url(&self) -> Url {
        self.endpoint(POSTS_PATH)
    }

    pub(crate) fn post_url(&self, article_id: u64) -> Url {
        self.endpoint(&format!("{POSTS_PATH}/{article_id}"))
    }

    pub(crate) fn categories_url(&self) -> Url {
        self.endpoint(CATEGORIES_PATH)
    }

    pub(crate) fn media_url(&self) -> Url {
        self.endpoint(MEDIA_PATH)
    }

    pub(crate) fn lookup_url(&self, product_id: &str) -> Url {
        let mut url = self.endpoint(LOOKUP_PATH);
        url.query_pairs_mut().append_pair("product_id", product_id);
        url
    }

    /// Adds basic-auth credentials to `request`.
    pub(crate) fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.user, Some(&self.app_password))
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{path}", url.path());
        url.set_path(&joined);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CmsClient {
        CmsClient::new(base, "publisher", "secret", 5, 5).unwrap()
    }

    #[test]
    fn endpoints_join_onto_origin() {
        let cms = client("https://products.com");
        assert_eq!(
            cms.posts_url().as_str(),
            "https://products.com/wp-json/wp/v2/posts"
        );
        assert_eq!(
            cms.post_url(5).as_str(),
            "https://products.com/wp-json/wp/v2/posts/5"
        );
        assert_eq!(
            cms.categories_url().as_str(),
            "https://products.com/wp-json/wp/v2/categories"
        );
        assert_eq!(
            cms.media_url().as_str(),
            "https://products.com/wp-json/wp/v2/media"
        );
    }

    #[test]
    fn endpoints_keep_base_path() {
        let cms = client("https://example.com/blog/");
        assert_eq!(
            cms.posts_url().as_str(),
            "https://example.com/blog/wp-json/wp/v2/posts"
        );
    }

    #[test]
    fn lookup_url_encodes_product_id() {
        let cms = client("https://products.com");
        assert_eq!(
            cms.lookup_url("6201 2RS/C3").as_str(),
            "https://products.com/product_Api.php?product_id=6201+2RS%2FC3"
        );
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let result = CmsClient::new("products", "u", "p", 5, 5);
        assert!(matches!(result, Err(CmsError::InvalidBaseUrl { .. })));
    }
}
