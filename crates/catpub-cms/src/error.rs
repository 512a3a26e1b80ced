use thiserror::Error;

/// Errors returned by the CMS REST client.
#[derive(Debug, Error)]
pub enum CmsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CMS base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A category level resolved without a usable id, so its children
    /// cannot be attached.
    #[error("category level {level} ({name}) has no remote id")]
    MissingParent { level: usize, name: String },

    /// The product lookup endpoint itself is broken or unreachable.
    #[error("product lookup unavailable for {product_id}: {reason}")]
    LookupUnavailable { product_id: String, reason: String },

    /// An image needed by the article could not be mirrored to the CMS.
    #[error("media upload failed for {url}")]
    MediaUnavailable { url: String },

    #[error("article title and content must not be empty")]
    EmptyArticle,
}
