use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to parse {context}: {reason}")]
    Parse { context: String, reason: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ScraperError {
    pub(crate) fn parse(context: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            context: context.to_owned(),
            reason: reason.into(),
        }
    }
}
