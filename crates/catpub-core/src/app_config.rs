/// How the existence lookup answer is interpreted by the crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceMode {
    /// Any existing product is skipped.
    Bare,
    /// Existing products with metadata get their categories merged.
    Reconciling,
}

impl std::fmt::Display for ExistenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExistenceMode::Bare => write!(f, "bare"),
            ExistenceMode::Reconciling => write!(f, "reconciling"),
        }
    }
}

/// Which multipart text fields accompany an uploaded media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFields {
    /// `file`, `title`, `alt_text`, `caption`
    Full,
    /// `file`, `caption`
    Legacy,
}

impl std::fmt::Display for MediaFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaFields::Full => write!(f, "full"),
            MediaFields::Legacy => write!(f, "legacy"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub cms_base_url: String,
    pub cms_user: String,
    pub cms_app_password: String,
    pub site_root: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub image_timeout_secs: u64,
    pub product_delay_ms: u64,
    pub failure_pause_ms: u64,
    pub root_category_id: u64,
    pub existence_mode: ExistenceMode,
    pub media_fields: MediaFields,
    pub author_id: u64,
    pub post_status: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("cms_base_url", &self.cms_base_url)
            .field("cms_user", &self.cms_user)
            .field("cms_app_password", &"[redacted]")
            .field("site_root", &self.site_root)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("product_delay_ms", &self.product_delay_ms)
            .field("failure_pause_ms", &self.failure_pause_ms)
            .field("root_category_id", &self.root_category_id)
            .field("existence_mode", &self.existence_mode)
            .field("media_fields", &self.media_fields)
            .field("author_id", &self.author_id)
            .field("post_status", &self.post_status)
            .finish()
    }
}
