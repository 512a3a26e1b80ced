//! Re-hosting of source images in the CMS media library.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::multipart::{Form, Part};

use catpub_core::MediaFields;

use crate::client::CmsClient;
use crate::error::CmsError;
use crate::retry::{is_transient, is_transport, retry_with_backoff};
use crate::types::MediaCreated;

/// Bytes inspected when sniffing the MIME type of a download.
const SNIFF_LEN: usize = 2048;

const FALLBACK_MIME: &str = "application/octet-stream";

const IMAGE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/95.0.4638.69 Safari/537.36";

/// A media item created by [`CmsClient::upload_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub id: u64,
    pub source_url: String,
}

impl CmsClient {
    /// Downloads `url` and re-uploads it to the media library with `title`
    /// as its caption.
    ///
    /// Returns `None` when either step ends without success; the cause is
    /// logged here so callers only decide whether to abort.
    pub async fn upload_image(&self, url: &str, title: &str) -> Option<UploadedMedia> {
        let bytes = match self.download_image(url).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(url, error = %e, "image download failed");
                return None;
            }
        };

        let file_name = media_file_name(url, chrono::Utc::now().timestamp_millis());
        let mime = sniff_mime(&bytes);

        match self.post_media(bytes, &file_name, mime, title).await {
            Ok(media) => {
                tracing::info!(url, media_id = media.id, file_name = %file_name, "image uploaded");
                Some(media)
            }
            Err(e) => {
                tracing::error!(url, file_name = %file_name, error = %e, "image upload failed");
                None
            }
        }
    }

    /// GET without redirects. `Ok(None)` for any status other than 200.
    async fn download_image(&self, url: &str) -> Result<Option<Vec<u8>>, CmsError> {
        let headers = image_headers();
        let response = retry_with_backoff(self.policies.download, is_transport, || {
            let headers = headers.clone();
            async move { Ok(self.downloader.get(url).headers(headers).send().await?) }
        })
        .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::error!(url, status = status.as_u16(), "image download refused");
            return Ok(None);
        }
        tracing::debug!(url, "image downloaded");
        Ok(Some(response.bytes().await?.to_vec()))
    }

    async fn post_media(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        mime: &str,
        title: &str,
    ) -> Result<UploadedMedia, CmsError> {
        let url = self.media_url();
        let fields = self.media_fields;

        retry_with_backoff(self.policies.upload, is_transient, || {
            let url = url.clone();
            let file = Part::bytes(bytes.clone()).file_name(file_name.to_owned());
            async move {
                let file = file.mime_str(mime)?;
                let mut form = Form::new().part("file", file).text("caption", title.to_owned());
                if fields == MediaFields::Full {
                    form = form
                        .text("title", title.to_owned())
                        .text("alt_text", title.to_owned());
                }

                let response = self
                    .authed(self.client.post(url.clone()))
                    .multipart(form)
                    .send()
                    .await?;
                let status = response.status();
                if status != reqwest::StatusCode::CREATED {
                    return Err(CmsError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                let body = response.text().await?;
                let created: MediaCreated =
                    serde_json::from_str(&body).map_err(|e| CmsError::Deserialize {
                        context: format!("media upload ({file_name})"),
                        source: e,
                    })?;
                Ok(UploadedMedia {
                    id: created.id,
                    source_url: created.source_url,
                })
            }
        })
        .await
    }
}

fn image_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("image"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("no-cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-site"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(IMAGE_UA));
    headers
}

/// `scrape_{millis}.{ext}` where `ext` is whatever follows the last dot of
/// the URL's final path segment, cut at any `?` or `#`.
pub(crate) fn media_file_name(url: &str, millis: i64) -> String {
    let segment = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let ext = segment.rsplit_once('.').map_or("", |(_, ext)| ext);

    if ext.is_empty() {
        format!("scrape_{millis}")
    } else {
        format!("scrape_{millis}.{ext}")
    }
}

/// MIME type from the magic bytes at the head of `bytes`.
pub(crate) fn sniff_mime(bytes: &[u8]) -> &'static str {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    image::guess_format(head).map_or(FALLBACK_MIME, |format| format.to_mime_type())
}
