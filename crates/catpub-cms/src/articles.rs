//! Article creation and category updates.

use std::sync::LazyLock;

use catpub_core::{CategoryIds, ProductRecord};
use regex::Regex;

use crate::client::CmsClient;
use crate::error::CmsError;
use crate::media::UploadedMedia;
use crate::retry::{is_transient, retry_with_backoff};
use crate::types::{ArticleMeta, CategoryUpdate, Created, NewArticle};

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid regex"));

static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\ssrc\s*=\s*['"]([^'"]+)['"]"#).expect("valid regex")
});

/// Author and status stamped on every article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDefaults {
    pub author_id: u64,
    pub status: String,
}

impl Default for ArticleDefaults {
    fn default() -> Self {
        Self {
            author_id: 1,
            status: "publish".to_owned(),
        }
    }
}

impl CmsClient {
    /// Publishes a product article with its two images re-hosted first.
    ///
    /// The small image becomes the featured media and the big one the
    /// `structure_pic` field. No article is created unless both uploads
    /// succeed.
    ///
    /// # Errors
    ///
    /// - [`CmsError::MediaUnavailable`] if either image could not be re-hosted.
    /// - [`CmsError::UnexpectedStatus`] if the create answer is not 201.
    /// - [`CmsError::Http`] / [`CmsError::Deserialize`] on transport or body
    ///   failures.
    pub async fn publish_product(&self, record: &ProductRecord) -> Result<u64, CmsError> {
        let featured = self.require_media(&record.small_image_url, &record.title).await?;
        let structure = self.require_media(&record.big_image_url, &record.title).await?;

        let article = NewArticle {
            title: &record.title,
            content: "",
            status: &self.article_defaults.status,
            author: self.article_defaults.author_id,
            categories: join_ids(&record.category_ids),
            featured_media: Some(featured.id),
            meta: Some(ArticleMeta {
                product_id: &record.product_id,
                price: &record.price,
                structure_pic: structure.id,
                table1: &record.table1_html,
                table2: &record.table2_html,
                size: &record.size,
            }),
        };

        let id = self.create_article(&article).await?;
        tracing::info!(
            product_id = %record.product_id,
            article_id = id,
            categories = %article.categories,
            "product article created"
        );
        Ok(id)
    }

    /// Replaces the category list of an existing article.
    ///
    /// Callers pass the union of stored and newly resolved ids; the CMS
    /// itself overwrites the field.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::UnexpectedStatus`] unless the answer is 200, after
    /// retries for 5xx, or [`CmsError::Http`] on transport failure.
    pub async fn update_article_categories(
        &self,
        article_id: u64,
        category_ids: &CategoryIds,
    ) -> Result<(), CmsError> {
        let url = self.post_url(article_id);
        let update = CategoryUpdate {
            categories: join_ids(category_ids),
        };

        retry_with_backoff(self.policies.article, is_transient, || {
            let url = url.clone();
            let update = &update;
            async move {
                let response = self
                    .authed(self.client.post(url.clone()))
                    .json(update)
                    .send()
                    .await?;
                let status = response.status();
                if status != reqwest::StatusCode::OK {
                    return Err(CmsError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Ok(())
            }
        })
        .await?;

        tracing::info!(article_id, categories = %update.categories, "article categories updated");
        Ok(())
    }

    /// Re-hosts every `<img src>` in `content` and points the tags at the
    /// uploaded copies.
    ///
    /// Only the `src` value of each tag changes. Tags without a `src` and
    /// the text between tags are left alone. Images that fail to upload keep their original URL. The first
    /// successful upload is returned as the featured media id.
    pub async fn rewrite_content_images(&self, content: &str, title: &str) -> (String, Option<u64>) {
        let mut rewritten = String::with_capacity(content.len());
        let mut featured = None;
        let mut last = 0;

        for tag in IMG_TAG.find_iter(content) {
            let Some(src) = SRC_ATTR.captures(tag.as_str()).and_then(|c| c.get(1)) else {
                continue;
            };
            rewritten.push_str(&content[last..tag.start()]);
            last = tag.end();

            match self.upload_image(src.as_str(), title).await {
                Some(UploadedMedia { id, source_url }) => {
                    featured.get_or_insert(id);
                    rewritten.push_str(&tag.as_str()[..src.start()]);
                    rewritten.push_str(&source_url);
                    rewritten.push_str(&tag.as_str()[src.end()..]);
                }
                None => rewritten.push_str(tag.as_str()),
            }
        }
        rewritten.push_str(&content[last..]);

        (rewritten, featured)
    }

    /// Publishes a free-form article whose inline images are re-hosted first.
    ///
    /// # Errors
    ///
    /// - [`CmsError::EmptyArticle`] if `title` or `content` is blank.
    /// - The create-call errors listed on [`CmsClient::publish_product`].
    pub async fn publish_content_article(
        &self,
        title: &str,
        content: &str,
        category_ids: &CategoryIds,
    ) -> Result<u64, CmsError> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(CmsError::EmptyArticle);
        }

        let (content, featured_media) = self.rewrite_content_images(content, title).await;
        let article = NewArticle {
            title,
            content: &content,
            status: &self.article_defaults.status,
            author: self.article_defaults.author_id,
            categories: join_ids(category_ids),
            featured_media,
            meta: None,
        };

        let id = self.create_article(&article).await?;
        tracing::info!(title, article_id = id, "content article created");
        Ok(id)
    }

    async fn require_media(&self, url: &str, title: &str) -> Result<UploadedMedia, CmsError> {
        self.upload_image(url, title)
            .await
            .ok_or_else(|| CmsError::MediaUnavailable {
                url: url.to_owned(),
            })
    }

    async fn create_article(&self, article: &NewArticle<'_>) -> Result<u64, CmsError> {
        let url = self.posts_url();

        retry_with_backoff(self.policies.article, is_transient, || {
            let url = url.clone();
            async move {
                let response = self
                    .authed(self.client.post(url.clone()))
                    .json(article)
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
                let created: Created =
                    serde_json::from_str(&body).map_err(|e| CmsError::Deserialize {
                        context: format!("article create ({})", article.title),
                        source: e,
                    })?;
                Ok(created.id)
            }
        })
        .await
    }
}

/// Comma-joined ids in ascending order.
fn join_ids(ids: &CategoryIds) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
