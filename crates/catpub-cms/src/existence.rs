//! Product existence lookup against `product_Api.php`.

use catpub_core::{CategoryIds, ExistenceResult};

use crate::client::CmsClient;
use crate::error::CmsError;
use crate::retry::{is_transient, retry_with_backoff};
use crate::types::{LookupExist, LookupResponse};

impl CmsClient {
    /// Asks the lookup endpoint whether `product_id` has been published.
    ///
    /// Transport failures and 5xx answers are retried under the lookup
    /// policy. Whatever still fails afterwards (including a 4xx or an
    /// unreadable body) means the lookup itself is broken, which must never
    /// be mistaken for "absent".
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::LookupUnavailable`] when no usable answer was
    /// obtained.
    pub async fn check_existence(&self, product_id: &str) -> Result<ExistenceResult, CmsError> {
        let url = self.lookup_url(product_id);

        let answer = retry_with_backoff(self.policies.lookup, is_transient, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if status != reqwest::StatusCode::OK {
                    return Err(CmsError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                let body = response.text().await?;
                serde_json::from_str::<LookupResponse>(&body).map_err(|e| CmsError::Deserialize {
                    context: format!("existence lookup ({product_id})"),
                    source: e,
                })
            }
        })
        .await
        .map_err(|e| {
            tracing::error!(product_id, error = %e, "existence lookup unavailable");
            CmsError::LookupUnavailable {
                product_id: product_id.to_owned(),
                reason: e.to_string(),
            }
        })?;

        let result = match answer.exist {
            LookupExist::Flag(false) => ExistenceResult::Absent,
            LookupExist::Flag(true) => ExistenceResult::ExistsBare,
            LookupExist::Found(meta) => ExistenceResult::ExistsWithMeta {
                article_id: meta.article_id,
                category_ids: meta
                    .categories
                    .into_iter()
                    .map(|c| c.term_id)
                    .collect::<CategoryIds>(),
            },
        };
        tracing::debug!(product_id, exists = result.exists(), "existence checked");
        Ok(result)
    }

    /// Boolean form of [`CmsClient::check_existence`].
    ///
    /// # Errors
    ///
    /// Same as [`CmsClient::check_existence`].
    pub async fn exists(&self, product_id: &str) -> Result<bool, CmsError> {
        Ok(self.check_existence(product_id).await?.exists())
    }
}
