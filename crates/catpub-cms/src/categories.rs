//! Create-or-get resolution of category paths in the remote taxonomy.
//!
//! The remote taxonomy is the only source of truth: nothing is cached, so
//! every call re-resolves each level. A create that races another writer
//! answers "term exists" with the existing id, which is taken as-is.

use catpub_core::{CategoryIds, CategoryPath};

use crate::client::CmsClient;
use crate::error::CmsError;
use crate::retry::{is_transient, retry_with_backoff};
use crate::types::{Created, NewCategory, TermExists};

const TERM_EXISTS: &str = "term_exists";

impl CmsClient {
    /// Creates the category `name` under `parent`, or returns the id of the
    /// existing one.
    ///
    /// # Errors
    ///
    /// - [`CmsError::UnexpectedStatus`] for any status other than 201 or a
    ///   400 "term exists" answer (5xx after retries).
    /// - [`CmsError::Http`] on network failure after retries.
    /// - [`CmsError::Deserialize`] if the answer body is not the expected shape.
    pub async fn create_or_get_category(&self, name: &str, parent: u64) -> Result<u64, CmsError> {
        let url = self.categories_url();

        retry_with_backoff(self.policies.category, is_transient, || {
            let url = url.clone();
            async move {
                let response = self
                    .authed(self.client.post(url.clone()))
                    .json(&NewCategory { name, parent })
                    .send()
                    .await?;
                let status = response.status();
                let body = response.text().await?;

                if status == reqwest::StatusCode::CREATED {
                    let created: Created =
                        serde_json::from_str(&body).map_err(|e| CmsError::Deserialize {
                            context: format!("category create ({name})"),
                            source: e,
                        })?;
                    tracing::debug!(name, parent, id = created.id, "category created");
                    return Ok(created.id);
                }

                if status == reqwest::StatusCode::BAD_REQUEST {
                    if let Ok(existing) = serde_json::from_str::<TermExists>(&body) {
                        if existing.code == TERM_EXISTS {
                            tracing::debug!(
                                name,
                                parent,
                                id = existing.data.term_id,
                                "category already exists"
                            );
                            return Ok(existing.data.term_id);
                        }
                    }
                }

                Err(CmsError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            }
        })
        .await
    }
}

/// Resolves category paths to remote leaf ids, one level at a time.
pub struct CategoryResolver<'a> {
    cms: &'a CmsClient,
    root_id: u64,
}

impl<'a> CategoryResolver<'a> {
    /// `root_id` is the parent of every first-level category.
    #[must_use]
    pub fn new(cms: &'a CmsClient, root_id: u64) -> Self {
        Self { cms, root_id }
    }

    /// Resolves every level of `path` left to right and returns the leaf id.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::MissingParent`] when a non-leaf level resolves to
    /// id 0, and propagates any error from
    /// [`CmsClient::create_or_get_category`]. Resolution stops at the first
    /// failing level.
    pub async fn resolve_leaf(&self, path: &CategoryPath) -> Result<u64, CmsError> {
        let mut parent = self.root_id;
        let levels = path.levels();

        for (idx, level) in levels.iter().enumerate() {
            let id = self.cms.create_or_get_category(&level.name, parent).await?;
            let is_leaf = idx + 1 == levels.len();
            if id == 0 && !is_leaf {
                return Err(CmsError::MissingParent {
                    level: idx + 1,
                    name: level.name.clone(),
                });
            }
            parent = id;
        }

        tracing::info!(
            path = %path,
            depth = path.depth(),
            leaf = %path.leaf().name,
            leaf_id = parent,
            "category path resolved"
        );
        Ok(parent)
    }

    /// Resolves each path and collects the leaf ids.
    ///
    /// # Errors
    ///
    /// Fails on the first path that cannot be resolved, so callers never see
    /// a partial set.
    pub async fn resolve(&self, paths: &[CategoryPath]) -> Result<CategoryIds, CmsError> {
        let mut ids = CategoryIds::new();
        for path in paths {
            ids.insert(self.resolve_leaf(path).await?);
        }
        Ok(ids)
    }
}
