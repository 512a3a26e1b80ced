//! Per-product pipeline: existence check, then update or scrape and publish.

use anyhow::Context;
use catpub_core::{CategoryIds, ExistenceMode, ExistenceResult, ProductRecord};
use catpub_scraper::ProductAnchor;

use super::Crawler;

/// Final state of one product link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProductOutcome {
    Created { article_id: u64 },
    Updated { article_id: u64 },
    Skipped { reason: &'static str },
}

/// `"{product_id} Bearing {level2} {size}"`, dropping empty parts.
pub(crate) fn build_title(product_id: &str, level2: &str, size: &str) -> String {
    [product_id, "Bearing", level2, size]
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Crawler<'_> {
    pub(super) async fn process_product(
        &self,
        anchor: &ProductAnchor,
        category_ids: &CategoryIds,
        level2: &str,
    ) -> anyhow::Result<ProductOutcome> {
        if anchor.href.is_empty() || anchor.product_id.is_empty() {
            tracing::warn!(product_id = %anchor.product_id, href = %anchor.href, "incomplete product link; skipping");
            return Ok(ProductOutcome::Skipped {
                reason: "incomplete link",
            });
        }

        let existence = self.cms.check_existence(&anchor.product_id).await?;
        match (self.settings.existence_mode, existence) {
            (_, ExistenceResult::Absent) => {}
            (ExistenceMode::Bare, _) => {
                tracing::info!(product_id = %anchor.product_id, "already published; skipping");
                return Ok(ProductOutcome::Skipped {
                    reason: "already published",
                });
            }
            (ExistenceMode::Reconciling, ExistenceResult::ExistsBare) => {
                tracing::warn!(
                    product_id = %anchor.product_id,
                    "lookup reported the product without metadata; skipping"
                );
                return Ok(ProductOutcome::Skipped {
                    reason: "exists without metadata",
                });
            }
            (
                ExistenceMode::Reconciling,
                ExistenceResult::ExistsWithMeta {
                    article_id,
                    category_ids: stored,
                },
            ) => {
                let merged: CategoryIds = stored.union(category_ids).copied().collect();
                tracing::warn!(product_id = %anchor.product_id, article_id, "exists; updating categories");
                self.cms
                    .update_article_categories(article_id, &merged)
                    .await?;
                return Ok(ProductOutcome::Updated { article_id });
            }
        }

        let url = catpub_scraper::resolve_site_url(self.fetcher.site_root(), &anchor.href)?;
        tracing::info!(product_id = %anchor.product_id, url = %url, "scraping product");

        let html = self
            .fetcher
            .fetch_page(&url)
            .await
            .with_context(|| format!("fetching product page {url}"))?;
        let page = catpub_scraper::parse_product_page(&html, self.fetcher.site_root())
            .with_context(|| format!("parsing product page {url}"))?;

        let size = page.table.derive_size();
        let (table1_html, table2_html) = page.table.normalize().render();

        let record = ProductRecord {
            title: build_title(&page.product_id, level2, &size),
            product_id: page.product_id,
            category_ids: category_ids.clone(),
            small_image_url: page.small_image_url,
            big_image_url: page.big_image_url,
            price: page.price,
            table1_html,
            table2_html,
            size,
        };

        let article_id = self.cms.publish_product(&record).await?;
        Ok(ProductOutcome::Created { article_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_with_all_parts() {
        assert_eq!(
            build_title("6201", "Deep Groove Ball Bearings", "12×32×10"),
            "6201 Bearing Deep Groove Ball Bearings 12×32×10"
        );
    }

    #[test]
    fn title_without_size_has_no_trailing_space() {
        assert_eq!(
            build_title("6201", "Deep Groove Ball Bearings", ""),
            "6201 Bearing Deep Groove Ball Bearings"
        );
    }

    #[test]
    fn title_without_level2_has_single_spaces() {
        assert_eq!(build_title("6201", "", "12×32×10"), "6201 Bearing 12×32×10");
    }
}
