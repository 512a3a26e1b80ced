//! Category crawl orchestration.
//!
//! One category page is processed strictly in document order: each genre
//! block resolves its category leaves, then every product link runs to
//! completion before the next one starts. A failing product is logged,
//! counted and followed by a penalty pause; it never aborts the run.

mod product;

use std::time::Duration;

use anyhow::Context;
use catpub_cms::{CategoryResolver, CmsClient};
use catpub_core::{AppConfig, CategoryIds, CategoryPath, ExistenceMode};
use catpub_scraper::{ProductGroup, SiteFetcher};

use product::ProductOutcome;

/// Run-wide knobs taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub(crate) struct CrawlSettings {
    pub root_category_id: u64,
    pub existence_mode: ExistenceMode,
    pub product_delay: Duration,
    pub failure_pause: Duration,
}

impl CrawlSettings {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            root_category_id: config.root_category_id,
            existence_mode: config.existence_mode,
            product_delay: Duration::from_millis(config.product_delay_ms),
            failure_pause: Duration::from_millis(config.failure_pause_ms),
        }
    }
}

/// Per-run product counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CrawlTotals {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CrawlTotals {
    fn record(&mut self, outcome: &ProductOutcome) {
        match outcome {
            ProductOutcome::Created { .. } => self.created += 1,
            ProductOutcome::Updated { .. } => self.updated += 1,
            ProductOutcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

pub(crate) struct Crawler<'a> {
    fetcher: &'a SiteFetcher,
    cms: &'a CmsClient,
    settings: CrawlSettings,
}

impl<'a> Crawler<'a> {
    pub(crate) fn new(fetcher: &'a SiteFetcher, cms: &'a CmsClient, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            cms,
            settings,
        }
    }

    /// Crawls the category page at `link`.
    ///
    /// # Errors
    ///
    /// Fails only when the category page itself cannot be fetched or parsed.
    /// Per-genre and per-product failures are counted in the returned totals.
    pub(crate) async fn run(&self, link: &str) -> anyhow::Result<CrawlTotals> {
        tracing::info!(link, mode = %self.settings.existence_mode, "crawling category");

        let html = self
            .fetcher
            .fetch_page(link)
            .await
            .with_context(|| format!("fetching category page {link}"))?;
        let page = catpub_scraper::parse_category_page(&html)
            .with_context(|| format!("parsing category page {link}"))?;

        // The product title carries the second breadcrumb level; the last
        // trail on the page wins.
        let level2 = page
            .breadcrumbs
            .last()
            .and_then(CategoryPath::level2)
            .unwrap_or_default()
            .to_owned();

        let mut totals = CrawlTotals::default();
        for group in &page.groups {
            self.crawl_group(group, &page.breadcrumbs, &level2, &mut totals)
                .await;
        }

        tracing::info!(
            created = totals.created,
            updated = totals.updated,
            skipped = totals.skipped,
            failed = totals.failed,
            "crawl complete"
        );
        Ok(totals)
    }

    async fn crawl_group(
        &self,
        group: &ProductGroup,
        breadcrumbs: &[CategoryPath],
        level2: &str,
        totals: &mut CrawlTotals,
    ) {
        tracing::info!(genre = %group.genre, products = group.products.len(), "crawling genre");

        let category_ids = match self.resolve_group(group, breadcrumbs).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(
                    genre = %group.genre,
                    error = %format!("{e:#}"),
                    "category resolution failed; skipping genre"
                );
                totals.failed += group.products.len();
                tokio::time::sleep(self.settings.failure_pause).await;
                return;
            }
        };

        for anchor in &group.products {
            tokio::time::sleep(self.settings.product_delay).await;

            match self.process_product(anchor, &category_ids, level2).await {
                Ok(outcome) => {
                    log_outcome(&anchor.product_id, &outcome);
                    totals.record(&outcome);
                }
                Err(e) => {
                    tracing::error!(
                        product_id = %anchor.product_id,
                        href = %anchor.href,
                        error = %format!("{e:#}"),
                        "product failed"
                    );
                    totals.failed += 1;
                    tokio::time::sleep(self.settings.failure_pause).await;
                }
            }
        }
    }

    /// Leaf ids of every breadcrumb trail extended with the group's genre.
    async fn resolve_group(
        &self,
        group: &ProductGroup,
        breadcrumbs: &[CategoryPath],
    ) -> anyhow::Result<CategoryIds> {
        let paths = breadcrumbs
            .iter()
            .map(|trail| trail.with_child(&group.genre))
            .collect::<Result<Vec<_>, _>>()?;

        let resolver = CategoryResolver::new(self.cms, self.settings.root_category_id);
        Ok(resolver.resolve(&paths).await?)
    }
}

fn log_outcome(product_id: &str, outcome: &ProductOutcome) {
    match outcome {
        ProductOutcome::Created { article_id } => {
            tracing::info!(product_id, article_id, "product published");
        }
        ProductOutcome::Updated { article_id } => {
            tracing::info!(product_id, article_id, "product categories merged");
        }
        ProductOutcome::Skipped { reason } => {
            tracing::info!(product_id, reason, "product skipped");
        }
    }
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;
