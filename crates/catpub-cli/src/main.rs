mod crawl;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catpub_cms::{ArticleDefaults, CmsClient};
use catpub_core::RetryPolicy;
use catpub_scraper::SiteFetcher;

use crate::crawl::{CrawlSettings, Crawler};

#[derive(Debug, Parser)]
#[command(name = "catpub")]
#[command(about = "Crawl catalog categories and publish products to the CMS")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl one category page and publish or update every product on it
    Crawl {
        /// Category page URL
        #[arg(long)]
        link: Option<String>,

        /// Parent id for top-level categories (overrides `CATPUB_ROOT_CATEGORY_ID`)
        #[arg(long)]
        father: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Usage errors take precedence over config errors.
    let (link, father) = match crawl_args(cli.command) {
        Ok(args) => args,
        Err(reason) => {
            init_tracing("info")?;
            exit_with_usage(reason);
        }
    };

    let config = catpub_core::load_app_config_from_env()?;
    init_tracing(&config.log_level)?;

    let fetcher = SiteFetcher::new(
        &config.site_root,
        config.request_timeout_secs,
        RetryPolicy::page_fetch(),
    )?;
    let cms = CmsClient::new(
        &config.cms_base_url,
        &config.cms_user,
        &config.cms_app_password,
        config.request_timeout_secs,
        config.image_timeout_secs,
    )?
    .with_media_fields(config.media_fields)
    .with_article_defaults(ArticleDefaults {
        author_id: config.author_id,
        status: config.post_status.clone(),
    });

    let mut settings = CrawlSettings::from_config(&config);
    if let Some(father) = father {
        settings.root_category_id = father;
    }

    let crawler = Crawler::new(&fetcher, &cms, settings);
    let totals = crawler.run(&link).await?;

    if totals.failed > 0 {
        tracing::warn!(failed = totals.failed, "some products failed during the crawl");
    }
    Ok(())
}

/// Link and optional root override of a `crawl` invocation.
fn crawl_args(command: Option<Commands>) -> Result<(String, Option<u64>), &'static str> {
    let Some(Commands::Crawl { link, father }) = command else {
        return Err("no command given");
    };
    match link.map(|l| l.trim().to_owned()) {
        Some(link) if !link.is_empty() => Ok((link, father)),
        _ => Err("category link is empty"),
    }
}

/// `RUST_LOG` wins; otherwise `default_level`.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

fn exit_with_usage(reason: &str) -> ! {
    tracing::error!("{reason}");
    tracing::info!("--help         Show param help.");
    std::process::exit(1);
}

#[cfg(test)]
mod tests;
