//! Scrape the cookie.fun agents table into `scraped_data.json`.
//!
//! Fetch failures only end pagination early; the records gathered up to
//! that point are still written and the process exits normally.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mindshare_scraper::{scrape, ScrapeConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    scrape::run(&ScrapeConfig::default()).await?;
    Ok(())
}
