//! Rank scraped agents by responsiveness score.
//!
//! Reads `scraped_data.json` and writes
//! `normalised_responsiveness_score_data.json`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mindshare_scraper::{score, ScoreConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    score::run(&ScoreConfig::default())?;
    Ok(())
}
