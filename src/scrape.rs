//! Page-by-page fetch loop and the output writer.

use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::config::ScrapeConfig;
use crate::cookie::{CookieClient, FetchError, ProjectSource};

/// Why the loop stopped.
#[derive(Debug)]
pub enum StopReason {
    /// `page` came back with no records.
    Exhausted { page: u32 },
    /// Fetching `page` failed; nothing from it was kept.
    Failed { page: u32, error: FetchError },
}

/// Everything gathered by one run of [`scrape_all`].
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub records: Vec<Value>,
    /// Pages that returned records.
    pub pages_fetched: u32,
    pub stop: StopReason,
}

impl ScrapeOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self.stop, StopReason::Exhausted { .. })
    }
}

/// Fetch pages 1, 2, 3, ... until one is empty or a fetch fails.
///
/// Pages are requested strictly one at a time. A failure ends the loop the
/// same way an empty page does; whatever was gathered before it is kept.
pub async fn scrape_all<S: ProjectSource + ?Sized>(source: &S) -> ScrapeOutcome {
    let mut page: u32 = 1;
    let mut records = Vec::new();

    let stop = loop {
        tracing::info!("Fetching page {}...", page);
        match source.fetch_page(page).await {
            Ok(result) if !result.is_empty() => {
                tracing::info!("Page {} returned {} records", page, result.len());
                records.extend(result.projects);
                page += 1;
            }
            Ok(_) => {
                tracing::info!("Page {} returned no records, stopping", page);
                break StopReason::Exhausted { page };
            }
            Err(error) => {
                tracing::error!("Error fetching page {}: {}", page, error);
                break StopReason::Failed { page, error };
            }
        }
    };

    ScrapeOutcome {
        records,
        pages_fetched: page - 1,
        stop,
    }
}

/// Write `records` as a pretty-printed JSON array, replacing any existing file.
pub fn save_records(path: &Path, records: &[Value]) -> anyhow::Result<()> {
    let contents = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Scrape with the given settings and save whatever was gathered.
pub async fn run(config: &ScrapeConfig) -> anyhow::Result<ScrapeOutcome> {
    let client = CookieClient::new(config);
    let outcome = scrape_all(&client).await;

    save_records(&config.output_path, &outcome.records)?;
    tracing::info!(
        "Data scraping complete. Saved {} records from {} pages to {}",
        outcome.records.len(),
        outcome.pages_fetched,
        config.output_path.display()
    );

    Ok(outcome)
}
