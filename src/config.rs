//! Run configuration.
//!
//! Both binaries run with the defaults below and take no flags or
//! environment overrides. The structs exist so the library entry points can
//! be pointed at a different endpoint or output path (tests use this to talk
//! to a local mock server).

use std::path::PathBuf;

/// tRPC batch endpoint for the agents table. The encoded query is appended
/// directly after `input=`.
pub const COOKIE_API_URL: &str =
    "https://www.cookie.fun/api/trpc/agents.getAgentsTableDetails?batch=1&input=";

/// Records requested per page.
pub const PAGE_LIMIT: u32 = 15;

/// Where the scraper writes the aggregated records.
pub const SCRAPED_DATA_FILE: &str = "scraped_data.json";

/// Where the scorer writes the ranked agents.
pub const SCORED_DATA_FILE: &str = "normalised_responsiveness_score_data.json";

/// How many top-ranked agents the scorer reports.
pub const TOP_AGENTS: usize = 50;

/// Settings for the page fetch loop.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Endpoint prefix; the percent-encoded query is appended verbatim.
    pub api_url: String,
    pub page_limit: u32,
    pub output_path: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            api_url: COOKIE_API_URL.to_string(),
            page_limit: PAGE_LIMIT,
            output_path: PathBuf::from(SCRAPED_DATA_FILE),
        }
    }
}

impl ScrapeConfig {
    /// Same defaults, different endpoint prefix.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }
}

/// Settings for the responsiveness scorer.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub top_agents: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(SCRAPED_DATA_FILE),
            output_path: PathBuf::from(SCORED_DATA_FILE),
            top_agents: TOP_AGENTS,
        }
    }
}
