//! # Mindshare Scraper
//!
//! Collects the cookie.fun AI agent leaderboard (agent metadata plus Twitter
//! engagement metrics) into a local JSON file, and ranks the collected agents
//! by a responsiveness score.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────┐  page N   ┌──────────────────┐
//!   │  scrape_all    │──────────▶│  ProjectSource   │
//!   │ (page cursor,  │◀──────────│  (CookieClient)  │
//!   │  accumulator)  │  records  └──────────────────┘
//!   └───────┬────────┘
//!           ▼
//!   scraped_data.json ──▶ score::run ──▶ normalised_responsiveness_score_data.json
//! ```
//!
//! ## Scrape Flow
//! 1. Request page 1, 2, 3, ... one at a time
//! 2. Stop at the first empty page or the first failed request
//! 3. Write every record gathered so far as a JSON array
//!
//! ## Modules
//! - `cookie`: query payload, HTTP client and response parsing
//! - `scrape`: fetch loop and output writer
//! - `score`: responsiveness scoring and ranking
//! - `config`: endpoint, page size and file locations

pub mod config;
pub mod cookie;
pub mod score;
pub mod scrape;

pub use config::{ScoreConfig, ScrapeConfig};
pub use cookie::{CookieClient, FetchError, ProjectSource, ProjectsPage};
pub use scrape::{scrape_all, ScrapeOutcome, StopReason};
