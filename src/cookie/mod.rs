//! Client for the cookie.fun agents table.
//!
//! The fetch loop only needs "give me page N", so the HTTP client sits
//! behind the [`ProjectSource`] trait with [`CookieClient`] as the real
//! implementation.

mod client;
mod error;
pub mod query;

pub use client::CookieClient;
pub use error::{FetchError, FetchResult};
pub use query::{BatchInput, TableQuery};

use async_trait::async_trait;
use serde_json::Value;

/// One page of the agents table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectsPage {
    /// Agent records, passed through untouched.
    pub projects: Vec<Value>,
}

impl ProjectsPage {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }
}

/// Anything that can serve numbered pages of agent records.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Fetch page `page` (1-based).
    async fn fetch_page(&self, page: u32) -> FetchResult<ProjectsPage>;
}

/// Pull the page out of a batch response body.
///
/// The body is an array of call results; the first one carries the table at
/// `result.data.json`. That object must exist. A `projects` field that is
/// missing or not an array reads as an empty page.
pub fn extract_page(body: &Value) -> FetchResult<ProjectsPage> {
    let first = body
        .as_array()
        .and_then(|calls| calls.first())
        .ok_or_else(|| FetchError::UnexpectedShape("empty or non-array batch response".into()))?;

    let table = first
        .pointer("/result/data/json")
        .ok_or_else(|| FetchError::UnexpectedShape("missing result.data.json".into()))?;

    let table = table.as_object().ok_or_else(|| {
        FetchError::UnexpectedShape(format!("result.data.json is not an object: {}", table))
    })?;

    let projects = match table.get("projects") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    Ok(ProjectsPage { projects })
}
