//! Query payload for the agents table endpoint.
//!
//! Everything except `page` is fixed: sort by 7-day Twitter mindshare,
//! descending, with every filter left empty.

use serde::Serialize;

/// Top-level tRPC batch input: `{ "0": { "json": <query> } }`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchInput {
    #[serde(rename = "0")]
    pub call: BatchCall,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchCall {
    pub json: TableQuery,
}

/// Arguments of `agents.getAgentsTableDetails`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    pub page: u32,
    pub limit: u32,
    pub order_column: &'static str,
    pub order_by_ascending: bool,
    pub order_data_point: &'static str,
    pub tags: Vec<String>,
    pub projects_filter: ProjectsFilter,
    pub is_watchlist: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsFilter {
    pub blockchain_filter: ChainsFilter,
    pub categories_filter: ValuesFilter,
    pub creation_date_filter: Option<String>,
    pub framework_filter: ValuesFilter,
    pub metric_filters: Vec<serde_json::Value>,
    pub project_type_filter: ValuesFilter,
    pub search_filter: String,
    pub tags_filter: ValuesFilter,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChainsFilter {
    pub chains: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValuesFilter {
    pub values: Vec<String>,
}

impl TableQuery {
    /// Query for one page, sorted by mindshare descending, unfiltered.
    pub fn for_page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            order_column: "TwitterMindshare",
            order_by_ascending: false,
            order_data_point: "_7DaysAgo",
            tags: Vec::new(),
            projects_filter: ProjectsFilter::default(),
            is_watchlist: false,
        }
    }
}

impl BatchInput {
    pub fn for_page(page: u32, limit: u32) -> Self {
        Self {
            call: BatchCall {
                json: TableQuery::for_page(page, limit),
            },
        }
    }

    /// Serialize to JSON and percent-encode for use as the `input` query value.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let raw = serde_json::to_string(self)?;
        Ok(urlencoding::encode(&raw).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_encoded_input_decodes_to_expected_query() {
        let encoded = BatchInput::for_page(3, 15).encode().unwrap();
        assert!(!encoded.contains('{'));
        assert!(!encoded.contains('"'));

        let decoded = urlencoding::decode(&encoded).unwrap();
        let value: Value = serde_json::from_str(&decoded).unwrap();
        let query = &value["0"]["json"];

        assert_eq!(query["page"], 3);
        assert_eq!(query["limit"], 15);
        assert_eq!(query["orderColumn"], "TwitterMindshare");
        assert_eq!(query["orderByAscending"], false);
        assert_eq!(query["orderDataPoint"], "_7DaysAgo");
        assert_eq!(query["isWatchlist"], false);
    }

    #[test]
    fn test_filters_are_empty() {
        let value = serde_json::to_value(TableQuery::for_page(1, 15)).unwrap();
        assert_eq!(
            value["projectsFilter"],
            json!({
                "blockchainFilter": { "chains": [] },
                "categoriesFilter": { "values": [] },
                "creationDateFilter": null,
                "frameworkFilter": { "values": [] },
                "metricFilters": [],
                "projectTypeFilter": { "values": [] },
                "searchFilter": "",
                "tagsFilter": { "values": [] },
            })
        );
        assert_eq!(value["tags"], json!([]));
    }

    #[test]
    fn test_only_page_varies() {
        let mut first = serde_json::to_value(BatchInput::for_page(1, 15)).unwrap();
        let mut second = serde_json::to_value(BatchInput::for_page(2, 15)).unwrap();
        first["0"]["json"]["page"] = Value::Null;
        second["0"]["json"]["page"] = Value::Null;
        assert_eq!(first, second);
    }
}
