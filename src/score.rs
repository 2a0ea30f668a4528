//! Responsiveness score over scraped agent records.
//!
//! Each agent gets a weighted sum of five Twitter engagement ratios:
//!
//! | metric | weight | definition                                            |
//! |--------|--------|-------------------------------------------------------|
//! | ER     | 0.3    | 7-day engagements / 7-day impressions                 |
//! | SEP    | 0.2    | 7-day smart engagement points / current followers     |
//! | FGR    | 0.2    | (current followers - followers 7 days ago) / the latter |
//! | MS     | 0.2    | 7-day mindshare / mindshare of similar projects       |
//! | BTI    | 0.1    | mean engagements (`item5`) of the 7-day best tweets   |
//!
//! Raw scores are then rescaled to 0..100 across all agents and sorted
//! descending.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ScoreConfig;

/// Stand-in for a missing denominator. Never passes [`safe_div`].
const EPSILON: f64 = 1e-6;

const WEIGHT_ER: f64 = 0.3;
const WEIGHT_SEP: f64 = 0.2;
const WEIGHT_FGR: f64 = 0.2;
const WEIGHT_MS: f64 = 0.2;
const WEIGHT_BTI: f64 = 0.1;

/// Score given to everyone when all raw scores are equal.
const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("expected an object at {0}")]
    NotAnObject(String),

    #[error("expected a number at {0}")]
    NotANumber(String),

    #[error("unexpected value at {0}")]
    InvalidField(String),
}

/// One ranked agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentScore {
    pub name: String,
    pub twitter_usernames: Vec<String>,
    pub profile_image_url: String,
    pub responsiveness_score: f64,
}

/// `numerator / denominator`, or 0 when the denominator is not above 1e-6.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > EPSILON {
        numerator / denominator
    } else {
        0.0
    }
}

/// Child `key` of `parent`. A missing parent or key is `None`; a parent that
/// exists but is not an object is an error naming `parent_path`.
fn field<'a>(
    parent: Option<&'a Value>,
    key: &str,
    parent_path: &str,
) -> Result<Option<&'a Value>, ScoreError> {
    match parent {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(map.get(key)),
        Some(_) => Err(ScoreError::NotAnObject(parent_path.to_string())),
    }
}

/// Numeric `<name>.<key>` under `parent`, or `default` when absent.
fn stat(
    parent: Option<&Value>,
    parent_path: &str,
    name: &str,
    key: &str,
    default: f64,
) -> Result<f64, ScoreError> {
    let path = format!("{}.{}", name, key);
    let metric = field(parent, name, parent_path)?;
    match field(metric, key, name)? {
        None => Ok(default),
        Some(v) => v.as_f64().ok_or(ScoreError::NotANumber(path)),
    }
}

/// Best-tweet engagement counts come back as numbers or numeric strings.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn best_tweet_impact(week: Option<&Value>) -> Result<f64, ScoreError> {
    let tweets = match field(week, "bestTweets", "_7DaysAgo")? {
        None => return Ok(0.0),
        Some(Value::Array(tweets)) => tweets,
        Some(_) => return Err(ScoreError::InvalidField("bestTweets".into())),
    };

    let mut engagements = Vec::new();
    for tweet in tweets {
        if let Some(item) = field(Some(tweet), "item5", "bestTweets[]")? {
            let count =
                as_integer(item).ok_or_else(|| ScoreError::NotANumber("bestTweets[].item5".into()))?;
            engagements.push(count as f64);
        }
    }

    if engagements.is_empty() {
        Ok(0.0)
    } else {
        Ok(engagements.iter().sum::<f64>() / engagements.len() as f64)
    }
}

/// Raw (unnormalized) score for one scraped record.
pub fn compute_score(agent: &Value) -> Result<AgentScore, ScoreError> {
    if !agent.is_object() {
        return Err(ScoreError::NotAnObject("record".into()));
    }
    let root = Some(agent);

    let details = field(root, "agentDetails", "record")?;
    let name = match field(details, "name", "agentDetails")? {
        None => "Unknown Agent".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(ScoreError::InvalidField("agentDetails.name".into())),
    };
    let twitter_usernames = match field(details, "twitterUsernames", "agentDetails")? {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|u| u.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ScoreError::InvalidField("agentDetails.twitterUsernames".into()))?,
        Some(_) => return Err(ScoreError::InvalidField("agentDetails.twitterUsernames".into())),
    };
    let profile_image_url = match field(root, "profileImageUrl", "record")? {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(ScoreError::InvalidField("profileImageUrl".into())),
    };

    let stats = field(root, "twitterStats", "record")?;
    let points = field(stats, "dataPoints", "twitterStats")?;
    let now = field(points, "Now", "twitterStats.dataPoints")?;
    let week = field(points, "_7DaysAgo", "twitterStats.dataPoints")?;

    let engagements = stat(week, "_7DaysAgo", "engagementsCount", "value", 0.0)?;
    let impressions = stat(week, "_7DaysAgo", "impressionsCount", "value", EPSILON)?;
    let er = safe_div(engagements, impressions);

    let smart_points = stat(week, "_7DaysAgo", "smartEngagementPoints", "value", 0.0)?;
    let followers = stat(now, "Now", "followersCount", "value", EPSILON)?;
    let sep = safe_div(smart_points, followers);

    let prev_followers = stat(week, "_7DaysAgo", "followersCount", "value", EPSILON)?;
    let fgr = safe_div(followers - prev_followers, prev_followers);

    let mindshare = stat(week, "_7DaysAgo", "mindshare", "value", 0.0)?;
    let similar_mindshare = stat(week, "_7DaysAgo", "mindshare", "valueForSimilarProjects", EPSILON)?;
    let ms = safe_div(mindshare, similar_mindshare);

    let bti = best_tweet_impact(week)?;

    let raw = WEIGHT_ER * er + WEIGHT_SEP * sep + WEIGHT_FGR * fgr + WEIGHT_MS * ms + WEIGHT_BTI * bti;

    Ok(AgentScore {
        name,
        twitter_usernames,
        profile_image_url,
        responsiveness_score: raw,
    })
}

/// Rescale scores to 0..100 and sort highest first. Ties keep input order.
pub fn normalize_and_sort(mut agents: Vec<AgentScore>) -> Vec<AgentScore> {
    if agents.is_empty() {
        return agents;
    }

    let (min, max) = agents.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| {
        (lo.min(a.responsiveness_score), hi.max(a.responsiveness_score))
    });

    if min == max {
        for agent in &mut agents {
            agent.responsiveness_score = NEUTRAL_SCORE;
        }
    } else {
        for agent in &mut agents {
            agent.responsiveness_score = 100.0 * (agent.responsiveness_score - min) / (max - min);
        }
    }

    agents.sort_by(|a, b| b.responsiveness_score.total_cmp(&a.responsiveness_score));
    agents
}

/// Score every record, skipping the ones that cannot be read.
pub fn score_records(records: &[Value]) -> Vec<AgentScore> {
    let scored = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| match compute_score(record) {
            Ok(score) => Some(score),
            Err(e) => {
                tracing::warn!("Error computing responsiveness score for record {}: {}", i, e);
                None
            }
        })
        .collect();

    normalize_and_sort(scored)
}

fn write_pretty(path: &Path, agents: &[AgentScore]) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    agents
        .serialize(&mut ser)
        .context("Failed to serialize scores")?;
    std::fs::write(path, buf).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read scraped records, rank them, write the ranking, log the top entries.
pub fn run(config: &ScoreConfig) -> anyhow::Result<Vec<AgentScore>> {
    let contents = std::fs::read_to_string(&config.input_path)
        .with_context(|| format!("Failed to read {}", config.input_path.display()))?;
    let records: Vec<Value> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array", config.input_path.display()))?;

    let ranked = score_records(&records);
    write_pretty(&config.output_path, &ranked)?;
    tracing::info!(
        "Sorted responsiveness scores for {} of {} agents saved to {}",
        ranked.len(),
        records.len(),
        config.output_path.display()
    );

    tracing::info!("Top {} most responsive agents:", config.top_agents.min(ranked.len()));
    for (rank, agent) in ranked.iter().take(config.top_agents).enumerate() {
        tracing::info!("{:>3}. {:<40} {:>6.2}", rank + 1, agent.name, agent.responsiveness_score);
    }

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn agent(name: &str, engagements: f64, impressions: f64) -> Value {
        json!({
            "agentDetails": { "name": name, "twitterUsernames": [name.to_lowercase()] },
            "profileImageUrl": format!("https://img/{}.png", name),
            "twitterStats": { "dataPoints": {
                "Now": { "followersCount": { "value": 100.0 } },
                "_7DaysAgo": {
                    "engagementsCount": { "value": engagements },
                    "impressionsCount": { "value": impressions },
                    "followersCount": { "value": 100.0 }
                }
            } }
        })
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_safe_div_threshold() {
        assert!(approx(safe_div(3.0, 2.0), 1.5));
        assert_eq!(safe_div(3.0, 1e-6), 0.0);
        assert_eq!(safe_div(3.0, 0.0), 0.0);
        assert_eq!(safe_div(3.0, -5.0), 0.0);
    }

    #[test]
    fn test_full_record_score() {
        let record = json!({
            "agentDetails": { "name": "Aixbt", "twitterUsernames": ["aixbt_agent"] },
            "profileImageUrl": "https://img/aixbt.png",
            "twitterStats": { "dataPoints": {
                "Now": { "followersCount": { "value": 200.0 } },
                "_7DaysAgo": {
                    "engagementsCount": { "value": 50.0 },
                    "impressionsCount": { "value": 1000.0 },
                    "smartEngagementPoints": { "value": 40.0 },
                    "followersCount": { "value": 100.0 },
                    "mindshare": { "value": 3.0, "valueForSimilarProjects": 1.5 },
                    "bestTweets": [{ "item5": 10 }, { "item5": "20" }, { "item1": "no engagements" }]
                }
            } }
        });

        let score = compute_score(&record).unwrap();
        assert_eq!(score.name, "Aixbt");
        assert_eq!(score.twitter_usernames, vec!["aixbt_agent"]);
        assert_eq!(score.profile_image_url, "https://img/aixbt.png");

        // ER 0.05, SEP 0.2, FGR 1.0, MS 2.0, BTI 15
        let expected = 0.3 * 0.05 + 0.2 * 0.2 + 0.2 * 1.0 + 0.2 * 2.0 + 0.1 * 15.0;
        assert!(approx(score.responsiveness_score, expected));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let score = compute_score(&json!({})).unwrap();
        assert_eq!(score.name, "Unknown Agent");
        assert!(score.twitter_usernames.is_empty());
        assert_eq!(score.profile_image_url, "");
        assert_eq!(score.responsiveness_score, 0.0);
    }

    #[test]
    fn test_malformed_records_are_rejected() {
        assert!(compute_score(&json!("not an agent")).is_err());
        assert_eq!(
            compute_score(&json!({ "agentDetails": null })),
            Err(ScoreError::NotAnObject("agentDetails".into()))
        );

        let mut bad_metric = agent("A", 1.0, 10.0);
        bad_metric["twitterStats"]["dataPoints"]["_7DaysAgo"]["engagementsCount"]["value"] = json!("lots");
        assert_eq!(
            compute_score(&bad_metric),
            Err(ScoreError::NotANumber("engagementsCount.value".into()))
        );
    }

    #[test]
    fn test_normalize_scales_and_sorts() {
        let ranked = score_records(&[agent("Low", 1.0, 10.0), agent("High", 9.0, 10.0), agent("Mid", 5.0, 10.0)]);

        let names: Vec<&str> = ranked.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
        assert!(approx(ranked[0].responsiveness_score, 100.0));
        assert!(approx(ranked[1].responsiveness_score, 50.0));
        assert!(approx(ranked[2].responsiveness_score, 0.0));
    }

    #[test]
    fn test_equal_scores_become_neutral_and_keep_order() {
        let ranked = score_records(&[agent("First", 2.0, 10.0), agent("Second", 2.0, 10.0)]);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "First");
        assert!(ranked.iter().all(|a| a.responsiveness_score == NEUTRAL_SCORE));
    }

    #[test]
    fn test_skipped_records_and_empty_input() {
        assert!(score_records(&[]).is_empty());

        let ranked = score_records(&[json!(42), agent("Only", 1.0, 10.0)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].responsiveness_score, NEUTRAL_SCORE);
    }

    #[test]
    fn test_run_writes_ranking() {
        let dir = tempdir().unwrap();
        let config = ScoreConfig {
            input_path: dir.path().join("scraped.json"),
            output_path: dir.path().join("scored.json"),
            top_agents: 1,
        };
        let records = json!([agent("B", 1.0, 10.0), agent("A", 3.0, 10.0)]);
        std::fs::write(&config.input_path, records.to_string()).unwrap();

        let ranked = run(&config).unwrap();
        assert_eq!(ranked[0].name, "A");

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert!(written.contains("\n        \"name\": \"A\""));
        let parsed: Vec<AgentScore> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, ranked);
    }

    #[test]
    fn test_run_writes_non_ascii_names_unescaped() {
        let dir = tempdir().unwrap();
        let config = ScoreConfig {
            input_path: dir.path().join("scraped.json"),
            output_path: dir.path().join("scored.json"),
            top_agents: 5,
        };
        std::fs::write(&config.input_path, json!([agent("Ëliza", 1.0, 10.0)]).to_string()).unwrap();

        run(&config).unwrap();

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert!(written.contains("\"name\": \"Ëliza\""), "{}", written);
        assert!(written.contains("\"responsivenessScore\": 50.0"), "{}", written);
    }
}
