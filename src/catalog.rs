//! Microsoft Learn style course catalog client.
//!
//! Performs a single blocking `GET <catalog_url>?role=..&product=..&level=..`
//! and keeps the `title` / `url` of the first few entries in the `modules`
//! array. There is no retry: one attempt, and any failure goes back to the
//! caller.

use crate::config::Config;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Query parameters accepted by the catalog. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseQuery {
    pub role: String,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl CourseQuery {
    fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("role", self.role.as_str())];
        if let Some(p) = self.product.as_deref() {
            pairs.push(("product", p));
        }
        if let Some(l) = self.level.as_deref() {
            pairs.push(("level", l));
        }
        pairs
    }
}

/// One catalog entry as handed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("catalog response has no `modules` array")]
    MissingModules,
    #[error("catalog module #{index} is missing a string `title`/`url`: {error}")]
    InvalidModule { index: usize, error: serde_json::Error },
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    max_results: usize,
    http: Client,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .user_agent(concat!("course_finder/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.catalog_url.clone(),
            max_results: config.max_results,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the catalog and keep at most `max_results` entries, in response order.
    #[instrument(name = "catalog_search", skip(self), fields(url = %self.base_url))]
    pub fn search(&self, query: &CourseQuery) -> Result<Vec<CourseSummary>, CatalogError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&query.query_pairs())
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(CatalogError::Status { status: status.as_u16(), body });
        }

        let body: Value = resp.json()?;
        let courses = summarize_modules(&body, self.max_results)?;
        debug!(target: "catalog", status = %status, kept = courses.len(), "catalog_response");
        Ok(courses)
    }
}

/// Extract `{title, url}` from the first `limit` entries of `body["modules"]`.
/// Entries past `limit` are not inspected.
pub fn summarize_modules(body: &Value, limit: usize) -> Result<Vec<CourseSummary>, CatalogError> {
    let modules = body
        .get("modules")
        .and_then(Value::as_array)
        .ok_or(CatalogError::MissingModules)?;

    modules
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, m)| {
            CourseSummary::deserialize(m).map_err(|error| CatalogError::InvalidModule { index, error })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summarize_keeps_first_entries_in_order() {
        let modules: Vec<Value> = (0..7)
            .map(|i| json!({"title": format!("t{i}"), "url": format!("https://x/{i}"), "uid": i}))
            .collect();
        let out = summarize_modules(&json!({ "modules": modules }), 5).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].title, "t0");
        assert_eq!(out[4].url, "https://x/4");
    }

    #[test]
    fn summarize_missing_modules() {
        let err = summarize_modules(&json!({"learningPaths": []}), 5).unwrap_err();
        assert!(matches!(err, CatalogError::MissingModules));
    }

    #[test]
    fn summarize_ignores_broken_entries_past_limit() {
        let body = json!({"modules": [
            {"title": "a", "url": "u"},
            {"nothing": true}
        ]});
        assert_eq!(summarize_modules(&body, 1).unwrap().len(), 1);
        let err = summarize_modules(&body, 2).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidModule { index: 1, .. }));
    }

    #[test]
    fn query_pairs_skip_absent_fields() {
        let q = CourseQuery { role: "student".into(), product: None, level: Some("beginner".into()) };
        assert_eq!(q.query_pairs(), vec![("role", "student"), ("level", "beginner")]);
    }
}
