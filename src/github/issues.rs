use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::future::Future;

use crate::slug::slugify;

/// A GitHub issue as one blog post. Only the fields the blog renders are decoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Issue {
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    pub fn has_label(&self, label_slug: &str) -> bool {
        self.labels.iter().any(|label| label.slug() == label_slug)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Label {
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub login: String,
}

/// Decodes a page of the issues endpoint, dropping pull requests and records
/// that do not look like issues.
pub fn parse_issues(issues_json: &[serde_json::Value]) -> Vec<Issue> {
    issues_json
        .iter()
        .filter(|value| value.get("pull_request").is_none_or(|pr| pr.is_null()))
        .filter_map(|value| match Issue::deserialize(value) {
            Ok(issue) => Some(issue),
            Err(err) => {
                tracing::warn!(
                    number = value["number"].as_u64(),
                    error = %err,
                    "skipping malformed issue"
                );
                None
            }
        })
        .collect()
}

/// Fetches every page through `fetch_page(page, per_page)`.
///
/// Stops at the first empty or short page; any page error aborts the fetch.
pub async fn fetch_all_issues<F, Fut>(per_page: u32, fetch_page: F) -> Result<Vec<Issue>>
where
    F: Fn(u32, u32) -> Fut,
    Fut: Future<Output = Result<Vec<serde_json::Value>>>,
{
    let mut all_issues = Vec::new();
    let mut page = 1;

    loop {
        let issues_json = fetch_page(page, per_page).await?;
        tracing::debug!(page, count = issues_json.len(), "fetched issues page");

        if issues_json.is_empty() {
            break;
        }

        let is_last = issues_json.len() < per_page as usize;
        all_issues.extend(parse_issues(&issues_json));
        if is_last {
            break;
        }
        page += 1;
    }

    Ok(all_issues)
}

/// Newest post first; ties broken by the higher issue number.
pub fn sort_newest_first(issues: &mut [Issue]) {
    issues.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.number.cmp(&a.number))
    });
}
