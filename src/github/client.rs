use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap};

use crate::config::{BlogConfig, IssueFilterState};

const USER_AGENT: &str = "til-cli";
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Thin wrapper over the GitHub REST endpoints the blog reads.
pub struct IssuesClient {
    client: reqwest::Client,
    api_base: String,
    repository: String,
    token: Option<String>,
}

impl IssuesClient {
    pub fn new(api_base: &str, repository: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(IssuesClient {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            token,
        })
    }

    pub fn from_config(config: &BlogConfig, token: Option<String>) -> Result<Self> {
        Self::new(&config.api_base, &config.repository(), token)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url).header(ACCEPT, GITHUB_JSON);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// `GET /repos/{owner}/{repo}/issues` for one page.
    pub async fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
        state: IssueFilterState,
    ) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/repos/{}/issues", self.api_base, self.repository);
        tracing::debug!(%url, page, per_page, "requesting issues");

        let response = self
            .get(&url)
            .query(&[
                ("state", state.as_str().to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.headers(), &self.repository));
        }

        response
            .json::<Vec<serde_json::Value>>()
            .await
            .context("Failed to decode issues response")
    }

    /// `GET /user`, returning the raw body for [`crate::whoami`].
    pub async fn fetch_user(&self) -> Result<String> {
        let url = format!("{}/user", self.api_base);
        let response = self.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(anyhow::anyhow!("User endpoint {url} not found"));
        }
        if !status.is_success() {
            return Err(status_error(status, response.headers(), &self.repository));
        }
        Ok(response.text().await?)
    }
}

/// Maps a failed response onto the message shown to the user.
pub fn status_error(status: StatusCode, headers: &HeaderMap, repository: &str) -> anyhow::Error {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let rate_limited = (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
        && header("x-ratelimit-remaining").as_deref() == Some("0");

    if rate_limited {
        let reset = header("x-ratelimit-reset")
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0));
        return match reset {
            Some(at) => anyhow::anyhow!(
                "GitHub API rate limit exceeded; resets at {}. Run `til login <token>` to raise the limit.",
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => anyhow::anyhow!(
                "GitHub API rate limit exceeded. Run `til login <token>` to raise the limit."
            ),
        };
    }

    match status {
        StatusCode::UNAUTHORIZED => {
            anyhow::anyhow!("Token invalid or expired. Run `til login <token>` again.")
        }
        StatusCode::NOT_FOUND => anyhow::anyhow!("Repository {repository} not found"),
        _ => anyhow::anyhow!("API request error: {status}"),
    }
}
