use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Repository,
    Title,
    Description,
    AnalyticsId,
    ApiBase,
    PerPage,
    State,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Repository => "repository",
            ConfigKey::Title => "title",
            ConfigKey::Description => "description",
            ConfigKey::AnalyticsId => "analytics_id",
            ConfigKey::ApiBase => "api_base",
            ConfigKey::PerPage => "per_page",
            ConfigKey::State => "state",
        }
    }

    /// Environment variable that overrides this key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ConfigKey::Repository => "TIL_REPOSITORY",
            ConfigKey::Title => "TIL_TITLE",
            ConfigKey::Description => "TIL_DESCRIPTION",
            ConfigKey::AnalyticsId => "TIL_ANALYTICS_ID",
            ConfigKey::ApiBase => "TIL_API_BASE",
            ConfigKey::PerPage => "TIL_PER_PAGE",
            ConfigKey::State => "TIL_STATE",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::Repository,
            ConfigKey::Title,
            ConfigKey::Description,
            ConfigKey::AnalyticsId,
            ConfigKey::ApiBase,
            ConfigKey::PerPage,
            ConfigKey::State,
        ]
    }
}

/// Filename for the project-specific configuration within the .til directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".til";

pub const DEFAULT_TITLE: &str = "Today I Learned";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Which issues the blog is built from, passed through as the `state` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueFilterState {
    Open,
    Closed,
    All,
}

impl IssueFilterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueFilterState::Open => "open",
            IssueFilterState::Closed => "closed",
            IssueFilterState::All => "all",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(IssueFilterState::Open),
            "closed" => Some(IssueFilterState::Closed),
            "all" => Some(IssueFilterState::All),
            _ => None,
        }
    }
}

/// Static configuration handed to every view.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogConfig {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub description: Option<String>,
    pub analytics_id: Option<String>,
    pub api_base: String,
    pub per_page: u32,
    pub state: IssueFilterState,
}

impl BlogConfig {
    /// Builds a validated configuration from a merged key map, filling in defaults.
    pub fn from_map(map: &HashMap<ConfigKey, Value>) -> Result<Self> {
        let repository = string_value(map, ConfigKey::Repository)?.ok_or_else(|| {
            anyhow::anyhow!(
                "No repository configured. Set \"repository\" in {}/{} or TIL_REPOSITORY.",
                PROJECT_CONFIG_DIR,
                PROJECT_CONFIG_FILENAME
            )
        })?;
        let (owner, repo) = parse_repository(&repository)?;

        let per_page = match map.get(&ConfigKey::PerPage) {
            None => DEFAULT_PER_PAGE,
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| anyhow::anyhow!("per_page must be a positive integer"))?,
            Some(Value::String(s)) => s
                .trim()
                .parse::<u32>()
                .with_context(|| format!("per_page must be a positive integer, got {s:?}"))?,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "per_page must be a positive integer, got {other}"
                ));
            }
        };
        if !(1..=100).contains(&per_page) {
            return Err(anyhow::anyhow!(
                "per_page must be between 1 and 100, got {per_page}"
            ));
        }

        let state = match string_value(map, ConfigKey::State)? {
            None => IssueFilterState::Open,
            Some(s) => IssueFilterState::parse(&s).ok_or_else(|| {
                anyhow::anyhow!("state must be one of open, closed, all; got {s:?}")
            })?,
        };

        let api_base = string_value(map, ConfigKey::ApiBase)?
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(BlogConfig {
            owner,
            repo,
            title: string_value(map, ConfigKey::Title)?.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: string_value(map, ConfigKey::Description)?,
            analytics_id: string_value(map, ConfigKey::AnalyticsId)?,
            api_base,
            per_page,
            state,
        })
    }

    /// `owner/repo`
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn repository_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

/// Reads a string-typed key. Blank strings count as unset.
fn string_value(map: &HashMap<ConfigKey, Value>, key: ConfigKey) -> Result<Option<String>> {
    match map.get(&key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(anyhow::anyhow!(
            "{} must be a string, got {other}",
            key.as_str()
        )),
    }
}

/// Splits `owner/repo`, rejecting anything else.
pub fn parse_repository(value: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        Ok((parts[0].to_string(), parts[1].to_string()))
    } else {
        Err(anyhow::anyhow!(
            "Invalid repository format {value:?}. Please use <owner>/<repo>."
        ))
    }
}

/// Parses a JSON configuration file content into a map of configuration values.
///
/// - Returns an empty HashMap if the input `content` is empty or contains only whitespace.
/// - Unknown keys are skipped.
/// - Returns an `Err` if the JSON is invalid or is not an object.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    if let Value::Object(map) = &value {
        let config_map = ConfigKey::all()
            .iter()
            .filter_map(|key| map.get(key.as_str()).map(|val| (*key, val.clone())))
            .collect();
        return Ok(config_map);
    }

    Err(anyhow::anyhow!("Config must be a JSON object"))
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// If a key exists in both, the value from `updates` wins.
pub fn update_config(
    base_config: &HashMap<ConfigKey, Value>,
    updates: &HashMap<ConfigKey, Value>,
) -> HashMap<ConfigKey, Value> {
    let mut new_config = base_config.clone();
    for (key, value) in updates {
        new_config.insert(*key, value.clone());
    }
    new_config
}

/// Collects `TIL_*` overrides through `lookup`, so tests need not touch the process env.
pub fn env_overrides<F>(lookup: F) -> HashMap<ConfigKey, Value>
where
    F: Fn(&str) -> Option<String>,
{
    ConfigKey::all()
        .iter()
        .filter_map(|key| lookup(key.env_var()).map(|val| (*key, Value::String(val))))
        .collect()
}

/// Loads `.til/config.json` under `dir` (missing file is an empty config) and
/// applies environment overrides.
pub fn load_config<F>(dir: &Path, lookup: F) -> Result<BlogConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let path = dir.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILENAME);
    let file_config = if path.exists() {
        let content = std::fs::read(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        parse_config(&content).with_context(|| format!("Invalid config file {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using environment only");
        HashMap::new()
    };

    let merged = update_config(&file_config, &env_overrides(lookup));
    BlogConfig::from_map(&merged)
}
