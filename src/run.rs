use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::cli::parser::{self, Command};
use crate::config::{self, BlogConfig};
use crate::filter;
use crate::github::client::IssuesClient;
use crate::github::issues::{self, Issue};
use crate::output;
use crate::render::{self, PageStatus};
use crate::router;
use crate::site;
use crate::slug::slugify;
use crate::storage::{self, FileTokenStorage, TokenStorage};
use crate::whoami;

/// Outcome of a command that ran without an internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

/// Process state a command depends on, captured up front so tests can supply their own.
#[derive(Debug, Clone)]
pub struct Environment {
    pub work_dir: PathBuf,
    /// Only consulted by commands that touch the stored token.
    pub home: Option<PathBuf>,
    pub vars: HashMap<String, String>,
}

impl Environment {
    pub fn from_process() -> Result<Self> {
        let work_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Environment {
            work_dir,
            home: std::env::var_os("HOME").map(PathBuf::from),
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        })
    }

    pub fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn storage(&self) -> Result<FileTokenStorage> {
        let path = storage::token_path_in(self.home.as_deref())?;
        Ok(FileTokenStorage::with_path(path))
    }

    /// Token for API requests. A missing token location only means no stored token.
    fn token(&self) -> Result<Option<String>> {
        let storage = match self.storage() {
            Ok(storage) => Some(storage),
            Err(err) => {
                tracing::debug!(error = %err, "token storage unavailable");
                None
            }
        };
        let storage = storage.as_ref().map(|s| s as &dyn TokenStorage);
        storage::resolve_token(self.var("GITHUB_TOKEN"), storage)
    }

    fn config(&self) -> Result<BlogConfig> {
        config::load_config(&self.work_dir, |name| self.var(name))
    }
}

pub async fn run(
    args: Vec<String>,
    env: &Environment,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> Result<RunStatus> {
    match parser::parse_args(&args) {
        Command::Build { out_dir } => {
            let config = env.config()?;
            let issues = load_issues(&config, env.token()?).await?;
            let out_dir = env.work_dir.join(out_dir);
            let report = site::build_site(&config, &issues, &out_dir)?;
            output::println(
                &format!(
                    "Built {} posts and {} label pages into {}",
                    report.posts,
                    report.labels,
                    out_dir.display()
                ),
                &mut stdout_additional,
            )?;
            if report.skipped > 0 {
                output::eprintln(
                    &format!("Skipped {} issues without a unique title slug", report.skipped),
                    &mut stdout_additional,
                )?;
            }
        }
        Command::Render { path } => {
            let config = env.config()?;
            let issues = load_issues(&config, env.token()?).await?;
            let route = router::resolve(&path);
            tracing::debug!(%path, ?route, "resolved route");
            let page = render::render_route(&config, &issues, &route);
            output::println(page.html.trim_end(), &mut stdout_additional)?;
            if page.status == PageStatus::NotFound {
                output::eprintln(&format!("No page at {path}"), &mut stdout_additional)?;
                return Ok(RunStatus::Failure);
            }
        }
        Command::List { label } => {
            let config = env.config()?;
            let issues = load_issues(&config, env.token()?).await?;
            let selected: Vec<&Issue> = match &label {
                None => issues.iter().collect(),
                Some(label) => filter::filter_by_label(&issues, &slugify(label)),
            };
            if let (Some(label), true) = (&label, selected.is_empty()) {
                output::eprintln(&format!("No posts labelled {label}"), &mut stdout_additional)?;
                return Ok(RunStatus::Failure);
            }
            for issue in selected {
                output::println(
                    &format!(
                        "{}\t{}\t{}",
                        issue.slug(),
                        issue.created_at.format("%Y-%m-%d"),
                        issue.title
                    ),
                    &mut stdout_additional,
                )?;
            }
        }
        Command::Labels => {
            let config = env.config()?;
            let issues = load_issues(&config, env.token()?).await?;
            for label in filter::collect_labels(&issues) {
                let slug = label.slug();
                let count = filter::filter_by_label(&issues, &slug).len();
                output::println(
                    &format!("{slug}\t{count}\t{}", label.name),
                    &mut stdout_additional,
                )?;
            }
        }
        Command::Login { token } => {
            env.storage()?.save(&token).context("Failed to save token")?;
            output::println("✓ Token saved", &mut stdout_additional)?;
        }
        Command::Logout => {
            env.storage()?.delete().context("Failed to delete token")?;
            output::println("✓ Token removed", &mut stdout_additional)?;
        }
        Command::Whoami => match env.token()? {
            Some(token) => {
                let api_base = match env.config() {
                    Ok(config) => config.api_base,
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring unusable config for whoami");
                        env.var(config::ConfigKey::ApiBase.env_var())
                            .unwrap_or_else(|| config::DEFAULT_API_BASE.to_string())
                    }
                };
                let client = IssuesClient::new(&api_base, "", Some(token))?;
                let body = client.fetch_user().await?;
                let user = whoami::parse_user_response(&body)?;
                output::println(&user.display(), &mut stdout_additional)?;
            }
            None => {
                output::eprintln(
                    "No token found. Run `til login <token>` first.",
                    &mut stdout_additional,
                )?;
                return Ok(RunStatus::Failure);
            }
        },
        Command::Help => {
            output::println(parser::USAGE, &mut stdout_additional)?;
        }
        Command::Unknown(reason) => {
            output::eprintln(&reason, &mut stdout_additional)?;
            output::eprintln("Use `til help` for usage.", &mut stdout_additional)?;
            return Ok(RunStatus::Failure);
        }
    }
    Ok(RunStatus::Success)
}

/// Fetches every issue of the configured repository, newest first.
pub async fn load_issues(config: &BlogConfig, token: Option<String>) -> Result<Vec<Issue>> {
    let client = IssuesClient::from_config(config, token)?;
    let client = &client;
    let state = config.state;
    let mut issues = issues::fetch_all_issues(config.per_page, move |page, per_page| {
        client.fetch_page(page, per_page, state)
    })
    .await
    .with_context(|| format!("Failed to fetch issues of {}", config.repository()))?;
    issues::sort_newest_first(&mut issues);
    tracing::info!(count = issues.len(), repository = %config.repository(), "loaded issues");
    Ok(issues)
}
