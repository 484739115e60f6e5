use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BlogConfig;
use crate::filter::{collect_labels, duplicate_slugs};
use crate::github::issues::Issue;
use crate::render::{Page, render_route};
use crate::router::Route;

/// Route directories owned by the build.
const GENERATED_TREES: [&str; 2] = ["til", "label"];

/// Counts from one static build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    pub labels: usize,
    pub skipped: usize,
}

/// Writes every route of the blog under `out_dir` as `<route>/index.html`,
/// plus `404.html`.
///
/// The `til/` and `label/` trees are replaced on every build, so posts and
/// labels that no longer exist lose their pages. Other files in `out_dir`
/// are left alone.
pub fn build_site(config: &BlogConfig, issues: &[Issue], out_dir: &Path) -> Result<BuildReport> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    for tree in GENERATED_TREES {
        clear_tree(&out_dir.join(tree))?;
    }

    let mut report = BuildReport::default();

    write_page(out_dir, &Route::Home, &render_route(config, issues, &Route::Home))?;

    for slug in duplicate_slugs(issues) {
        tracing::warn!(%slug, "several issues share this slug; only the newest gets a page");
    }

    let mut written = HashSet::new();
    for issue in issues {
        let slug = issue.slug();
        if slug.is_empty() {
            tracing::warn!(number = issue.number, title = %issue.title, "title has no usable slug, skipping");
            report.skipped += 1;
            continue;
        }
        if !written.insert(slug.clone()) {
            report.skipped += 1;
            continue;
        }
        let route = Route::Til(slug);
        write_page(out_dir, &route, &render_route(config, issues, &route))?;
        report.posts += 1;
    }

    for label in collect_labels(issues) {
        let route = Route::Label(label.slug());
        write_page(out_dir, &route, &render_route(config, issues, &route))?;
        report.labels += 1;
    }

    write_page(out_dir, &Route::NotFound, &render_route(config, issues, &Route::NotFound))?;

    tracing::info!(
        posts = report.posts,
        labels = report.labels,
        skipped = report.skipped,
        out_dir = %out_dir.display(),
        "site built"
    );
    Ok(report)
}

/// File a route is written to, relative to the output directory.
pub fn page_path(route: &Route) -> PathBuf {
    match route {
        Route::Home => PathBuf::from("index.html"),
        Route::Til(slug) => Path::new("til").join(slug).join("index.html"),
        Route::Label(slug) => Path::new("label").join(slug).join("index.html"),
        Route::NotFound => PathBuf::from("404.html"),
    }
}

fn clear_tree(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    fs::remove_dir_all(dir)
        .with_context(|| format!("Failed to remove stale pages in {}", dir.display()))?;
    tracing::debug!(dir = %dir.display(), "removed previous pages");
    Ok(())
}

fn write_page(out_dir: &Path, route: &Route, page: &Page) -> Result<()> {
    let path = out_dir.join(page_path(route));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&path, &page.html).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote page");
    Ok(())
}
