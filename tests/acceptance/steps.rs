use crate::TilWorld;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use std::collections::HashMap;
use til::config::{BlogConfig, ConfigKey};
use til::github::issues::{parse_issues, sort_newest_first};
use til::render::{PageStatus, render_route};
use til::router::resolve;
use til::site::build_site;
use til::slug::slugify;

fn config(world: &TilWorld) -> &BlogConfig {
    world
        .config
        .as_ref()
        .expect("Background must configure the blog")
}

fn page_html(world: &TilWorld) -> &str {
    &world.page.as_ref().expect("No page was opened").html
}

#[given(regex = r#"^the blog "(.*)" titled "(.*)"$"#)]
async fn given_blog(world: &mut TilWorld, repository: String, title: String) {
    let map = HashMap::from([
        (ConfigKey::Repository, serde_json::Value::String(repository)),
        (ConfigKey::Title, serde_json::Value::String(title)),
    ]);
    world.config = Some(BlogConfig::from_map(&map).expect("Valid blog config"));
}

#[given(regex = r#"^the analytics id "(.*)"$"#)]
async fn given_analytics_id(world: &mut TilWorld, analytics_id: String) {
    let config = world.config.as_mut().expect("Blog must be configured first");
    config.analytics_id = Some(analytics_id);
}

#[given("the repository has these issues:")]
async fn given_issues(world: &mut TilWorld, step: &Step) {
    let content = step
        .docstring
        .as_ref()
        .expect("Expected docstring with the issues JSON");
    let values: Vec<serde_json::Value> =
        serde_json::from_str(content).expect("Docstring must be a JSON array");
    let mut issues = parse_issues(&values);
    sort_newest_first(&mut issues);
    world.issues = issues;
}

#[when(regex = r#"^I open "(.*)"$"#)]
async fn when_open(world: &mut TilWorld, path: String) {
    let route = resolve(&path);
    world.page = Some(render_route(config(world), &world.issues, &route));
}

#[when("I build the site")]
async fn when_build_site(world: &mut TilWorld) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let report =
        build_site(config(world), &world.issues, dir.path()).expect("Site build should succeed");
    world.report = Some(report);
    world.out_dir = Some(dir);
}

#[when(regex = r#"^I slugify "(.*)"$"#)]
async fn when_slugify(world: &mut TilWorld, text: String) {
    world.slug = slugify(&text);
}

#[then("the page is found")]
async fn then_page_found(world: &mut TilWorld) {
    let page = world.page.as_ref().expect("No page was opened");
    assert_eq!(page.status, PageStatus::Ok, "Page title: {}", page.title);
}

#[then("the page is not found")]
async fn then_page_not_found(world: &mut TilWorld) {
    let page = world.page.as_ref().expect("No page was opened");
    assert_eq!(page.status, PageStatus::NotFound, "Page title: {}", page.title);
}

#[then(regex = r#"^the page title is "(.*)"$"#)]
async fn then_page_title(world: &mut TilWorld, expected: String) {
    let page = world.page.as_ref().expect("No page was opened");
    assert_eq!(page.title, expected);
}

#[then(regex = r#"^the page shows "(.*)" before "(.*)"$"#)]
async fn then_page_order(world: &mut TilWorld, first: String, second: String) {
    let html = page_html(world);
    let first_at = html
        .find(&first)
        .unwrap_or_else(|| panic!("{first:?} not on page"));
    let second_at = html
        .find(&second)
        .unwrap_or_else(|| panic!("{second:?} not on page"));
    assert!(
        first_at < second_at,
        "{first:?} should appear before {second:?}"
    );
}

#[then(regex = r#"^the page shows "([^"]*)"$"#)]
async fn then_page_shows(world: &mut TilWorld, expected: String) {
    assert!(
        page_html(world).contains(&expected),
        "Expected page to contain {expected:?}"
    );
}

#[then(regex = r#"^the page does not show "(.*)"$"#)]
async fn then_page_does_not_show(world: &mut TilWorld, unexpected: String) {
    assert!(
        !page_html(world).contains(&unexpected),
        "Expected page not to contain {unexpected:?}"
    );
}

#[then(regex = r#"^the build reports (\d+) posts, (\d+) labels and (\d+) skipped issues$"#)]
async fn then_build_report(world: &mut TilWorld, posts: usize, labels: usize, skipped: usize) {
    let report = world.report.as_ref().expect("Site was not built");
    assert_eq!(report.posts, posts);
    assert_eq!(report.labels, labels);
    assert_eq!(report.skipped, skipped);
}

#[then(regex = r#"^the file "(.*)" exists$"#)]
async fn then_file_exists(world: &mut TilWorld, relative: String) {
    let dir = world.out_dir.as_ref().expect("Site was not built");
    let path = dir.path().join(&relative);
    assert!(path.exists(), "Expected {} to exist", path.display());
}

#[then(regex = r#"^the file "(.*)" contains "(.*)"$"#)]
async fn then_file_contains(world: &mut TilWorld, relative: String, expected: String) {
    let dir = world.out_dir.as_ref().expect("Site was not built");
    let path = dir.path().join(&relative);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    assert!(
        content.contains(&expected),
        "Expected {} to contain {expected:?}",
        path.display()
    );
}

#[then(regex = r#"^the slug is "(.*)"$"#)]
async fn then_slug_is(world: &mut TilWorld, expected: String) {
    assert_eq!(world.slug, expected);
}
