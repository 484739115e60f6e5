use pulldown_cmark::{Options, Parser, html};
use std::fmt::Write;

use crate::config::BlogConfig;
use crate::filter::{collect_labels, filter_by_label, find_by_slug, find_label};
use crate::github::issues::{Issue, Label};
use crate::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    NotFound,
}

/// A rendered HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub status: PageStatus,
    pub title: String,
    pub html: String,
}

/// Renders `route` against the (already sorted) issue list.
pub fn render_route(config: &BlogConfig, issues: &[Issue], route: &Route) -> Page {
    match route {
        Route::Home => {
            let mut content = String::new();
            render_post_list(&mut content, issues, issues.iter());
            layout(config, issues, route, None, &content, PageStatus::Ok)
        }
        Route::Til(slug) => match find_by_slug(issues, slug) {
            Some(issue) => {
                let mut content = String::new();
                render_post(&mut content, issue, true, "post post-single");
                layout(config, issues, route, Some(issue.title.as_str()), &content, PageStatus::Ok)
            }
            None => render_not_found(config, issues, route),
        },
        Route::Label(slug) => match find_label(issues, slug) {
            Some(label) => {
                let tagged = filter_by_label(issues, slug);
                let mut content = String::new();
                let _ = writeln!(
                    content,
                    "<h2 class=\"label-heading\">Posts tagged {}</h2>",
                    escape_html(&label.name)
                );
                render_post_list(&mut content, issues, tagged.into_iter());
                layout(config, issues, route, Some(label.name.as_str()), &content, PageStatus::Ok)
            }
            None => render_not_found(config, issues, route),
        },
        Route::NotFound => render_not_found(config, issues, route),
    }
}

fn render_not_found(config: &BlogConfig, issues: &[Issue], route: &Route) -> Page {
    let content = format!(
        "<section class=\"not-found\">\n<h2>Nothing here</h2>\n<p><a href=\"{}\">Back to all posts</a></p>\n</section>\n",
        Route::Home.href()
    );
    layout(
        config,
        issues,
        route,
        Some("Not found"),
        &content,
        PageStatus::NotFound,
    )
}

/// Lists `posts`; `all` decides which of them own a `/til/` page.
fn render_post_list<'a>(out: &mut String, all: &[Issue], posts: impl Iterator<Item = &'a Issue>) {
    out.push_str("<div class=\"posts\">\n");
    for issue in posts {
        render_post(out, issue, has_own_page(all, issue), "post");
    }
    out.push_str("</div>\n");
}

/// An issue owns `/til/<slug>/` only if its slug is non-empty and no newer
/// issue claims the same slug.
fn has_own_page(all: &[Issue], issue: &Issue) -> bool {
    find_by_slug(all, &issue.slug()).is_some_and(|owner| owner.number == issue.number)
}

fn render_post(out: &mut String, issue: &Issue, linked: bool, class: &str) {
    let title = if linked {
        format!(
            "<a href=\"{}\">{}</a>",
            escape_href(&Route::Til(issue.slug()).href()),
            escape_html(&issue.title)
        )
    } else {
        escape_html(&issue.title)
    };
    let _ = write!(
        out,
        "<article class=\"{class}\" id=\"issue-{}\">\n<header>\n<h2 class=\"post-title\">{title}</h2>\n<p class=\"post-meta\"><time datetime=\"{}\">{}</time>",
        issue.number,
        issue.created_at.to_rfc3339(),
        format_date(issue),
    );
    if !issue.html_url.is_empty() {
        let _ = write!(
            out,
            " · <a class=\"post-source\" href=\"{}\">#{}</a>",
            escape_href(&issue.html_url),
            issue.number
        );
    }
    out.push_str("</p>\n");
    render_label_chips(out, issue.labels.iter());
    out.push_str("</header>\n<div class=\"post-body\">\n");
    out.push_str(&markdown_to_html(issue.body()));
    out.push_str("</div>\n</article>\n");
}

fn render_label_chips<'a>(out: &mut String, labels: impl Iterator<Item = &'a Label>) {
    let chips: Vec<String> = labels
        .filter(|label| !label.slug().is_empty())
        .map(label_chip)
        .collect();
    if chips.is_empty() {
        return;
    }
    let _ = writeln!(out, "<ul class=\"labels\">{}</ul>", chips.join(""));
}

fn label_chip(label: &Label) -> String {
    let style = label_color(&label.color)
        .map(|color| format!(" style=\"background-color: #{color}\""))
        .unwrap_or_default();
    let title = label
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!(" title=\"{}\"", escape_html(d)))
        .unwrap_or_default();
    format!(
        "<li class=\"label\"{style}{title}><a href=\"{}\">{}</a></li>",
        escape_href(&Route::Label(label.slug()).href()),
        escape_html(&label.name)
    )
}

/// Accepts 3 or 6 hex digits, the only forms allowed into a `style` attribute.
fn label_color(color: &str) -> Option<&str> {
    let valid = matches!(color.len(), 3 | 6) && color.chars().all(|c| c.is_ascii_hexdigit());
    valid.then_some(color)
}

fn layout(
    config: &BlogConfig,
    issues: &[Issue],
    route: &Route,
    heading: Option<&str>,
    content: &str,
    status: PageStatus,
) -> Page {
    let title = match heading {
        Some(heading) => format!("{heading} | {}", config.title),
        None => config.title.clone(),
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&title));
    if let Some(description) = &config.description {
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape_html(description)
        );
    }
    if let Some(analytics_id) = &config.analytics_id {
        html.push_str(&analytics_snippet(analytics_id, &route.href()));
    }
    html.push_str("</head>\n<body>\n<header class=\"site-header\">\n");
    let _ = writeln!(
        html,
        "<h1 class=\"site-title\"><a href=\"{}\">{}</a></h1>",
        Route::Home.href(),
        escape_html(&config.title)
    );
    if let Some(description) = &config.description {
        let _ = writeln!(
            html,
            "<p class=\"site-description\">{}</p>",
            escape_html(description)
        );
    }
    html.push_str("</header>\n");

    let labels = collect_labels(issues);
    if !labels.is_empty() {
        html.push_str("<nav class=\"label-nav\">\n");
        render_label_chips(&mut html, labels.into_iter());
        html.push_str("</nav>\n");
    }

    html.push_str("<main>\n");
    html.push_str(content);
    html.push_str("</main>\n");
    let _ = writeln!(
        html,
        "<footer class=\"site-footer\"><a href=\"{}\">{}</a></footer>",
        escape_href(&config.repository_url()),
        escape_html(&config.repository())
    );
    html.push_str("</body>\n</html>\n");

    Page {
        status,
        title,
        html,
    }
}

/// Google Analytics pageview for `page_path`.
fn analytics_snippet(analytics_id: &str, page_path: &str) -> String {
    let id = escape_js(analytics_id);
    format!(
        "<script async src=\"https://www.googletagmanager.com/gtag/js?id={}\"></script>\n\
         <script>\n\
         window.dataLayer = window.dataLayer || [];\n\
         function gtag(){{dataLayer.push(arguments);}}\n\
         gtag('js', new Date());\n\
         gtag('config', '{id}', {{ 'page_path': '{}' }});\n\
         </script>\n",
        escape_html(analytics_id),
        escape_js(page_path),
    )
}

/// GitHub-flavoured Markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn format_date(issue: &Issue) -> String {
    issue.created_at.format("%B %-d, %Y").to_string()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let _ = pulldown_cmark_escape::escape_html(&mut escaped, text);
    escaped
}

/// Escapes a URL for an `href` attribute, percent-encoding non-ASCII bytes.
pub fn escape_href(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    let _ = pulldown_cmark_escape::escape_href(&mut escaped, url);
    escaped
}

/// Escapes for a single-quoted JS string inside an inline `<script>`.
fn escape_js(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
