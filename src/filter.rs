use std::collections::HashSet;

use crate::github::issues::{Issue, Label};

/// The first issue in list order whose title slug is `slug`.
pub fn find_by_slug<'a>(issues: &'a [Issue], slug: &str) -> Option<&'a Issue> {
    if slug.is_empty() {
        return None;
    }
    issues.iter().find(|issue| issue.slug() == slug)
}

/// Issues carrying a label whose slug is `label_slug`, in list order.
pub fn filter_by_label<'a>(issues: &'a [Issue], label_slug: &str) -> Vec<&'a Issue> {
    if label_slug.is_empty() {
        return Vec::new();
    }
    issues
        .iter()
        .filter(|issue| issue.has_label(label_slug))
        .collect()
}

/// Distinct labels by slug, in the order they are first seen.
pub fn collect_labels(issues: &[Issue]) -> Vec<&Label> {
    let mut seen = HashSet::new();
    issues
        .iter()
        .flat_map(|issue| issue.labels.iter())
        .filter(|label| {
            let slug = label.slug();
            !slug.is_empty() && seen.insert(slug)
        })
        .collect()
}

pub fn find_label<'a>(issues: &'a [Issue], label_slug: &str) -> Option<&'a Label> {
    if label_slug.is_empty() {
        return None;
    }
    issues
        .iter()
        .flat_map(|issue| issue.labels.iter())
        .find(|label| label.slug() == label_slug)
}

/// Slugs claimed by more than one issue; only the first of each gets a page.
pub fn duplicate_slugs(issues: &[Issue]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for slug in issues.iter().map(Issue::slug).filter(|s| !s.is_empty()) {
        if !seen.insert(slug.clone()) && !duplicates.contains(&slug) {
            duplicates.push(slug);
        }
    }
    duplicates
}
