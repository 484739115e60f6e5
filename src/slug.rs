/// Converts a post title or label name into its URL segment.
///
/// Alphanumeric characters are kept in lowercase and every run of anything
/// else becomes a single `-`. Leading and trailing separators are dropped, so
/// a string without alphanumerics slugifies to the empty string.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
