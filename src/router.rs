/// A resolved page of the blog.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Til(String),
    Label(String),
    NotFound,
}

impl Route {
    /// Canonical link for the route, in the directory style the static site uses.
    pub fn href(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Til(slug) => format!("/til/{slug}/"),
            Route::Label(slug) => format!("/label/{slug}/"),
            Route::NotFound => "/404.html".to_string(),
        }
    }
}

/// Maps a request path onto a [`Route`].
///
/// Hash-history paths (`#/til/foo`), surrounding slashes, query strings and
/// fragments are all accepted.
pub fn resolve(path: &str) -> Route {
    let path = path.trim();
    let path = path.strip_prefix('#').unwrap_or(path);
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_matches('/');

    let segments: Vec<&str> = if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    };

    match segments.as_slice() {
        [] => Route::Home,
        ["index.html"] => Route::Home,
        ["til", slug] | ["til", slug, "index.html"] => match decode_segment(slug) {
            Some(slug) => Route::Til(slug),
            None => Route::NotFound,
        },
        ["label", slug] | ["label", slug, "index.html"] => match decode_segment(slug) {
            Some(slug) => Route::Label(slug),
            None => Route::NotFound,
        },
        _ => Route::NotFound,
    }
}

/// Percent-decodes one path segment. Empty or non-UTF-8 segments yield `None`.
fn decode_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }

    let bytes = segment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            decoded.push((hex_value(bytes[i + 1]) << 4) | hex_value(bytes[i + 2]));
            i += 3;
            continue;
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(decoded).ok().filter(|s| !s.is_empty())
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}
