use std::sync::LazyLock;
use regex::Regex;
use url::Url;
use crate::core::error::{Error, Result};

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Parses an absolute http(s) URL and drops its fragment.
pub fn normalize_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::network(format!("Unsupported scheme in {}", raw)));
    }
    url.set_fragment(None);
    Ok(url)
}

/// Resolves `href` against `base`; `None` for anything that is not http(s).
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    let mut url = base.join(href.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Outbound links of `html` in document order, absolute and fragment free.
/// Duplicates are kept; the crawler's visited set takes care of them.
pub fn list_urls(base: &Url, html: &str) -> Vec<Url> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|href| resolve(base, href.as_str()))
        .collect()
}
