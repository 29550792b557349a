//! Site URL normalization.
//!
//! Memberships and registrations compare URLs trailing-slash-insensitively:
//! `https://a.example/` and `https://a.example` address the same node.

/// Normalize a site URL for storage and comparison.
///
/// Trims surrounding whitespace and strips any trailing slashes. The scheme
/// and host are kept as-is; email comparison elsewhere is case-sensitive and
/// URL comparison relies on registrations being entered consistently.
pub fn normalize_site_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Compare two site URLs under normalization.
pub fn urls_match(a: &str, b: &str) -> bool {
    normalize_site_url(a) == normalize_site_url(b)
}
