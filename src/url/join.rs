//! Building sub-page URLs from links found on the seed page

use url::Url;

/// Returns true if the string already carries an `http://` or `https://` scheme
pub fn has_http_scheme(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Returns the root of the site a resolved URL belongs to
///
/// This is the scheme, host and port of the URL with no path. If the URL cannot be
/// parsed it is returned with trailing slashes removed.
///
/// # Examples
///
/// ```
/// use portfolio_crawler::url::site_root;
///
/// assert_eq!(site_root("https://acme.test/home"), "https://acme.test");
/// assert_eq!(site_root("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
/// ```
pub fn site_root(resolved: &str) -> String {
    match Url::parse(resolved) {
        Ok(url) if url.has_host() => url.origin().ascii_serialization(),
        _ => resolved.trim_end_matches('/').to_string(),
    }
}

/// Builds the fully qualified URL for a link discovered on the seed page
///
/// Absolute hrefs are used verbatim. Anything else has its leading slashes removed and
/// is joined to the site root (trailing slashes removed) with exactly one slash.
///
/// # Examples
///
/// ```
/// use portfolio_crawler::url::sub_url;
///
/// assert_eq!(sub_url("https://acme.test/", "/contact"), "https://acme.test/contact");
/// assert_eq!(sub_url("https://acme.test", "team"), "https://acme.test/team");
/// assert_eq!(
///     sub_url("https://acme.test", "https://facebook.com/acme"),
///     "https://facebook.com/acme"
/// );
/// ```
pub fn sub_url(site: &str, href: &str) -> String {
    if has_http_scheme(href) {
        return href.to_string();
    }

    format!(
        "{}/{}",
        site.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}
