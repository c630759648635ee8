use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lowercase host, or None if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use portfolio_crawler::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives a company's known domain from the website string in its record
///
/// The website may or may not carry a scheme, a `www.` prefix, a port or a path;
/// all of these are dropped.
///
/// # Examples
///
/// ```
/// use portfolio_crawler::url::company_domain;
///
/// assert_eq!(company_domain("https://www.Acme.com/about"), "acme.com");
/// assert_eq!(company_domain("acme.com"), "acme.com");
/// ```
pub fn company_domain(website: &str) -> String {
    let trimmed = website.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let host = Url::parse(&with_scheme)
        .ok()
        .and_then(|url| extract_domain(&url))
        .unwrap_or_else(|| {
            // Not parseable; take everything before the first path separator
            trimmed
                .trim_start_matches("http://")
                .trim_start_matches("https://")
                .split(['/', ':', '?', '#'])
                .next()
                .unwrap_or_default()
                .to_lowercase()
        });

    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Returns true if the email address belongs to the given domain or one of its subdomains
pub fn email_matches_domain(email: &str, domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    let Some((_, email_domain)) = email.rsplit_once('@') else {
        return false;
    };

    let email_domain = email_domain.to_lowercase();
    let domain = domain.to_lowercase();

    email_domain == domain || email_domain.ends_with(&format!(".{}", domain))
}
