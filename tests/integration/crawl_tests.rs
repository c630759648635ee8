//! Integration tests for the site crawler
//!
//! These tests serve a small company website from wiremock and crawl it end-to-end
//! with the plain HTTP renderer.

use crate::{bare_host, http_config};
use portfolio_crawler::crawler::{CrawlTarget, SiteCrawler};
use portfolio_crawler::extract::{Platform, EMAIL_NOT_FOUND};
use portfolio_crawler::{CrawlPhase, SocialLinks};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a seed page linking to a contact page, a social profile and a dead page
async fn mount_company_site(mock_server: &MockServer) {
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><head><title>Acme</title><script>var x = 1;</script></head><body>
                    <h1>Acme Rockets</h1>
                    <a href="/">Home</a>
                    <a href="/contact">Contact</a>
                    <a href="{}/facebook.com/acme">Facebook</a>
                    <a href="/missing">Old page</a>
                    </body></html>"#,
                    base_url
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><body><p>Questions? Write to hello@acme.test today.</p></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_company() {
    let mock_server = MockServer::start().await;
    mount_company_site(&mock_server).await;
    let base_url = mock_server.uri();

    let dir = tempfile::tempdir().unwrap();
    let mut crawler = SiteCrawler::new(&http_config(dir.path())).expect("Failed to build crawler");

    let result = crawler.crawl(&CrawlTarget::new("Acme", &base_url)).await;
    crawler.close();

    assert_eq!(result.phase, CrawlPhase::Done);
    assert_eq!(result.resolved_url.as_deref(), Some(base_url.as_str()));
    assert_eq!(result.best_email, "hello@acme.test");
    assert_eq!(
        result.social_links.get(Platform::Facebook),
        Some(format!("{}/facebook.com/acme", base_url).as_str())
    );
    assert_eq!(result.social_links.get(Platform::Twitter), None);

    // "/" is skipped; the dead page is tried but contributes nothing
    assert_eq!(
        crawler.crawled_urls(),
        &[
            base_url.clone(),
            format!("{}/contact", base_url),
            format!("{}/facebook.com/acme", base_url),
            format!("{}/missing", base_url),
        ]
    );

    assert_eq!(result.documents.len(), 2);
    assert!(result.documents[0].contains("Acme Rockets"));
    assert!(!result.documents[0].contains("var x"));
    assert!(result.documents[1].contains("hello@acme.test"));
}

#[tokio::test]
async fn test_crawl_resolves_bare_website() {
    let mock_server = MockServer::start().await;
    mount_company_site(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let mut crawler = SiteCrawler::new(&http_config(dir.path())).unwrap();

    let result = crawler
        .crawl(&CrawlTarget::new("Acme", bare_host(&mock_server.uri())))
        .await;

    assert_eq!(result.phase, CrawlPhase::Done);
    assert_eq!(
        result.resolved_url,
        Some(format!("{}/", mock_server.uri()))
    );
    assert_eq!(result.best_email, "hello@acme.test");
}

#[tokio::test]
async fn test_crawl_unreachable_company() {
    let dir = tempfile::tempdir().unwrap();
    let mut crawler = SiteCrawler::new(&http_config(dir.path())).unwrap();

    let result = crawler.crawl(&CrawlTarget::new("Ghost", "127.0.0.1:1")).await;

    assert_eq!(result.phase, CrawlPhase::Aborted);
    assert_eq!(result.best_email, EMAIL_NOT_FOUND);
    assert_eq!(result.social_links, SocialLinks::NotFound);
    assert!(result.resolved_url.is_none());
    assert!(crawler.crawled_urls().is_empty());
}

#[tokio::test]
async fn test_crawl_seed_error_yields_empty_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut crawler = SiteCrawler::new(&http_config(dir.path())).unwrap();

    let result = crawler
        .crawl(&CrawlTarget::new("Broken", mock_server.uri()))
        .await;

    assert_eq!(result.phase, CrawlPhase::Done);
    assert_eq!(result.best_email, "");
    assert_eq!(result.social_links, SocialLinks::Found(Default::default()));
    assert!(result.documents.is_empty());
    assert_eq!(crawler.crawled_urls().len(), 1);
}
