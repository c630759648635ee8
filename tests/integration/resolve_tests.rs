//! Website resolution against live mock servers

use crate::{bare_host, http_config};
use portfolio_crawler::crawler::{
    build_http_client, fetch_page, HttpProber, HttpRenderer, PageRenderer,
};
use portfolio_crawler::url::{RetryPolicy, UrlResolver};
use portfolio_crawler::{FetchError, ProbeError, ResolveError};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver(dir: &std::path::Path) -> UrlResolver {
    let config = http_config(dir);
    let client = build_http_client(&config.crawler).expect("Failed to build client");
    UrlResolver::new(
        Arc::new(HttpProber::new(client)),
        RetryPolicy::immediate(config.crawler.retry_attempts),
        &config.user_agent,
    )
}

#[tokio::test]
async fn test_resolve_follows_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/home"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Home</html>"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolved = resolver(dir.path())
        .resolve(&bare_host(&mock_server.uri()))
        .await
        .expect("Resolution failed");

    assert_eq!(resolved, format!("{}/home", mock_server.uri()));
}

#[tokio::test]
async fn test_resolve_retries_forbidden_with_user_agent() {
    let mock_server = MockServer::start().await;

    // Only requests carrying a pool User-Agent get through
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Welcome</html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolved = resolver(dir.path())
        .resolve(&bare_host(&mock_server.uri()))
        .await
        .expect("Resolution failed");

    assert_eq!(resolved, format!("{}/", mock_server.uri()));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_resolve_gives_up_after_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let host = bare_host(&mock_server.uri());
    let result = resolver(dir.path()).resolve(&host).await;

    match result {
        Err(ResolveError::Unreachable { input, .. }) => assert_eq!(input, host),
        other => panic!("Expected unreachable, got {:?}", other),
    }

    // http: first probe plus two retries; https never reaches the plain server
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_resolve_unreachable_host() {
    let dir = tempfile::tempdir().unwrap();
    let result = resolver(dir.path()).resolve("127.0.0.1:1").await;

    match result {
        Err(ResolveError::Unreachable { last_error, .. }) => {
            assert!(matches!(last_error, ProbeError::Connect(_)));
        }
        other => panic!("Expected unreachable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolve_keeps_schemed_input() {
    let dir = tempfile::tempdir().unwrap();
    let resolved = resolver(dir.path())
        .resolve("https://acme.test/about")
        .await
        .unwrap();

    assert_eq!(resolved, "https://acme.test/about");
}

#[tokio::test]
async fn test_http_renderer_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>fine</p>"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = build_http_client(&http_config(dir.path()).crawler).unwrap();
    let mut renderer = HttpRenderer::new(client);

    let ok_url = format!("{}/ok", mock_server.uri());
    assert_eq!(fetch_page(&mut renderer, &ok_url).await, "<p>fine</p>");

    let missing_url = format!("{}/missing", mock_server.uri());
    let err = renderer
        .render(&missing_url)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::Http {
            url: missing_url.clone(),
            status: 404
        }
    );
    assert_eq!(fetch_page(&mut renderer, &missing_url).await, "");
}
