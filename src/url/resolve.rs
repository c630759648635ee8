//! Resolution of bare website strings into reachable absolute URLs
//!
//! Resolution is split into small steps so each transition can be tested alone:
//!
//! 1. `candidates` decides which URLs to try (the input as-is, or `http://` then `https://`)
//! 2. `classify_probe` turns one probe result into accept / forbidden / failed
//! 3. `UrlResolver` drives the candidates in order, retrying a 403 with rotated
//!    User-Agent headers before moving on

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::{ProbeResponse, Prober};
use crate::url::has_http_scheme;
use crate::{ProbeError, ResolveError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// The URLs to try for one website string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    /// Input already has a scheme and is used without any request
    AsIs(String),
    /// Protocol variants, tried in order
    Variants(Vec<String>),
}

/// Works out which URLs to try for a website string
///
/// # Examples
///
/// ```
/// use portfolio_crawler::url::{candidates, Candidates};
///
/// assert_eq!(
///     candidates("acme.test").unwrap(),
///     Candidates::Variants(vec!["http://acme.test".into(), "https://acme.test".into()])
/// );
/// ```
pub fn candidates(input: &str) -> Result<Candidates, ResolveError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ResolveError::Empty);
    }

    if has_http_scheme(input) {
        return Ok(Candidates::AsIs(input.to_string()));
    }

    Ok(Candidates::Variants(vec![
        format!("http://{}", input),
        format!("https://{}", input),
    ]))
}

/// What a single probe means for the candidate being tried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Server answered without an error status; carries the post-redirect URL
    Accepted(String),
    /// Server answered 403
    Forbidden,
    /// Anything else; the candidate is abandoned
    Failed(ProbeError),
}

/// Classifies the result of one probe
pub fn classify_probe(result: Result<ProbeResponse, ProbeError>) -> ProbeOutcome {
    match result {
        Ok(response) if !response.is_error() => ProbeOutcome::Accepted(response.final_url),
        Ok(response) if response.status == 403 => ProbeOutcome::Forbidden,
        Ok(response) => ProbeOutcome::Failed(ProbeError::Status(response.status)),
        Err(e) if e.is_forbidden() => ProbeOutcome::Forbidden,
        Err(e) => ProbeOutcome::Failed(e),
    }
}

/// Bounded retry with a random delay between attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            attempts: config.retry_attempts,
            min_delay: Duration::from_millis(config.retry_delay_min),
            max_delay: Duration::from_millis(config.retry_delay_max),
        }
    }

    /// No delay between attempts; for tests and local targets
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Picks the delay before the next attempt, uniformly within the bounds
    pub fn next_delay(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        let millis = rand::thread_rng()
            .gen_range(self.min_delay.as_millis() as u64..=self.max_delay.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Turns website strings into working absolute URLs
#[derive(Clone)]
pub struct UrlResolver {
    prober: Arc<dyn Prober>,
    retry: RetryPolicy,
    user_agents: Vec<String>,
}

impl UrlResolver {
    pub fn new(prober: Arc<dyn Prober>, retry: RetryPolicy, agents: &UserAgentConfig) -> Self {
        Self {
            prober,
            retry,
            user_agents: agents.pool.clone(),
        }
    }

    /// Resolves a website string
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The input itself when it already has a scheme, otherwise the
    ///   post-redirect URL of the first protocol variant that answered
    /// * `Err(ResolveError)` - Neither variant produced a usable response
    pub async fn resolve(&self, input: &str) -> Result<String, ResolveError> {
        let variants = match candidates(input)? {
            Candidates::AsIs(url) => {
                tracing::debug!("Website {} already has a scheme, using as-is", url);
                return Ok(url);
            }
            Candidates::Variants(variants) => variants,
        };

        let mut last_error = ProbeError::Other("no candidates tried".to_string());
        for candidate in &variants {
            tracing::debug!("Trying URL: {}", candidate);
            match self.try_candidate(candidate).await {
                Ok(url) => {
                    tracing::info!("Resolved {} to {}", input, url);
                    return Ok(url);
                }
                Err(e) => {
                    tracing::debug!("Giving up on {}: {}", candidate, e);
                    last_error = e;
                }
            }
        }

        Err(ResolveError::Unreachable {
            input: input.trim().to_string(),
            last_error,
        })
    }

    /// Probes one candidate, falling into the 403 retry loop when needed
    async fn try_candidate(&self, candidate: &str) -> Result<String, ProbeError> {
        match classify_probe(self.prober.probe(candidate, None).await) {
            ProbeOutcome::Accepted(url) => Ok(url),
            ProbeOutcome::Failed(e) => Err(e),
            ProbeOutcome::Forbidden => {
                tracing::warn!(
                    "403 Forbidden from {}, retrying with a different user agent",
                    candidate
                );
                self.retry_forbidden(candidate).await
            }
        }
    }

    /// Retries a forbidden candidate with a random User-Agent each time
    async fn retry_forbidden(&self, candidate: &str) -> Result<String, ProbeError> {
        let mut last_error = ProbeError::Status(403);

        for attempt in 1..=self.retry.attempts {
            let agent = self.pick_user_agent();
            match classify_probe(self.prober.probe(candidate, agent.as_deref()).await) {
                ProbeOutcome::Accepted(url) => {
                    tracing::info!(
                        "Request to {} succeeded on retry {}/{}",
                        candidate,
                        attempt,
                        self.retry.attempts
                    );
                    return Ok(url);
                }
                ProbeOutcome::Forbidden => last_error = ProbeError::Status(403),
                ProbeOutcome::Failed(e) => last_error = e,
            }

            tracing::warn!(
                "Retry {}/{} for {} failed: {}",
                attempt,
                self.retry.attempts,
                candidate,
                last_error
            );

            if attempt < self.retry.attempts {
                tokio::time::sleep(self.retry.next_delay()).await;
            }
        }

        Err(last_error)
    }

    fn pick_user_agent(&self) -> Option<String> {
        self.user_agents.choose(&mut rand::thread_rng()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a per-URL queue of scripted results and records every call
    #[derive(Default)]
    struct ScriptedProber {
        script: Mutex<HashMap<String, Vec<Result<ProbeResponse, ProbeError>>>>,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl ScriptedProber {
        fn on(self, url: &str, results: Vec<Result<ProbeResponse, ProbeError>>) -> Self {
            self.script.lock().unwrap().insert(url.to_string(), results);
            self
        }

        fn calls(&self) -> Vec<(String, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(
            &self,
            url: &str,
            user_agent: Option<&str>,
        ) -> Result<ProbeResponse, ProbeError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), user_agent.map(str::to_string)));
            let mut script = self.script.lock().unwrap();
            match script.get_mut(url) {
                Some(queue) if !queue.is_empty() => queue.remove(0),
                _ => Err(ProbeError::Connect("unscripted".to_string())),
            }
        }
    }

    fn ok(final_url: &str) -> Result<ProbeResponse, ProbeError> {
        Ok(ProbeResponse {
            final_url: final_url.to_string(),
            status: 200,
        })
    }

    fn status(code: u16) -> Result<ProbeResponse, ProbeError> {
        Ok(ProbeResponse {
            final_url: "ignored".to_string(),
            status: code,
        })
    }

    fn resolver(prober: Arc<ScriptedProber>) -> UrlResolver {
        let agents = UserAgentConfig {
            pool: vec!["AgentA/1.0".to_string(), "AgentB/1.0".to_string()],
        };
        UrlResolver::new(prober, RetryPolicy::immediate(3), &agents)
    }

    #[test]
    fn test_candidates_with_scheme_is_as_is() {
        assert_eq!(
            candidates("https://acme.test").unwrap(),
            Candidates::AsIs("https://acme.test".to_string())
        );
        assert_eq!(
            candidates("http://acme.test/x").unwrap(),
            Candidates::AsIs("http://acme.test/x".to_string())
        );
    }

    #[test]
    fn test_candidates_http_before_https() {
        match candidates(" acme.test ").unwrap() {
            Candidates::Variants(v) => {
                assert_eq!(v, vec!["http://acme.test", "https://acme.test"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_candidates_empty() {
        assert_eq!(candidates("   "), Err(ResolveError::Empty));
    }

    #[test]
    fn test_classify_probe() {
        assert_eq!(
            classify_probe(ok("https://acme.test/home")),
            ProbeOutcome::Accepted("https://acme.test/home".to_string())
        );
        assert_eq!(classify_probe(status(403)), ProbeOutcome::Forbidden);
        assert_eq!(
            classify_probe(Err(ProbeError::Status(403))),
            ProbeOutcome::Forbidden
        );
        assert_eq!(
            classify_probe(status(500)),
            ProbeOutcome::Failed(ProbeError::Status(500))
        );
        assert_eq!(
            classify_probe(Err(ProbeError::Timeout)),
            ProbeOutcome::Failed(ProbeError::Timeout)
        );
    }

    #[test]
    fn test_next_delay_within_bounds() {
        let policy = RetryPolicy {
            attempts: 3,
            min_delay: Duration::from_millis(3000),
            max_delay: Duration::from_millis(5000),
        };
        for _ in 0..50 {
            let delay = policy.next_delay();
            assert!(delay >= Duration::from_millis(3000));
            assert!(delay <= Duration::from_millis(5000));
        }
        assert_eq!(RetryPolicy::immediate(3).next_delay(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_scheme_input_makes_no_request() {
        let prober = Arc::new(ScriptedProber::default());
        let url = resolver(prober.clone())
            .resolve("https://acme.test")
            .await
            .unwrap();
        assert_eq!(url, "https://acme.test");
        assert!(prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_http_accepted_first_with_redirect_target() {
        let prober = Arc::new(
            ScriptedProber::default()
                .on("http://acme.test", vec![ok("https://acme.test/home")])
                .on("https://acme.test", vec![ok("https://acme.test/")]),
        );
        let url = resolver(prober.clone()).resolve("acme.test").await.unwrap();

        assert_eq!(url, "https://acme.test/home");
        assert_eq!(prober.calls().len(), 1);
        assert_eq!(prober.calls()[0].0, "http://acme.test");
    }

    #[tokio::test]
    async fn test_falls_back_to_https() {
        let prober = Arc::new(
            ScriptedProber::default()
                .on(
                    "http://acme.test",
                    vec![Err(ProbeError::Connect("refused".to_string()))],
                )
                .on("https://acme.test", vec![ok("https://acme.test/")]),
        );
        let url = resolver(prober.clone()).resolve("acme.test").await.unwrap();

        assert_eq!(url, "https://acme.test/");
        let urls: Vec<String> = prober.calls().into_iter().map(|(u, _)| u).collect();
        assert_eq!(urls, vec!["http://acme.test", "https://acme.test"]);
    }

    #[tokio::test]
    async fn test_forbidden_retried_with_rotated_agent() {
        let prober = Arc::new(ScriptedProber::default().on(
            "http://acme.test",
            vec![status(403), status(403), ok("http://acme.test/")],
        ));
        let url = resolver(prober.clone()).resolve("acme.test").await.unwrap();

        assert_eq!(url, "http://acme.test/");
        let calls = prober.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].1, None);
        for (_, agent) in &calls[1..] {
            let agent = agent.as_deref().unwrap();
            assert!(agent == "AgentA/1.0" || agent == "AgentB/1.0");
        }
    }

    #[tokio::test]
    async fn test_forbidden_exhausts_retries_then_tries_https() {
        let prober = Arc::new(
            ScriptedProber::default()
                .on(
                    "http://acme.test",
                    vec![status(403), status(403), status(403), status(403)],
                )
                .on("https://acme.test", vec![ok("https://acme.test/")]),
        );
        let url = resolver(prober.clone()).resolve("acme.test").await.unwrap();

        assert_eq!(url, "https://acme.test/");
        // One initial probe, three retries, then the https variant
        assert_eq!(prober.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_non_forbidden_status_not_retried() {
        let prober = Arc::new(
            ScriptedProber::default()
                .on("http://acme.test", vec![status(500)])
                .on("https://acme.test", vec![status(404)]),
        );
        let err = resolver(prober.clone())
            .resolve("acme.test")
            .await
            .unwrap_err();

        assert_eq!(prober.calls().len(), 2);
        assert_eq!(
            err,
            ResolveError::Unreachable {
                input: "acme.test".to_string(),
                last_error: ProbeError::Status(404),
            }
        );
    }

    #[tokio::test]
    async fn test_both_variants_unreachable() {
        let prober = Arc::new(ScriptedProber::default());
        let result = resolver(prober.clone()).resolve("nowhere.test").await;

        assert!(matches!(result, Err(ResolveError::Unreachable { .. })));
        assert_eq!(prober.calls().len(), 2);
    }
}
