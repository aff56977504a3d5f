use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{HttpConfig, RetryConfig};
use crate::error::FetchError;

/// HTTP 429 Too Many Requests
pub const STATUS_RATE_LIMITED: u16 = 429;

/// Status and body of a single GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: String::new() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET request, no retries
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// `reqwest` client carrying the browser User-Agent and request timeout
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        // Error bodies are never used
        if !status.is_success() {
            return Ok(HttpResponse::status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body { url: url.to_string(), message: e.to_string() })?;

        Ok(HttpResponse { status: status.as_u16(), body })
    }
}

/// Downloads team pages, backing off while the site answers 429
pub struct Fetcher<T = ReqwestTransport> {
    transport: T,
    retry: RetryConfig,
}

impl Fetcher<ReqwestTransport> {
    /// Fetcher over a real HTTP client
    pub fn from_config(http: &HttpConfig, retry: RetryConfig) -> Result<Self> {
        Ok(Self::new(ReqwestTransport::new(http)?, retry))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `url` and return its body.
    ///
    /// A 429 is retried after `base * (attempt + 2) + jitter` until
    /// `max_attempts` requests have been made; any other non-2xx fails at once.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let max_attempts = self.retry.max_attempts;
        info!("Fetching data from: {}", url);

        for attempt in 0..max_attempts {
            let response = self.transport.get(url).await?;

            if response.status == STATUS_RATE_LIMITED {
                if attempt + 1 == max_attempts {
                    break;
                }
                let wait = self.retry.backoff(attempt, random_jitter(self.retry.max_jitter()));
                warn!(
                    "Rate limited on {} (attempt {}/{}), retrying in {:?}",
                    url,
                    attempt + 1,
                    max_attempts,
                    wait
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !response.is_success() {
                return Err(FetchError::Status { url: url.to_string(), status: response.status });
            }

            debug!("Successfully fetched HTML ({} bytes) from {}", response.body.len(), url);
            return Ok(response.body);
        }

        Err(FetchError::Blocked { url: url.to_string(), attempts: max_attempts })
    }
}

/// Uniform random delay in `[0, max]`
pub fn random_jitter(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    const URL: &str = "https://www.futbol24.com/team/Germany/Bayern-Munchen/";

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let transport =
            ScriptedTransport::new().route(URL, vec![HttpResponse::ok("<html></html>")]);
        let fetcher = Fetcher::new(transport, no_wait_retry(6));

        assert_eq!(fetcher.fetch(URL).await.unwrap(), "<html></html>");
        assert_eq!(fetcher.transport().calls_to(URL), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let transport = ScriptedTransport::new().route(
            URL,
            vec![HttpResponse::status(429), HttpResponse::status(429), HttpResponse::ok("page")],
        );
        let fetcher = Fetcher::new(transport, no_wait_retry(6));

        assert_eq!(fetcher.fetch(URL).await.unwrap(), "page");
        assert_eq!(fetcher.transport().calls_to(URL), 3);
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_is_blocked() {
        let transport = ScriptedTransport::new().route(URL, vec![HttpResponse::status(429)]);
        let fetcher = Fetcher::new(transport, no_wait_retry(6));

        let err = fetcher.fetch(URL).await.unwrap_err();

        match &err {
            FetchError::Blocked { url, attempts } => {
                assert_eq!(url, URL);
                assert_eq!(*attempts, 6);
            }
            other => panic!("expected Blocked, got {other:?}"),
        }
        assert!(err.to_string().contains(URL));
        assert_eq!(fetcher.transport().calls_to(URL), 6);
    }

    #[tokio::test]
    async fn test_other_status_fails_without_retry() {
        let transport = ScriptedTransport::new().route(URL, vec![HttpResponse::status(503)]);
        let fetcher = Fetcher::new(transport, no_wait_retry(6));

        let err = fetcher.fetch(URL).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert_eq!(fetcher.transport().calls_to(URL), 1);
    }

    #[test]
    fn test_random_jitter_is_bounded() {
        assert_eq!(random_jitter(Duration::ZERO), Duration::ZERO);

        let max = Duration::from_millis(50);
        for _ in 0..100 {
            assert!(random_jitter(max) <= max);
        }
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::new(&HttpConfig::default()).is_ok());
    }
}
