//! URL Feature Extractor
//!
//! Turns a submitted URL into the 30-signal [`FeatureVector`] the model was
//! trained on. Network work (page fetch, DNS) is optional and never fails
//! the extraction: an unreachable site only degrades its signals.

use std::time::Duration;

use url::{Host, Url};

use crate::constants;
use super::domain::DomainFeatures;
use super::lexical::LexicalFeatures;
use super::page::{PageFeatures, PageSnapshot};
use super::vector::{FeatureExtractor, FeatureVector};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FeatureError {
    fn invalid(input: &str, reason: impl ToString) -> Self {
        FeatureError::InvalidUrl {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

// ============================================================================
// CONFIG
// ============================================================================

/// Extractor configuration
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Download the page for content signals
    pub fetch_page: bool,
    /// Resolve the host for the DNS signal
    pub resolve_dns: bool,
    /// Timeout for the page fetch and the DNS lookup, each
    pub timeout: Duration,
    /// Redirects followed before the fetch is abandoned
    pub max_redirects: usize,
    /// Body bytes kept from the fetched page
    pub max_page_bytes: usize,
    pub user_agent: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fetch_page: true,
            resolve_dns: true,
            timeout: Duration::from_secs(constants::DEFAULT_FETCH_TIMEOUT_SECS),
            max_redirects: constants::DEFAULT_MAX_REDIRECTS,
            max_page_bytes: constants::MAX_PAGE_BYTES,
            user_agent: format!("{}/{}", constants::APP_NAME, constants::APP_VERSION),
        }
    }
}

impl ExtractorConfig {
    /// No network access: only address bar signals are computed
    pub fn offline() -> Self {
        Self {
            fetch_page: false,
            resolve_dns: false,
            ..Default::default()
        }
    }
}

// ============================================================================
// EXTRACTOR
// ============================================================================

/// Feature extractor for submitted URLs. Cheap to share across requests.
pub struct UrlFeatureExtractor {
    config: ExtractorConfig,
    http_client: reqwest::Client,
}

impl UrlFeatureExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, FeatureError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parse user input as a URL. Input without a scheme is read as `http://`.
    pub fn parse_url(input: &str) -> Result<Url, FeatureError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FeatureError::invalid(input, "empty URL"));
        }

        let url = match Url::parse(trimmed) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(&format!("http://{trimmed}")).map_err(|e| FeatureError::invalid(input, e))?
            }
            Err(e) => return Err(FeatureError::invalid(input, e)),
        };

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(url),
            _ => Err(FeatureError::invalid(input, "URL has no host")),
        }
    }

    /// Extract the feature vector for a URL
    pub async fn extract(&self, input: &str) -> Result<FeatureVector, FeatureError> {
        let url = Self::parse_url(input)?;

        let (page, resolves) = tokio::join!(self.fetch_page(&url), self.resolve_host(&url));

        let vector = assemble(input.trim(), &url, page.as_ref(), resolves);
        log::debug!("Extracted features for {}: {}", url, vector.to_log_entry());
        Ok(vector)
    }

    async fn fetch_page(&self, url: &Url) -> Option<PageSnapshot> {
        if !self.config.fetch_page || !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let mut current = url.clone();
        let mut redirects = 0;

        loop {
            let mut response = match self.http_client.get(current.clone()).send().await {
                Ok(response) => response,
                Err(e) => {
                    log::debug!("Page fetch failed for {}: {}", current, e);
                    return None;
                }
            };

            if response.status().is_redirection() {
                let next = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|location| current.join(location).ok());

                if let Some(next) = next {
                    redirects += 1;
                    if redirects > self.config.max_redirects {
                        log::debug!("Too many redirects for {}", url);
                        return Some(PageSnapshot::new(next, String::new(), redirects));
                    }
                    current = next;
                    continue;
                }
            }

            return match self.read_body(&mut response).await {
                Ok(body) => Some(PageSnapshot::new(current, body, redirects)),
                Err(e) => {
                    log::debug!("Failed to read body of {}: {}", current, e);
                    None
                }
            };
        }
    }

    /// Read the body up to `max_page_bytes`
    async fn read_body(&self, response: &mut reqwest::Response) -> Result<String, reqwest::Error> {
        let limit = self.config.max_page_bytes;
        let mut body: Vec<u8> = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            let room = limit - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                log::debug!("Page body of {} truncated at {} bytes", response.url(), limit);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn resolve_host(&self, url: &Url) -> Option<bool> {
        if !self.config.resolve_dns {
            return None;
        }

        let host = match url.host()? {
            Host::Ipv4(_) | Host::Ipv6(_) => return Some(true),
            Host::Domain(domain) => domain.to_string(),
        };
        let port = url.port_or_known_default().unwrap_or(80);

        let lookup = tokio::net::lookup_host(format!("{host}:{port}"));
        match tokio::time::timeout(self.config.timeout, lookup).await {
            Ok(Ok(mut addrs)) => Some(addrs.next().is_some()),
            Ok(Err(e)) => {
                log::debug!("DNS lookup failed for {}: {}", host, e);
                Some(false)
            }
            Err(_) => {
                log::debug!("DNS lookup timed out for {}", host);
                Some(false)
            }
        }
    }
}

/// Build the vector from already collected inputs, in layout order
pub fn assemble(
    raw: &str,
    url: &Url,
    page: Option<&PageSnapshot>,
    resolves: Option<bool>,
) -> FeatureVector {
    let mut vector = FeatureVector::new();
    LexicalFeatures::new(raw, url).extract(&mut vector);
    PageFeatures::new(url, page).extract(&mut vector);
    DomainFeatures::new(resolves).extract(&mut vector);
    vector
}
