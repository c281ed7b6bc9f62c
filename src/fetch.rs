use crate::config::ImportConfig;
use crate::error::ImportError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// One fetched response: status, bytes, and whatever the server said
/// about the content type
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort byte-to-text decoding: charset from the Content-Type
    /// header when present, then lossy UTF-8, then a single-byte fallback
    /// when the lossy pass is replacement-heavy.
    pub fn text(&self) -> String {
        if let Some(content_type) = &self.content_type {
            if let Some(charset) = charset_of(content_type) {
                if charset.eq_ignore_ascii_case("iso-8859-1")
                    || charset.eq_ignore_ascii_case("latin-1")
                    || charset.eq_ignore_ascii_case("windows-1252")
                {
                    return latin1_to_string(&self.body);
                }
            }
        }

        let lossy = String::from_utf8_lossy(&self.body);
        let replacements = lossy.chars().filter(|c| *c == '\u{fffd}').count();
        if replacements > 0 && replacements * 50 > lossy.chars().count() {
            latin1_to_string(&self.body)
        } else {
            lossy.into_owned()
        }
    }
}

fn charset_of(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("charset="))
        .next()
        .map(|c| c.trim_matches('"'))
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// The network collaborator. Arbitrary header injection is part of the
/// contract (user-agent rotation happens above this trait).
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<FetchResponse, ImportError>;
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        headers: HeaderMap,
    ) -> Result<FetchResponse, ImportError>;
}

pub struct RequestFetcher {
    client: Client,
    user_agents: Vec<String>,
}

impl RequestFetcher {
    pub fn new(config: &ImportConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            user_agents: config.user_agents.clone(),
        }
    }

    fn default_headers(&self, attempt: usize) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if !self.user_agents.is_empty() {
            let agent = &self.user_agents[attempt % self.user_agents.len()];
            if let Ok(value) = HeaderValue::from_str(agent) {
                headers.insert(USER_AGENT, value);
            }
        }
        headers
    }

    /// Fetch a page, rotating the user-agent once on a blocked response
    pub async fn fetch_page(&self, url: &str) -> Result<String, ImportError> {
        for attempt in 0..self.user_agents.len().max(1) {
            let headers = self.default_headers(attempt);
            let response = self.get(url, headers).await?;
            if response.is_success() {
                return Ok(response.text());
            }
            // 403/429 sometimes clear up under a different user-agent
            if response.status == 403 || response.status == 429 {
                warn!(
                    "Fetch of {} returned {}, rotating user-agent",
                    url, response.status
                );
                continue;
            }
            return Err(ImportError::Fetch {
                url: url.to_string(),
                reason: format!("status {}", response.status),
            });
        }
        Err(ImportError::Fetch {
            url: url.to_string(),
            reason: "blocked on every user-agent".to_string(),
        })
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<FetchResponse, ImportError> {
        debug!("GET {url}");
        let response = self.client.get(url).headers(headers).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();
        Ok(FetchResponse {
            status,
            body,
            content_type,
        })
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        headers: HeaderMap,
    ) -> Result<FetchResponse, ImportError> {
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();
        Ok(FetchResponse {
            status,
            body,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_decoding() {
        let response = FetchResponse {
            status: 200,
            body: "crème fraîche".as_bytes().to_vec(),
            content_type: Some("text/html; charset=utf-8".to_string()),
        };
        assert_eq!(response.text(), "crème fraîche");
    }

    #[test]
    fn test_latin1_fallback_from_header() {
        // "café" in Latin-1: the é is a single 0xE9 byte
        let response = FetchResponse {
            status: 200,
            body: vec![b'c', b'a', b'f', 0xE9],
            content_type: Some("text/html; charset=ISO-8859-1".to_string()),
        };
        assert_eq!(response.text(), "café");
    }

    #[test]
    fn test_replacement_heavy_body_falls_back() {
        // Latin-1 bytes with no charset header: lossy UTF-8 would turn
        // every accented byte into U+FFFD
        let body = vec![0xE9, 0xE8, 0xE7, 0xE6];
        let response = FetchResponse {
            status: 200,
            body,
            content_type: None,
        };
        let text = response.text();
        assert!(!text.contains('\u{fffd}'));
    }

    #[test]
    fn test_charset_parsing() {
        assert_eq!(charset_of("text/html; charset=utf-8"), Some("utf-8"));
        assert_eq!(charset_of("text/html"), None);
        assert_eq!(charset_of("text/html; charset=\"UTF-8\""), Some("UTF-8"));
    }
}
