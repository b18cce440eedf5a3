use std::io;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use quake_core::QueryParams;
use quake_logging::{quake_debug, quake_trace};
use reqwest::header::CONTENT_TYPE;
use tokio_util::io::StreamReader;
use url::Url;

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput, ResponseBody};

/// USGS FDSN event service.
pub const DEFAULT_BASE_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/";
pub const DEFAULT_ENDPOINT: &str = "query";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "application/xml".to_string(),
                "text/xml".to_string(),
                "application/quakeml+xml".to_string(),
            ],
        }
    }
}

/// Network collaborator: sends one feed query and hands back the body
/// unread.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn send_query(&self, query: &QueryParams) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn query_url(&self, query: &QueryParams) -> Result<Url, FetchError> {
        let base = Url::parse(&self.settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        query
            .to_url(&base, &self.settings.endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn build_client(&self, redirect_counter: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn send_query(&self, query: &QueryParams) -> Result<FetchOutput, FetchError> {
        let url = self.query_url(query)?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        quake_debug!("GET {}", url);
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        let content_length = response.content_length();
        if let Some(content_len) = content_length {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let metadata = FetchMetadata {
            request_url: url.to_string(),
            final_url: response.url().to_string(),
            redirect_count: redirect_counter.load(Ordering::Relaxed),
            status: status.as_u16(),
            content_type,
            content_length,
        };

        // The body is handed over as a reader; the byte budget is enforced
        // while it is consumed.
        let mut received: u64 = 0;
        let chunks = response.bytes_stream().map(move |chunk| -> io::Result<Bytes> {
            let chunk = chunk.map_err(io::Error::other)?;
            received += chunk.len() as u64;
            quake_trace!("Body chunk of {} bytes ({} so far)", chunk.len(), received);
            if received > max_bytes {
                return Err(io::Error::other(format!(
                    "response exceeded {max_bytes} bytes"
                )));
            }
            Ok(chunk)
        });
        let body: ResponseBody = Box::pin(StreamReader::new(chunks));

        Ok(FetchOutput { body, metadata })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
