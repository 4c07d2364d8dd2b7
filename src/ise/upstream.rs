//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Send the signed, form-encoded POST to the ISE endpoint
//! - Enforce the upstream timeout
//! - Map network failures to `UpstreamError`
//!
//! The `UpstreamClient` trait is the seam tests use to substitute a fake
//! upstream without a live network.

use std::error::Error as _;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::ise::signing::SignedHeaders;
use crate::ise::types::{IseForm, UpstreamError, UpstreamResponse, DEFAULT_CONTENT_TYPE};
use crate::observability::metrics;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// One signed upstream call.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub headers: SignedHeaders,
    pub form: IseForm,
}

/// Capability: send a form-encoded POST and return status/headers/body or a
/// transport error.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn post_form(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}

/// `reqwest`-backed client for the real ISE endpoint.
#[derive(Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpUpstream {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn header_map(headers: &SignedHeaders) -> Result<HeaderMap, UpstreamError> {
        let pairs = [
            ("x-appid", headers.app_id.as_str()),
            ("x-curtime", headers.cur_time.as_str()),
            ("x-param", headers.param.as_str()),
            ("x-checksum", headers.checksum.as_str()),
        ];

        let mut map = HeaderMap::with_capacity(pairs.len() + 1);
        for (name, value) in pairs {
            let value =
                HeaderValue::from_str(value).map_err(|_| UpstreamError::InvalidHeader(name))?;
            map.insert(HeaderName::from_static(name), value);
        }
        map.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        Ok(map)
    }

    fn map_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            return UpstreamError::Timeout(self.timeout.as_secs());
        }
        UpstreamError::Transport(describe(&err))
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn post_form(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let start = Instant::now();
        let headers = Self::header_map(&request.headers)?;

        // `headers` replaces the content type `form` sets, adding the charset.
        let result = self
            .client
            .post(&self.url)
            .form(&request.form)
            .headers(headers)
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                metrics::record_upstream("error", start);
                return Err(self.map_error(e));
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                metrics::record_upstream("error", start);
                return Err(self.map_error(e));
            }
        };

        metrics::record_upstream("response", start);
        tracing::debug!(
            status = %status,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Flatten an error and its sources into one line.
fn describe(err: &reqwest::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}
