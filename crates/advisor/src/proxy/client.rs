//! HTTP client for the chat-completion proxy.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::instrument;
use url::Url;

use crate::config::ProxyConfig;

use super::error::ProxyError;
use super::types::{ChatMessage, CompletionRequest, ProxyResponse};

/// Chat-completion proxy client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ProxyClient {
    inner: Arc<ProxyClientInner>,
}

struct ProxyClientInner {
    client: reqwest::Client,
    url: Url,
    model: String,
}

impl ProxyClient {
    /// Create a new proxy client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. no TLS
    /// backend available).
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ProxyClientInner {
                client,
                url: config.url.clone(),
                model: config.model.clone(),
            }),
        })
    }

    /// Endpoint this client posts to.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Send one completion request and classify the answer.
    ///
    /// The HTTP status does not affect classification: proxies commonly wrap
    /// upstream failures in a JSON body, which then classifies as
    /// [`ProxyResponse::Unrecognized`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, or the body is not
    /// JSON.
    #[instrument(skip(self, messages), fields(model = %self.inner.model, messages = messages.len()))]
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<ProxyResponse, ProxyError> {
        let request = CompletionRequest {
            model: &self.inner.model,
            messages,
        };

        let response = self
            .inner
            .client
            .post(self.inner.url.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "Proxy returned non-success status");
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ProxyError::Parse(format!("Failed to parse response: {e}")))?;
        tracing::debug!(response = %value, "Proxy response");

        Ok(ProxyResponse::classify(&value))
    }
}
