//! HTTP transport for the management API

use crate::{config::Settings, ClientError, Result};
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Status code and body text of a response.
///
/// Non-2xx statuses are returned as responses, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Thin wrapper over `reqwest` with timeout and retry taken from settings
#[derive(Clone, Debug)]
pub struct HttpClient {
    http: Client,
    retries: u64,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("wcs-client/", env!("CARGO_PKG_VERSION"))),
        );

        let http = Client::builder()
            .timeout(settings.timeout())
            .default_headers(headers)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            http,
            retries: settings.connection_retries,
        })
    }

    /// POST `body` with the given headers
    pub async fn post(
        &self,
        url: &str,
        body: String,
        headers: header::HeaderMap,
    ) -> Result<ApiResponse> {
        self.send("POST", url, self.http.post(url).headers(headers).body(body)).await
    }

    pub async fn get(&self, url: &str) -> Result<ApiResponse> {
        self.send("GET", url, self.http.get(url)).await
    }

    async fn send(&self, method: &str, url: &str, request: RequestBuilder) -> Result<ApiResponse> {
        let mut attempt = 0;
        loop {
            debug!("Sending {} request to {}", method, url);
            // Bodies here are always in-memory strings, so cloning succeeds
            let pending = request.try_clone().ok_or_else(|| {
                ClientError::Config(format!("{} {}: request body can't be resent", method, url))
            })?;

            match pending.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().await?;
                    return Ok(ApiResponse { status, body });
                }
                Err(e) if attempt < self.retries && is_retryable(&e) => {
                    attempt += 1;
                    warn!("{} {} failed ({}), retry {}/{}", method, url, e, attempt, self.retries);
                }
                Err(e) => return Err(ClientError::Http(e)),
            }
        }
    }
}

fn is_retryable(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}
