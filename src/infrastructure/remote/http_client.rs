use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// PostgreSQL error code for insufficient privilege
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError>;

    /// Posts a JSON body; an empty response body yields `Value::Null`
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    async fn delete(&self, url: &str, headers: Vec<(&str, &str)>) -> Result<(), DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::remote(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::remote(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), body));
        }

        Ok(body)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_headers(
    mut request: reqwest::RequestBuilder,
    headers: Vec<(&str, &str)>,
) -> reqwest::RequestBuilder {
    for (key, value) in headers {
        request = request.header(key, value);
    }
    request
}

fn parse_body(body: &str) -> Result<serde_json::Value, DomainError> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }

    serde_json::from_str(body)
        .map_err(|e| DomainError::remote(format!("Failed to parse response: {}", e)))
}

/// Maps a non-success response to a domain error
pub(crate) fn status_error(status: u16, body: String) -> DomainError {
    if status == 401 || status == 403 || body.contains(INSUFFICIENT_PRIVILEGE) {
        return DomainError::permission_denied(format!("HTTP {}: {}", status, body));
    }

    DomainError::remote_status(status, body)
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError> {
        let request = apply_headers(self.client.get(url), headers);
        let body = self.send(request).await?;
        parse_body(&body)
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let request = apply_headers(self.client.post(url), headers).json(body);
        let body = self.send(request).await?;
        parse_body(&body)
    }

    async fn delete(&self, url: &str, headers: Vec<(&str, &str)>) -> Result<(), DomainError> {
        let request = apply_headers(self.client.delete(url), headers);
        self.send(request).await?;
        Ok(())
    }
}
