use crate::core::error::Result;
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;

/// Thin JSON-over-HTTP client bound to one endpoint and one bearer token.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: String,
    api_key: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            extra_headers: extra_headers.unwrap_or_default(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `payload` as JSON to the endpoint. Non-success statuses are
    /// turned into errors.
    pub async fn post<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Response> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");

        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;
        Ok(response.error_for_status()?)
    }
}
