//! InfraNodus API client
//!
//! One POST per logical call. The [`InfraNodusApi`] trait is the seam between
//! the tool layer and the network, so tools can run against fixtures.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::infranodus::request::ApiRequest;

/// Anything that can answer an [`ApiRequest`] with a JSON document
#[async_trait]
pub trait InfraNodusApi: Send + Sync {
    /// Send the request and return the decoded body, which may carry an `error` field
    async fn post(&self, request: &ApiRequest) -> Result<Value>;
}

/// HTTP client for the InfraNodus API
pub struct InfraNodusClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Base URL without trailing slash
    api_base: String,

    /// Bearer token, if configured
    api_key: Option<String>,
}

impl InfraNodusClient {
    /// Create a new client from the configuration
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.api_base, request.path_and_query())
    }
}

#[async_trait]
impl InfraNodusApi for InfraNodusClient {
    async fn post(&self, request: &ApiRequest) -> Result<Value> {
        let endpoint = request.endpoint.path();
        tracing::debug!("POST {}", request.path_and_query());

        let mut builder = self.http_client.post(self.url(request)).json(&request.body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(body) if status.is_success() => Ok(body),
            // Service failures arrive as `{"error": ...}` with a non-success status
            Ok(body) if body.get("error").is_some() => Ok(body),
            Ok(_) => Err(ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            }
            .into()),
            Err(_) if !status.is_success() => Err(ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            }
            .into()),
            Err(e) => Err(ApiError::InvalidResponse {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }
}

/// Message carried by an `error` field, if the document has one
pub fn service_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Perform a call, check the `error` field, then decode the typed document
pub async fn call<T: DeserializeOwned>(api: &dyn InfraNodusApi, request: &ApiRequest) -> Result<T> {
    let body = api.post(request).await?;

    if let Some(message) = service_error(&body) {
        tracing::warn!("InfraNodus {} returned an error: {}", request.endpoint.path(), message);
        return Err(ApiError::Service { message }.into());
    }

    serde_json::from_value(body).map_err(|e| {
        ApiError::InvalidResponse {
            endpoint: request.endpoint.path().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}
