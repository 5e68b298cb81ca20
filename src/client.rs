//! # HTTP Client Seam
//!
//! The session layer never touches an HTTP library directly. It builds an
//! [`ApiRequest`] and hands it to an [`ApiClient`]:
//!
//! - [`GooseApi`](crate::attack::GooseApi) sends through a `GooseUser`, so
//!   every request lands in the Goose metrics
//! - [`ReqwestApi`] sends through a plain `reqwest::Client` for smoke runs
//! - tests script responses in memory
//!
//! All requests carry [`ACCEPT`]. Requests with a body also carry
//! `Content-Type: application/json`.

use std::future::Future;

use crate::error::ClientError;

/// `Accept` header sent on every request.
pub const ACCEPT: &str = "application/json, text/plain, */*";

/// `Content-Type` header sent with every request body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP methods the workload uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request the workload wants sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path including the base path, e.g. `/petclinic/api/owners`
    pub path: String,
    /// Name the request is aggregated under in metrics, e.g. `Get Owners`
    pub name: &'static str,
    /// JSON body; `Some` implies `Content-Type: application/json`
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: String, name: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
            name,
            body: None,
        }
    }

    pub fn post(path: String, name: &'static str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path,
            name,
            body: Some(body),
        }
    }

    pub fn delete(path: String, name: &'static str) -> Self {
        Self {
            method: Method::Delete,
            path,
            name,
            body: None,
        }
    }

    /// Serialized body, if any.
    pub fn body_string(&self) -> Option<String> {
        self.body.as_ref().map(|value| value.to_string())
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Pass 2xx responses through, turn anything else into [`ClientError::Status`].
    pub fn error_for_status(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Status {
                status: self.status,
            })
        }
    }

    /// Body parsed as untyped JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Transport used by the session layer.
pub trait ApiClient {
    /// Send `request` and return whatever the target answered.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only failures
    /// to obtain a response at all are errors.
    fn send(
        &mut self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ClientError>> + Send;

    /// Mark the most recent request as failed in the host runner's metrics.
    ///
    /// Called when a 2xx response fails an assertion. Default: no-op.
    fn flag_failure(&mut self, _reason: &str) {}
}

/// [`ApiClient`] over a standalone `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestApi {
    client: reqwest::Client,
    host: String,
}

impl ReqwestApi {
    /// Target `host`, e.g. `http://localhost:9966`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(host: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, host))
    }

    pub fn with_client(client: reqwest::Client, host: &str) -> Self {
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }
}

impl ApiClient for ReqwestApi {
    async fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self
            .client
            .request(method, self.url(&request.path))
            .header("Accept", ACCEPT);
        if let Some(body) = request.body_string() {
            builder = builder.header("Content-Type", CONTENT_TYPE_JSON).body(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}
