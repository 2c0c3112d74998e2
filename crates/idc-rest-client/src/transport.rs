// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! HTTP transport seam and its reqwest implementation

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::{IdentifierClientError, IdentifierClientResult};
use crate::network_config::NetworkConfig;

/// Request body variants
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// Description of a single outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            bearer: None,
            body: None,
        }
    }

    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(HttpBody::Json(body));
        self
    }

    pub fn with_form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(HttpBody::Form(
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ));
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON; an empty body decodes to `null`
    pub fn json(&self) -> IdentifierClientResult<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(IdentifierClientError::from)
    }
}

/// Sends exactly one HTTP request per call; no retries
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> IdentifierClientResult<HttpResponse>;
}

/// Transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    pub fn new(config: &NetworkConfig) -> IdentifierClientResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> IdentifierClientResult<HttpResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = self.http_client.request(request.method, request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            Some(HttpBody::Json(body)) => builder.json(&body),
            Some(HttpBody::Form(pairs)) => builder.form(&pairs),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Received response");
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let url = Url::parse("https://identifiers.example.org/namespace").unwrap();
        let request = HttpRequest::new(Method::POST, url.clone())
            .with_query([("namespace", "ns1")])
            .with_json(json!({"display_name": "x"}))
            .with_bearer("token");

        assert_eq!(request.url, url);
        assert_eq!(request.query, vec![("namespace".to_string(), "ns1".to_string())]);
        assert_eq!(request.bearer.as_deref(), Some("token"));
        assert_eq!(request.body, Some(HttpBody::Json(json!({"display_name": "x"}))));
    }

    #[test]
    fn test_empty_body_decodes_to_null() {
        let response = HttpResponse::new(StatusCode::NO_CONTENT, "");
        assert_eq!(response.json().unwrap(), Value::Null);

        let response = HttpResponse::new(StatusCode::OK, "not json");
        assert!(response.json().is_err());
    }

    #[test]
    fn test_reqwest_transport_builds() {
        let config = NetworkConfig::default().with_timeout_secs(5);
        assert!(ReqwestTransport::new(&config).is_ok());
    }
}
