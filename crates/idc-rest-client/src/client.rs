// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Namespace and identifier operations against the identifiers service

use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::auth::{NativeAuthClient, RefreshHandler, TokenAuthorizer};
use crate::error::{IdentifierClientError, IdentifierClientResult, error_detail};
use crate::marshal::{
    MarshaledArgs, RawArgs, ResourceKind, default_creators, query_only, split, take_required,
};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use idc_credentials::CredentialRecord;

/// REST client for the identifiers service
pub struct IdentifierClient {
    base_url: Url,
    authorizer: TokenAuthorizer,
    transport: Arc<dyn Transport>,
}

impl IdentifierClient {
    /// Create a new client
    pub fn new(base_url: Url, authorizer: TokenAuthorizer, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url,
            authorizer,
            transport,
        }
    }

    /// Build a client from a stored credential record.
    /// Fails with `NotLoggedIn` before touching the network when tokens are missing.
    pub fn from_record(
        record: &CredentialRecord,
        transport: Arc<dyn Transport>,
        on_refresh: Arc<dyn RefreshHandler>,
    ) -> IdentifierClientResult<Self> {
        let auth_client = NativeAuthClient::for_record(record, transport.clone())?;
        let authorizer = TokenAuthorizer::new(record, auth_client, on_refresh)?;
        let base_url = Url::parse(&record.service_base_url)?;
        Ok(Self::new(base_url, authorizer, transport))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn authorizer(&self) -> &TokenAuthorizer {
        &self.authorizer
    }

    /// `POST /namespace`
    pub async fn create_namespace(&self, mut args: RawArgs) -> IdentifierClientResult<Value> {
        default_creators(&mut args);
        let marshaled = split(ResourceKind::Namespace, args)?;
        tracing::info!(
            display_name = marshaled.body.get("display_name").and_then(serde_json::Value::as_str),
            "create_namespace"
        );
        let url = self.url_for(&["namespace"])?;
        self.send(Method::POST, url, marshaled, true).await
    }

    /// `PUT /namespace/{namespace_id}`
    pub async fn update_namespace(&self, mut args: RawArgs) -> IdentifierClientResult<Value> {
        let namespace_id = take_required(&mut args, "namespace_id")?;
        default_creators(&mut args);
        let marshaled = split(ResourceKind::Namespace, args)?;
        tracing::info!(namespace_id = %namespace_id, "update_namespace");
        let url = self.url_for(&["namespace", &namespace_id])?;
        self.send(Method::PUT, url, marshaled, true).await
    }

    /// `GET /namespace/{namespace_id}`
    pub async fn get_namespace(&self, mut args: RawArgs) -> IdentifierClientResult<Value> {
        let namespace_id = take_required(&mut args, "namespace_id")?;
        let marshaled = query_only(args);
        tracing::info!(namespace_id = %namespace_id, "get_namespace");
        let url = self.url_for(&["namespace", &namespace_id])?;
        self.send(Method::GET, url, marshaled, false).await
    }

    /// `DELETE /namespace/{namespace_id}`
    pub async fn delete_namespace(&self, mut args: RawArgs) -> IdentifierClientResult<Value> {
        let namespace_id = take_required(&mut args, "namespace_id")?;
        let marshaled = query_only(args);
        tracing::info!(namespace_id = %namespace_id, "delete_namespace");
        let url = self.url_for(&["namespace", &namespace_id])?;
        self.send(Method::DELETE, url, marshaled, false).await
    }

    /// `POST /namespace/{namespace}/identifier`
    ///
    /// The namespace id stays in the query arguments; it is never part of the body.
    pub async fn create_identifier(&self, args: RawArgs) -> IdentifierClientResult<Value> {
        let marshaled = split(ResourceKind::Identifier, args)?;
        let namespace = marshaled
            .query
            .get("namespace")
            .cloned()
            .ok_or_else(|| IdentifierClientError::MissingArgument("namespace".to_string()))?;
        tracing::info!(namespace = %namespace, "create_identifier");
        let url = self.url_for(&["namespace", &namespace, "identifier"])?;
        self.send(Method::POST, url, marshaled, true).await
    }

    /// `PUT /{identifier}`
    pub async fn update_identifier(&self, mut args: RawArgs) -> IdentifierClientResult<Value> {
        let identifier = take_required(&mut args, "identifier")?;
        let marshaled = split(ResourceKind::Identifier, args)?;
        tracing::info!(identifier = %identifier, "update_identifier");
        let url = self.identifier_url(&identifier)?;
        self.send(Method::PUT, url, marshaled, true).await
    }

    /// `GET /{identifier}`
    pub async fn get_identifier(&self, mut args: RawArgs) -> IdentifierClientResult<Value> {
        let identifier = take_required(&mut args, "identifier")?;
        let marshaled = query_only(args);
        tracing::info!(identifier = %identifier, "get_identifier");
        let url = self.identifier_url(&identifier)?;
        self.send(Method::GET, url, marshaled, false).await
    }

    // Private helper methods

    /// Base URL extended with percent-encoded path segments
    fn url_for(&self, segments: &[&str]) -> IdentifierClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                IdentifierClientError::UnexpectedResponse(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Identifiers are resolvable ids; absolute URLs are used as-is
    fn identifier_url(&self, identifier: &str) -> IdentifierClientResult<Url> {
        if identifier.starts_with("http://") || identifier.starts_with("https://") {
            let url = Url::parse(identifier)?;
            if !self.is_service_url(&url) {
                tracing::warn!(
                    url = %url,
                    service = %self.base_url,
                    "Identifier URL is outside the identifiers service; the access token is sent there"
                );
            }
            return Ok(url);
        }
        // Ids such as `ark:/...` would parse as a URL scheme under `Url::join`
        let mut base = self.base_url.as_str().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&format!("{base}{}", identifier.trim_start_matches('/')))?)
    }

    fn is_service_url(&self, url: &Url) -> bool {
        url.origin() == self.base_url.origin()
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        marshaled: MarshaledArgs,
        with_body: bool,
    ) -> IdentifierClientResult<Value> {
        let mut request = HttpRequest::new(method, url).with_query(marshaled.query_pairs());
        if with_body {
            request = request.with_json(marshaled.body_value());
        }

        let bearer = self.authorizer.bearer().await?;
        let mut response = self
            .transport
            .send(request.clone().with_bearer(bearer.token))
            .await?;

        // A rejected token gets one refresh, unless this request already refreshed
        if response.status == StatusCode::UNAUTHORIZED && !bearer.refreshed {
            tracing::info!("Access token rejected, refreshing once");
            let token = self.authorizer.refresh().await?;
            response = self.transport.send(request.with_bearer(token)).await?;
        }

        handle_response(response)
    }
}

fn handle_response(response: HttpResponse) -> IdentifierClientResult<Value> {
    if response.is_success() {
        return response.json();
    }

    let detail = error_detail(&response.body);
    tracing::debug!(status = %response.status, detail = %detail, "Request failed");
    Err(IdentifierClientError::Api {
        status: response.status,
        detail,
    })
}
