// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Identity provider client and refresh-token authorization
//!
//! `TokenAuthorizer` decorates one outgoing request at a time with a bearer
//! token. When the stored access token is stale it exchanges the refresh token
//! for a new one, then hands the result to a [`RefreshHandler`] so the caller
//! decides how it is persisted. The refresh token itself is never rotated.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use idc_credentials::{CredentialRecord, CredentialStore, TokenSet};
use rand::RngCore;
use reqwest::Method;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

use crate::error::{IdentifierClientError, IdentifierClientResult, error_detail};
use crate::transport::{HttpRequest, Transport};

/// Identity provider used when the record carries no override
pub const DEFAULT_AUTH_URL: &str = "https://auth.globus.org/";

const TOKEN_PATH: &str = "v2/oauth2/token";
const REVOKE_PATH: &str = "v2/oauth2/token/revoke";
const AUTHORIZE_PATH: &str = "v2/oauth2/authorize";
const AUTH_CODE_REDIRECT_PATH: &str = "v2/web/auth-code";

/// Current unix time in seconds
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    resource_server: Option<String>,
}

impl TokenResponse {
    fn into_token_set(self, issued_at: i64) -> TokenSet {
        TokenSet {
            access_token: self.access_token,
            expires_at: issued_at + self.expires_in,
            refresh_token: self.refresh_token,
            scope: self.scope,
            resource_server: self.resource_server,
        }
    }
}

/// PKCE verifier and its S256 challenge
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_verifier(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn from_verifier(verifier: String) -> Self {
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }
}

/// OAuth2 client for a native (secretless) application
#[derive(Clone)]
pub struct NativeAuthClient {
    transport: Arc<dyn Transport>,
    auth_url: Url,
    client_id: String,
}

impl std::fmt::Debug for NativeAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeAuthClient")
            .field("auth_url", &self.auth_url.as_str())
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl NativeAuthClient {
    pub fn new(transport: Arc<dyn Transport>, auth_url: Url, client_id: impl Into<String>) -> Self {
        Self {
            transport,
            auth_url,
            client_id: client_id.into(),
        }
    }

    /// Client for the identity provider named by a credential record
    pub fn for_record(
        record: &CredentialRecord,
        transport: Arc<dyn Transport>,
    ) -> IdentifierClientResult<Self> {
        let auth_url = Url::parse(record.auth_url.as_deref().unwrap_or(DEFAULT_AUTH_URL))?;
        Ok(Self::new(transport, auth_url, record.client_id.clone()))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Redirect target that displays the authorization code for copy/paste
    pub fn auth_code_redirect_uri(&self) -> IdentifierClientResult<Url> {
        Ok(self.auth_url.join(AUTH_CODE_REDIRECT_PATH)?)
    }

    /// URL the user opens to grant `scope` to this client
    pub fn authorize_url(
        &self,
        scope: &str,
        redirect_uri: &Url,
        pkce: &PkcePair,
    ) -> IdentifierClientResult<Url> {
        let mut url = self.auth_url.join(AUTHORIZE_PATH)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri.as_str())
            .append_pair("scope", scope)
            .append_pair("state", "_default")
            .append_pair("response_type", "code")
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("access_type", "offline");
        Ok(url)
    }

    /// Exchange an authorization code for a token set
    pub async fn exchange_code(
        &self,
        code: &str,
        pkce: &PkcePair,
        redirect_uri: &Url,
    ) -> IdentifierClientResult<TokenSet> {
        self.token_request(vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("code_verifier", pkce.verifier.clone()),
            ("redirect_uri", redirect_uri.to_string()),
            ("client_id", self.client_id.clone()),
        ])
        .await
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh_access_token(&self, refresh_token: &str) -> IdentifierClientResult<TokenSet> {
        self.token_request(vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token.to_string()),
            ("client_id", self.client_id.clone()),
        ])
        .await
    }

    /// Invalidate a token at the identity provider
    pub async fn revoke(&self, token: &str) -> IdentifierClientResult<()> {
        let request = HttpRequest::new(Method::POST, self.auth_url.join(REVOKE_PATH)?)
            .with_form([("token", token.to_string()), ("client_id", self.client_id.clone())]);
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(IdentifierClientError::Api {
                status: response.status,
                detail: error_detail(&response.body),
            });
        }
        Ok(())
    }

    async fn token_request(
        &self,
        form: Vec<(&'static str, String)>,
    ) -> IdentifierClientResult<TokenSet> {
        let issued_at = unix_now();
        let request = HttpRequest::new(Method::POST, self.auth_url.join(TOKEN_PATH)?).with_form(form);
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let detail = error_detail(&response.body);
            tracing::warn!(status = %response.status, detail = %detail, "Token exchange rejected");
            return Err(IdentifierClientError::AuthRefreshFailed {
                status: response.status,
                detail,
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)?;
        Ok(parsed.into_token_set(issued_at))
    }
}

/// Receives refreshed tokens so they can be persisted
#[async_trait]
pub trait RefreshHandler: Send + Sync {
    /// `refresh_token` is the token that was exchanged for `access_token`
    async fn on_refresh(
        &self,
        refresh_token: &str,
        access_token: &str,
        expires_at: i64,
    ) -> IdentifierClientResult<()>;
}

/// Writes refreshed tokens back through a credential store
///
/// The stored record is only updated while it still holds the refresh token
/// that was exchanged, so the token pair on disk always belongs together.
pub struct StoreRefreshHandler {
    store: Arc<dyn CredentialStore>,
}

impl StoreRefreshHandler {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RefreshHandler for StoreRefreshHandler {
    async fn on_refresh(
        &self,
        refresh_token: &str,
        access_token: &str,
        expires_at: i64,
    ) -> IdentifierClientResult<()> {
        let mut record = self.store.load().await?;
        if record.refresh_token != refresh_token {
            tracing::warn!(
                logged_in = record.is_logged_in(),
                "Stored credentials changed during refresh, not persisting the new access token"
            );
            return Ok(());
        }

        record.apply_refresh(access_token, expires_at);
        self.store.save(&record).await?;
        tracing::debug!(expires_at, "Persisted refreshed access token");
        Ok(())
    }
}

/// Access token currently presented, with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationState {
    pub access_token: String,
    pub expires_at: i64,
}

impl AuthorizationState {
    /// Stale when the expiry is at or before `now`
    pub fn is_stale_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Token to present on one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bearer {
    pub token: String,

    /// Whether producing this token required a refresh
    pub refreshed: bool,
}

/// Supplies bearer tokens, refreshing through the identity provider when stale
pub struct TokenAuthorizer {
    auth_client: NativeAuthClient,
    refresh_token: String,
    state: RwLock<AuthorizationState>,
    on_refresh: Arc<dyn RefreshHandler>,
}

impl TokenAuthorizer {
    /// Requires both tokens of the record; otherwise the user is not logged in
    pub fn new(
        record: &CredentialRecord,
        auth_client: NativeAuthClient,
        on_refresh: Arc<dyn RefreshHandler>,
    ) -> IdentifierClientResult<Self> {
        if !record.is_logged_in() {
            return Err(IdentifierClientError::NotLoggedIn);
        }

        Ok(Self {
            auth_client,
            refresh_token: record.refresh_token.clone(),
            state: RwLock::new(AuthorizationState {
                access_token: record.access_token.clone(),
                expires_at: record.access_token_expiry,
            }),
            on_refresh,
        })
    }

    pub async fn state(&self) -> AuthorizationState {
        self.state.read().await.clone()
    }

    /// Token for the next request, refreshed first when stale
    pub async fn bearer(&self) -> IdentifierClientResult<Bearer> {
        let state = self.state().await;
        if state.is_stale_at(unix_now()) {
            tracing::info!(expires_at = state.expires_at, "Access token expired, refreshing");
            let token = self.refresh().await?;
            return Ok(Bearer {
                token,
                refreshed: true,
            });
        }

        Ok(Bearer {
            token: state.access_token,
            refreshed: false,
        })
    }

    /// Exchange the refresh token, persist through the handler, return the new token.
    /// Nothing is committed unless the exchange succeeded.
    pub async fn refresh(&self) -> IdentifierClientResult<String> {
        let mut state = self.state.write().await;

        let tokens = self.auth_client.refresh_access_token(&self.refresh_token).await?;
        self.on_refresh
            .on_refresh(&self.refresh_token, &tokens.access_token, tokens.expires_at)
            .await?;

        state.access_token = tokens.access_token.clone();
        state.expires_at = tokens.expires_at;
        Ok(tokens.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn auth_client(transport: MockTransport) -> NativeAuthClient {
        NativeAuthClient::new(
            Arc::new(transport),
            Url::parse(DEFAULT_AUTH_URL).unwrap(),
            "client-123",
        )
    }

    #[test]
    fn test_pkce_challenge_matches_rfc7636_example() {
        let pair = PkcePair::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string());
        assert_eq!(pair.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_generated_pkce_verifier_length() {
        let pair = PkcePair::generate();
        assert_eq!(pair.verifier.len(), 43);
        assert_ne!(pair.verifier, PkcePair::generate().verifier);
    }

    #[test]
    fn test_authorize_url_carries_pkce_and_scope() {
        let client = auth_client(MockTransport::new());
        let redirect = client.auth_code_redirect_uri().unwrap();
        let pkce = PkcePair::from_verifier("verifier".to_string());

        let url = client.authorize_url("openid", &redirect, &pkce).unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert!(url.as_str().starts_with("https://auth.globus.org/v2/oauth2/authorize?"));
        assert_eq!(pairs["client_id"], "client-123");
        assert_eq!(pairs["scope"], "openid");
        assert_eq!(pairs["code_challenge"], pkce.challenge);
        assert_eq!(pairs["code_challenge_method"], "S256");
        assert_eq!(pairs["redirect_uri"], "https://auth.globus.org/v2/web/auth-code");
    }

    #[tokio::test]
    async fn test_refresh_request_shape() {
        let transport = MockTransport::new();
        transport.push_token("fresh", 3600);
        let client = auth_client(transport.clone());

        let before = unix_now();
        let tokens = client.refresh_access_token("rt").await.unwrap();

        assert_eq!(tokens.access_token, "fresh");
        assert!(tokens.expires_at >= before + 3600);
        assert_eq!(tokens.refresh_token, None);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url.as_str(), "https://auth.globus.org/v2/oauth2/token");
        assert_eq!(requests[0].bearer, None);
        let Some(crate::transport::HttpBody::Form(form)) = &requests[0].body else {
            panic!("token request should be form encoded");
        };
        assert!(form.contains(&("grant_type".to_string(), "refresh_token".to_string())));
        assert!(form.contains(&("refresh_token".to_string(), "rt".to_string())));
        assert!(form.contains(&("client_id".to_string(), "client-123".to_string())));
    }

    #[test]
    fn test_staleness_boundary() {
        let state = AuthorizationState {
            access_token: "a".to_string(),
            expires_at: 100,
        };
        assert!(state.is_stale_at(100));
        assert!(state.is_stale_at(101));
        assert!(!state.is_stale_at(99));
    }
}
