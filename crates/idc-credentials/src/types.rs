// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Core types for the credential record

use crate::environment::Environment;
use ini::Ini;

/// Current tokens and client identity, as persisted by the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// OAuth client id of the native application
    pub client_id: String,

    /// Base URL of the identifiers service
    pub service_base_url: String,

    /// Scope requested at login
    pub required_scope: String,

    /// Identity provider base URL override
    pub auth_url: Option<String>,

    /// Current access token, empty when logged out
    pub access_token: String,

    /// Access token expiry in unix seconds, 0 when never issued
    pub access_token_expiry: i64,

    /// Long-lived refresh token, empty when logged out
    pub refresh_token: String,
}

impl CredentialRecord {
    /// Create a logged-out record with the client defaults of an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            client_id: environment.client_id().to_string(),
            service_base_url: environment.service_url().to_string(),
            required_scope: environment.scope().to_string(),
            auth_url: None,
            access_token: String::new(),
            access_token_expiry: 0,
            refresh_token: String::new(),
        }
    }

    /// Both tokens present. Expiry is not consulted.
    pub fn is_logged_in(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }

    /// Drop all tokens, leaving client identity untouched
    pub fn clear_tokens(&mut self) {
        self.access_token.clear();
        self.access_token_expiry = 0;
        self.refresh_token.clear();
    }

    /// Record a refreshed access token. The refresh token is never rotated here.
    pub fn apply_refresh(&mut self, access_token: &str, expiry: i64) {
        self.access_token = access_token.to_string();
        self.access_token_expiry = expiry;
    }

    /// Record the result of a login
    pub fn apply_token_set(&mut self, tokens: &TokenSet) {
        self.access_token = tokens.access_token.clone();
        self.access_token_expiry = tokens.expires_at;
        if let Some(refresh_token) = &tokens.refresh_token {
            self.refresh_token = refresh_token.clone();
        }
    }
}

/// Normalized token response from the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,

    /// Absolute expiry in unix seconds
    pub expires_at: i64,

    pub refresh_token: Option<String>,

    pub scope: Option<String>,

    pub resource_server: Option<String>,
}

const CLIENT_SECTION: &str = "client";
const TOKENS_SECTION: &str = "tokens";

/// On-disk shape of the record: an INI file with a `[client]` and a
/// `[tokens]` section
impl CredentialRecord {
    pub(crate) fn from_ini(ini: &Ini) -> std::result::Result<Self, String> {
        let client = |key: &str| {
            ini.get_from(Some(CLIENT_SECTION), key)
                .map(str::to_string)
                .ok_or_else(|| format!("missing key `{key}` in [{CLIENT_SECTION}]"))
        };
        let token = |key: &str| {
            ini.get_from(Some(TOKENS_SECTION), key)
                .unwrap_or_default()
                .to_string()
        };

        let expires = ini
            .get_from(Some(TOKENS_SECTION), "access_token_expires")
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let access_token_expiry = match expires {
            Some(value) => value
                .parse::<i64>()
                .map_err(|_| format!("access_token_expires is not a number: {value}"))?,
            None => 0,
        };

        Ok(Self {
            service_base_url: client("service_url")?,
            client_id: client("client_id")?,
            required_scope: client("scope")?,
            auth_url: ini
                .get_from(Some(CLIENT_SECTION), "auth_url")
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            access_token: token("access_token"),
            access_token_expiry,
            refresh_token: token("refresh_token"),
        })
    }

    pub(crate) fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        let mut client = vec![
            ("service_url", self.service_base_url.clone()),
            ("client_id", self.client_id.clone()),
            ("scope", self.required_scope.clone()),
        ];
        if let Some(auth_url) = &self.auth_url {
            client.push(("auth_url", auth_url.clone()));
        }
        for (key, value) in client {
            ini.set_to(Some(CLIENT_SECTION), key.to_string(), value);
        }

        for (key, value) in [
            ("access_token", self.access_token.clone()),
            ("access_token_expires", self.access_token_expiry.to_string()),
            ("refresh_token", self.refresh_token.clone()),
        ] {
            ini.set_to(Some(TOKENS_SECTION), key.to_string(), value);
        }
        ini
    }
}
