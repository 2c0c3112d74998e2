// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `login` and `logout`

use super::CommandContext;
use anyhow::{Context, Result, bail};
use clap::Args;
use idc_credentials::{CredentialRecord, CredentialStore, TokenSet};
use idc_logging::redact;
use idc_rest_client::{NativeAuthClient, PkcePair};
use std::io::{BufRead, Write};

pub const LOGGED_IN_RESPONSE: &str = "You are already logged in!\n\n\
You may force a new login with\n  identifier login --force";

pub const LOGGED_OUT_RESPONSE: &str =
    "You are now successfully logged out of the Identifiers client.";

pub const LOGIN_SUCCESS_RESPONSE: &str =
    "You have successfully logged in to the Identifiers client!";

#[derive(Debug, Clone, Default, Args)]
pub struct LoginArgs {
    /// Do a fresh login, ignoring any existing credentials
    #[arg(long)]
    pub force: bool,

    /// Manual login by copying and pasting an auth code
    #[arg(long)]
    pub no_local_server: bool,
}

pub async fn login(context: &CommandContext, args: LoginArgs) -> Result<()> {
    let mut record = context.store().load().await?;
    if !args.force && record.is_logged_in() {
        println!("{}", LOGGED_IN_RESPONSE);
        return Ok(());
    }

    // Only the copy/paste flow is available; --no-local-server is implied
    let auth = context.auth_client().await?;
    let stdin = std::io::stdin();
    let tokens = link_login(&auth, &record.required_scope, stdin.lock(), std::io::stdout()).await?;

    record.apply_token_set(&tokens);
    if !record.is_logged_in() {
        bail!("Login did not return a refresh token; try again with `identifier login --force`");
    }
    context.store().save(&record).await?;
    tracing::info!(expires_at = record.access_token_expiry, "Stored new tokens");

    println!("{}", LOGIN_SUCCESS_RESPONSE);
    Ok(())
}

/// Print the authorize URL, read the pasted code, exchange it for tokens
pub async fn link_login<R, W>(
    auth: &NativeAuthClient,
    scope: &str,
    mut input: R,
    mut output: W,
) -> Result<TokenSet>
where
    R: BufRead,
    W: Write,
{
    let pkce = PkcePair::generate();
    let redirect_uri = auth.auth_code_redirect_uri()?;
    let authorize_url = auth.authorize_url(scope, &redirect_uri, &pkce)?;

    let rule = "-".repeat(60);
    writeln!(output, "Please log into Globus here:\n{rule}\n{authorize_url}\n{rule}\n")?;
    write!(output, "Enter the resulting Authorization Code here: ")?;
    output.flush()?;

    let mut code = String::new();
    input
        .read_line(&mut code)
        .context("Failed to read the authorization code")?;
    let code = code.trim();
    if code.is_empty() {
        bail!("No authorization code entered");
    }

    Ok(auth.exchange_code(code, &pkce, &redirect_uri).await?)
}

pub async fn logout(context: &CommandContext) -> Result<()> {
    let mut record = context.store().load().await?;

    if record.is_logged_in() {
        let auth = context.auth_client().await?;
        revoke_tokens(&auth, &record).await;
    }

    record.clear_tokens();
    context.store().save(&record).await?;
    println!("{}", LOGGED_OUT_RESPONSE);
    Ok(())
}

/// Revoke both tokens; failures are logged and never block logout
pub async fn revoke_tokens(auth: &NativeAuthClient, record: &CredentialRecord) {
    for (kind, token) in [
        ("access", &record.access_token),
        ("refresh", &record.refresh_token),
    ] {
        if token.is_empty() {
            continue;
        }
        match auth.revoke(token).await {
            Ok(()) => tracing::debug!(kind, token = %redact(token), "Revoked token"),
            Err(err) => tracing::warn!(kind, error = %err, "Token revocation failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idc_credentials_tests::{SAMPLE_ACCESS_TOKEN, SAMPLE_REFRESH_TOKEN, sample_logged_in_record};
    use idc_rest_client::{StatusCode, mock::MockTransport, transport::HttpBody};
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Arc;

    fn auth(transport: &MockTransport) -> NativeAuthClient {
        NativeAuthClient::for_record(&sample_logged_in_record(), Arc::new(transport.clone())).unwrap()
    }

    fn form_value(body: &Option<HttpBody>, key: &str) -> Option<String> {
        match body {
            Some(HttpBody::Form(pairs)) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_link_login_exchanges_pasted_code() {
        let transport = MockTransport::new();
        transport.push_json(
            StatusCode::OK,
            json!({
                "access_token": "new-access",
                "refresh_token": "new-refresh",
                "expires_in": 3600,
            }),
        );
        let mut output = Vec::new();

        let tokens = link_login(
            &auth(&transport),
            "urn:scope",
            Cursor::new("  the-code \n"),
            &mut output,
        )
        .await
        .unwrap();

        assert_eq!(tokens.access_token, "new-access");
        assert_eq!(tokens.refresh_token.as_deref(), Some("new-refresh"));

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("https://auth.globus.org/v2/oauth2/authorize?"));
        assert!(printed.contains("code_challenge_method=S256"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/v2/oauth2/token");
        assert_eq!(form_value(&requests[0].body, "code").as_deref(), Some("the-code"));
        assert_eq!(
            form_value(&requests[0].body, "grant_type").as_deref(),
            Some("authorization_code")
        );
        assert!(form_value(&requests[0].body, "code_verifier").is_some());
    }

    #[tokio::test]
    async fn test_link_login_rejects_empty_code() {
        let transport = MockTransport::new();

        let result = link_login(&auth(&transport), "urn:scope", Cursor::new("\n"), Vec::new()).await;

        assert!(result.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_revoke_tokens_continues_after_failure() {
        let transport = MockTransport::new();
        transport
            .push_json(StatusCode::BAD_REQUEST, json!({"error": "invalid_token"}))
            .push_json(StatusCode::OK, json!({"active": false}));

        revoke_tokens(&auth(&transport), &sample_logged_in_record()).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(form_value(&requests[0].body, "token").as_deref(), Some(SAMPLE_ACCESS_TOKEN));
        assert_eq!(form_value(&requests[1].body, "token").as_deref(), Some(SAMPLE_REFRESH_TOKEN));
    }
}
