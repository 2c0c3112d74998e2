// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Subcommand implementations and the state they share
#![allow(clippy::disallowed_methods)] // CLI is allowed to print to stdout/stderr

pub mod auth;
pub mod identifier;
pub mod namespace;

use crate::GlobalArgs;
use anyhow::Result;
use idc_credentials::{CredentialStore, FileCredentialStore, StoreConfig};
use idc_rest_client::{
    IdentifierClient, NativeAuthClient, NetworkConfig, RawArgs, ReqwestTransport,
    StoreRefreshHandler, Transport,
};
use serde_json::Value;
use std::sync::Arc;

/// Credential store and network settings resolved from global flags
pub struct CommandContext {
    store: Arc<FileCredentialStore>,
    network: NetworkConfig,
}

impl CommandContext {
    pub fn new(global: &GlobalArgs) -> Result<Self> {
        let mut config = StoreConfig::default();
        if let Some(path) = &global.config {
            config = config.with_config_file(path);
        }
        if let Some(environment) = &global.environment {
            config = config.with_environment(environment);
        }

        Ok(Self {
            store: Arc::new(FileCredentialStore::from_config(&config)?),
            network: NetworkConfig::default().with_timeout_secs(global.timeout_secs),
        })
    }

    pub fn store(&self) -> &FileCredentialStore {
        &self.store
    }

    fn transport(&self) -> Result<Arc<dyn Transport>> {
        Ok(Arc::new(ReqwestTransport::new(&self.network)?))
    }

    /// Identity provider client for the stored record's environment
    pub async fn auth_client(&self) -> Result<NativeAuthClient> {
        let record = self.store.load().await?;
        Ok(NativeAuthClient::for_record(&record, self.transport()?)?)
    }

    /// Service client authorized with the stored tokens.
    /// Refreshed access tokens are written back to the same store.
    pub async fn client(&self) -> Result<IdentifierClient> {
        let record = self.store.load().await?;
        let on_refresh = Arc::new(StoreRefreshHandler::new(self.store.clone()));
        Ok(IdentifierClient::from_record(&record, self.transport()?, on_refresh)?)
    }
}

/// Build raw operation arguments from `(field, value)` pairs
pub fn raw_args<'a>(fields: impl IntoIterator<Item = (&'a str, Option<String>)>) -> RawArgs {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use idc_credentials::Environment;

    fn global(config: std::path::PathBuf, environment: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            config: Some(config),
            environment: environment.map(str::to_string),
            timeout_secs: 7,
        }
    }

    #[test]
    fn test_context_uses_explicit_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globus_identifier");

        let context = CommandContext::new(&global(path.clone(), Some("dev"))).unwrap();

        assert_eq!(context.store().path(), path.as_path());
        assert_eq!(context.store().environment(), Environment::Development);
        assert_eq!(context.network.timeout.as_secs(), 7);
    }

    #[test]
    fn test_context_rejects_unknown_environment() {
        let dir = tempfile::tempdir().unwrap();
        let result = CommandContext::new(&global(dir.path().join("record"), Some("staging")));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_client_requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let context =
            CommandContext::new(&global(dir.path().join("globus_identifier"), None)).unwrap();

        let err = context.client().await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<idc_rest_client::IdentifierClientError>(),
            Some(idc_rest_client::IdentifierClientError::NotLoggedIn)
        ));
        assert!(context.store().path().exists(), "defaults are written on first load");
    }

    #[test]
    fn test_raw_args_keeps_nulls() {
        let raw = raw_args([
            ("namespace", Some("ns1".to_string())),
            ("metadata", None),
        ]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw["namespace"].as_deref(), Some("ns1"));
        assert_eq!(raw["metadata"], None);
    }
}
