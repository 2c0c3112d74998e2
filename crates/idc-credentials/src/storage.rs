// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Load and save operations for the credential record

use crate::{
    config::StoreConfig,
    environment::Environment,
    error::{Error, Result},
    types::CredentialRecord,
};
use async_trait::async_trait;
use ini::Ini;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Durable holder of the credential record
///
/// Implementations never inspect token freshness; they only move the whole
/// record in and out of storage.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the current record
    async fn load(&self) -> Result<CredentialRecord>;

    /// Replace the stored record as a whole
    async fn save(&self, record: &CredentialRecord) -> Result<()>;
}

/// Credential store backed by an INI file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    environment: Environment,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>, environment: Environment) -> Self {
        Self {
            path: path.into(),
            environment,
        }
    }

    /// Build a store from resolved configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(config.config_path()?, config.environment()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<CredentialRecord> {
        if !async_fs::try_exists(&self.path)
            .await
            .map_err(|e| Error::unavailable(&self.path, e))?
        {
            tracing::info!(
                path = %self.path.display(),
                environment = %self.environment,
                "Credential record not found, creating defaults"
            );
            let record = CredentialRecord::for_environment(self.environment);
            self.save(&record).await?;
            return Ok(record);
        }

        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::unavailable(&self.path, e))?;
        let ini = Ini::load_from_str(&content).map_err(|e| Error::unavailable(&self.path, e))?;
        let record =
            CredentialRecord::from_ini(&ini).map_err(|e| Error::unavailable(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), "Loaded credential record");
        Ok(record)
    }

    async fn save(&self, record: &CredentialRecord) -> Result<()> {
        let mut content = Vec::new();
        record.to_ini().write_to(&mut content)?;
        write_atomically(&self.path, &content).await?;

        tracing::debug!(path = %self.path.display(), "Saved credential record");
        Ok(())
    }
}

/// Write to a sibling temporary file, then rename over the target.
/// Concurrent writers race; the last rename wins.
async fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            async_fs::create_dir_all(parent).await?;
        }
    }

    let mut temp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| Error::Config(format!("Invalid credential path: {}", path.display())))?;
    temp_name.push(format!(".{}.tmp", std::process::id()));
    let temp_file = path.with_file_name(temp_name);

    async_fs::write(&temp_file, data).await?;

    // Owner read/write only (0600)
    #[cfg(unix)]
    {
        let metadata = async_fs::metadata(&temp_file).await?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o600);
        async_fs::set_permissions(&temp_file, permissions).await?;
    }

    if let Err(e) = async_fs::rename(&temp_file, path).await {
        if let Err(cleanup) = async_fs::remove_file(&temp_file).await {
            tracing::warn!(
                "Failed to remove temporary credential file {}: {}",
                temp_file.display(),
                cleanup
            );
        }
        return Err(e.into());
    }

    Ok(())
}
