// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Location of the credential record and the active environment

use crate::environment::Environment;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Environment variable overriding the credential file location
pub const CONFIG_FILE_ENV: &str = "IDENTIFIER_CONFIG_FILE";

/// Environment variable selecting the service environment
pub const ENVIRONMENT_ENV: &str = "IDENTIFIER_ENVIRONMENT";

const DEFAULT_FILE_NAME: &str = ".globus_identifier";

/// Credential store settings
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Explicit credential file path
    pub config_file: Option<PathBuf>,

    /// Explicit environment name
    pub environment: Option<String>,
}

impl StoreConfig {
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Resolve the credential file path
    /// Precedence: config_file > IDENTIFIER_CONFIG_FILE > ~/.globus_identifier
    pub fn config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config_file {
            return Ok(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;
        Ok(home.join(DEFAULT_FILE_NAME))
    }

    /// Resolve the active environment
    /// Precedence: environment > IDENTIFIER_ENVIRONMENT > production
    pub fn environment(&self) -> Result<Environment> {
        if let Some(name) = &self.environment {
            return name.parse();
        }

        match std::env::var(ENVIRONMENT_ENV) {
            Ok(name) if !name.is_empty() => name.parse(),
            _ => Ok(Environment::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let config = StoreConfig::default().with_config_file("/custom/globus_identifier");
        assert_eq!(
            config.config_path().unwrap(),
            PathBuf::from("/custom/globus_identifier")
        );
    }

    #[test]
    fn test_explicit_environment_wins() {
        let config = StoreConfig::default().with_environment("dev");
        assert_eq!(config.environment().unwrap(), Environment::Development);

        let config = StoreConfig::default().with_environment("nowhere");
        assert!(config.environment().is_err());
    }
}
