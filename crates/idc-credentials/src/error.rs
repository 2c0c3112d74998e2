// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the credential store

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for credential store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving the credential record
#[derive(Debug, Error)]
pub enum Error {
    #[error("Credential record at {path} is unavailable: {reason}")]
    ConfigUnavailable { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::ConfigUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
