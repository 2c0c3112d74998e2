// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Credential store for the identifiers client.
//!
//! This crate provides:
//! - The `CredentialRecord` holding client identity and the current token pair
//! - Client defaults for the production and development environments
//! - A `CredentialStore` seam with an INI file implementation that saves atomically
//! - Resolution of the credential file location and active environment

pub mod config;
pub mod environment;
pub mod error;
pub mod storage;
pub mod types;

/// Re-export key types for convenience
pub use config::StoreConfig;
pub use environment::Environment;
pub use error::{Error, Result};
pub use storage::{CredentialStore, FileCredentialStore};
pub use types::{CredentialRecord, TokenSet};
