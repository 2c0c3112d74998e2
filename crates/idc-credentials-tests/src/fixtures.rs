// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Test fixtures for credential records and file stores

use idc_credentials::{CredentialRecord, Environment, FileCredentialStore};
use std::path::PathBuf;
use tempfile::TempDir;

/// Access token value used by sample records
pub const SAMPLE_ACCESS_TOKEN: &str = "sample-access-token";

/// Refresh token value used by sample records
pub const SAMPLE_REFRESH_TOKEN: &str = "sample-refresh-token";

/// Expiry far enough ahead that sample tokens never look stale
pub const FAR_FUTURE_EXPIRY: i64 = 4_102_444_800;

/// Test fixture that provides a credential file inside a temporary directory
pub struct TestCredentialsFixture {
    pub temp_dir: TempDir,
    pub store: FileCredentialStore,
}

impl TestCredentialsFixture {
    /// Create a fixture whose credential file does not exist yet
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileCredentialStore::new(
            temp_dir.path().join("globus_identifier"),
            Environment::Production,
        );
        Self { temp_dir, store }
    }

    /// Path to the credential file
    pub fn config_file(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }
}

impl Default for TestCredentialsFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A logged-in record whose access token is still valid
pub fn sample_logged_in_record() -> CredentialRecord {
    let mut record = CredentialRecord::for_environment(Environment::Production);
    record.access_token = SAMPLE_ACCESS_TOKEN.to_string();
    record.access_token_expiry = FAR_FUTURE_EXPIRY;
    record.refresh_token = SAMPLE_REFRESH_TOKEN.to_string();
    record
}

/// A logged-in record whose access token expired long ago
pub fn sample_expired_record() -> CredentialRecord {
    let mut record = sample_logged_in_record();
    record.access_token = "expired-access-token".to_string();
    record.access_token_expiry = 1;
    record
}

/// A record with no tokens
pub fn sample_logged_out_record() -> CredentialRecord {
    CredentialRecord::for_environment(Environment::Production)
}
