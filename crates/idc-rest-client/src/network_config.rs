// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Network configuration types

use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Network configuration
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Per-request timeout, covering connect through body read
    pub timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,
}

impl NetworkConfig {
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("identifier-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
