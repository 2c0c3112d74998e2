// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory credential store that counts its operations

use async_trait::async_trait;
use idc_credentials::{CredentialRecord, CredentialStore, Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Credential store kept in memory, for tests that do not need a file
#[derive(Debug, Clone)]
pub struct MemoryCredentialStore {
    record: Arc<RwLock<CredentialRecord>>,
    loads: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
    fail_saves: bool,
}

impl MemoryCredentialStore {
    pub fn new(record: CredentialRecord) -> Self {
        Self {
            record: Arc::new(RwLock::new(record)),
            loads: Arc::new(AtomicUsize::new(0)),
            saves: Arc::new(AtomicUsize::new(0)),
            fail_saves: false,
        }
    }

    /// A store whose saves always fail
    pub fn failing_saves(record: CredentialRecord) -> Self {
        Self {
            fail_saves: true,
            ..Self::new(record)
        }
    }

    /// Current record, without counting a load
    pub async fn snapshot(&self) -> CredentialRecord {
        self.record.read().await.clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<CredentialRecord> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.record.read().await.clone())
    }

    async fn save(&self, record: &CredentialRecord) -> Result<()> {
        if self.fail_saves {
            return Err(Error::ConfigUnavailable {
                path: PathBuf::from("memory"),
                reason: "saves disabled".to_string(),
            });
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.record.write().await = record.clone();
        Ok(())
    }
}
