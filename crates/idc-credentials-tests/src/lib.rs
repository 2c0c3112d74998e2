// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Shared credential store fixtures for identifiers client tests

pub mod fixtures;
pub mod memory_store;

/// Re-export common test utilities
pub use fixtures::*;
pub use memory_store::*;
