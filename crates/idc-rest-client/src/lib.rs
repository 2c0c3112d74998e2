// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST client for the identifiers service
//!
//! This crate turns flat named arguments into namespace and identifier
//! requests, authorizes them with a refresh-token bearer credential and
//! interprets the service's responses.
//!
//! ## Design Principles
//!
//! Network access goes through the [`transport::Transport`] trait and token
//! persistence through [`auth::RefreshHandler`], so the core logic never
//! depends on a concrete HTTP stack or on where credentials live.

pub mod auth;
pub mod client;
pub mod error;
pub mod marshal;
pub mod mock;
pub mod network_config;
pub mod transport;

pub use auth::*;
pub use client::*;
pub use error::*;
pub use marshal::{RawArgs, ResourceKind};
pub use network_config::NetworkConfig;
pub use reqwest::StatusCode;
pub use transport::{ReqwestTransport, Transport};
