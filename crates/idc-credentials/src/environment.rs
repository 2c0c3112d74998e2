// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Client defaults for each service environment

use crate::error::{Error, Result};

const PRODUCTION_SERVICE_URL: &str = "https://identifiers.globus.org/";
const DEVELOPMENT_SERVICE_URL: &str = "http://localhost:5000/";
const NATIVE_CLIENT_ID: &str = "b61613f8-0da8-4be7-81aa-1c89f2c0fe9f";
const CREATE_UPDATE_SCOPE: &str =
    "https://auth.globus.org/scopes/identifiers.globus.org/create_update";

/// Service environment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn service_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_SERVICE_URL,
            Environment::Development => DEVELOPMENT_SERVICE_URL,
        }
    }

    pub fn client_id(&self) -> &'static str {
        NATIVE_CLIENT_ID
    }

    pub fn scope(&self) -> &'static str {
        CREATE_UPDATE_SCOPE
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            _ => Err(Error::UnknownEnvironment(s.to_string())),
        }
    }
}
