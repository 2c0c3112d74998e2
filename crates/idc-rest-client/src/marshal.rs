// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Splitting flat named arguments into query parameters and a JSON body
//!
//! Each resource kind declares which fields travel in the request body and
//! which of those arrive JSON-encoded. Anything not declared as a body field
//! is sent as a query parameter. Absent and null values are dropped so the
//! service applies its own defaults.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{IdentifierClientError, IdentifierClientResult};

/// Raw caller arguments: field name to optional string value
pub type RawArgs = BTreeMap<String, Option<String>>;

/// Body object holding the landing-page skin fields of a namespace
pub const LANDING_PAGE_SKIN: &str = "landing_page_skin";

/// Where a declared field is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Query,
    Body,
    /// Nested under the namespace's `landing_page_skin` body object
    LandingPageSkin,
}

/// One declared field of a resource schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub destination: Destination,
    pub json_encoded: bool,
}

const fn field(name: &'static str, destination: Destination, json_encoded: bool) -> FieldSpec {
    FieldSpec {
        name,
        destination,
        json_encoded,
    }
}

use Destination::{Body, LandingPageSkin, Query};

const NAMESPACE_FIELDS: &[FieldSpec] = &[
    field("description", Body, false),
    field("display_name", Body, false),
    field("creators", Body, true),
    field("admins", Body, true),
    field("identifier_admins", Body, true),
    field("provider_type", Body, false),
    field("provider_config", Body, true),
    field(LANDING_PAGE_SKIN, Body, true),
    field("header_background", LandingPageSkin, false),
    field("header_icon_url", LandingPageSkin, false),
    field("header_icon_link", LandingPageSkin, false),
    field("header_text", LandingPageSkin, false),
    field("page_title", LandingPageSkin, false),
    field("favicon_url", LandingPageSkin, false),
    field("preamble_text", LandingPageSkin, false),
];

const IDENTIFIER_FIELDS: &[FieldSpec] = &[
    field("namespace", Query, false),
    field("location", Body, true),
    field("checksums", Body, true),
    field("metadata", Body, true),
    field("visible_to", Body, true),
];

/// Resource kinds with a declared argument schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Namespace,
    Identifier,
}

impl ResourceKind {
    pub fn schema(&self) -> &'static [FieldSpec] {
        match self {
            ResourceKind::Namespace => NAMESPACE_FIELDS,
            ResourceKind::Identifier => IDENTIFIER_FIELDS,
        }
    }
}

/// Result of splitting raw arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarshaledArgs {
    pub query: BTreeMap<String, String>,
    pub body: Map<String, Value>,
}

impl MarshaledArgs {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn body_value(&self) -> Value {
        Value::Object(self.body.clone())
    }
}

/// Partition `raw` into query parameters and body fields for `kind`.
/// Fails on the first JSON-encoded field that does not parse.
pub fn split(kind: ResourceKind, raw: RawArgs) -> IdentifierClientResult<MarshaledArgs> {
    let mut remaining: BTreeMap<String, String> =
        raw.into_iter().filter_map(|(name, value)| value.map(|v| (name, v))).collect();

    let mut marshaled = MarshaledArgs::default();
    let mut skin = Map::new();

    for spec in kind.schema() {
        let target = match spec.destination {
            Query => continue,
            Body => &mut marshaled.body,
            LandingPageSkin => &mut skin,
        };
        let Some(value) = remaining.remove(spec.name) else {
            continue;
        };

        let value = if spec.json_encoded {
            serde_json::from_str(&value).map_err(|_| IdentifierClientError::InvalidArgument {
                field: spec.name.to_string(),
                value: value.clone(),
            })?
        } else {
            Value::String(value)
        };

        target.insert(spec.name.to_string(), value);
    }

    if !skin.is_empty() {
        let entry = marshaled
            .body
            .entry(LANDING_PAGE_SKIN)
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(existing) => existing.extend(skin),
            other => {
                return Err(IdentifierClientError::InvalidArgument {
                    field: LANDING_PAGE_SKIN.to_string(),
                    value: other.to_string(),
                });
            }
        }
    }

    marshaled.query = remaining;
    Ok(marshaled)
}

/// Every non-null argument as a query parameter, verbatim.
/// Used by requests that carry no body.
pub fn query_only(raw: RawArgs) -> MarshaledArgs {
    MarshaledArgs {
        query: raw.into_iter().filter_map(|(name, value)| value.map(|v| (name, v))).collect(),
        body: Map::new(),
    }
}

/// Admins implicitly become creators when no separate creator group is given
pub fn default_creators(raw: &mut RawArgs) {
    let creators_missing = !matches!(raw.get("creators"), Some(Some(_)));
    if creators_missing {
        if let Some(Some(admins)) = raw.get("admins") {
            let admins = admins.clone();
            raw.insert("creators".to_string(), Some(admins));
        }
    }
}

/// Remove a required argument, failing when it is absent or null
pub fn take_required(raw: &mut RawArgs, name: &str) -> IdentifierClientResult<String> {
    match raw.remove(name) {
        Some(Some(value)) => Ok(value),
        _ => Err(IdentifierClientError::MissingArgument(name.to_string())),
    }
}
