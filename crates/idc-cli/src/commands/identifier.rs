// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Identifier subcommand arguments

use super::raw_args;
use clap::Args;
use idc_rest_client::RawArgs;

#[derive(Debug, Clone, Args)]
pub struct IdentifierCreateArgs {
    /// The id for the namespace in which to add the identifier
    #[arg(long)]
    pub namespace: String,
    /// JSON list of URLs from which the referenced data may be retrieved
    #[arg(long)]
    pub location: Option<String>,
    /// JSON list of {value, function} checksum pairs for the target data,
    /// e.g. '[{"value": "<hashval>", "function": "sha256"}]'
    #[arg(long)]
    pub checksums: Option<String>,
    /// JSON list of users allowed to view the identifier, e.g. '["public"]'
    #[arg(long)]
    pub visible_to: String,
    /// Additional metadata in JSON format, e.g. '{"author": "John Doe", "year": 2018}'
    #[arg(long)]
    pub metadata: Option<String>,
}

impl IdentifierCreateArgs {
    pub fn into_raw_args(self) -> RawArgs {
        raw_args([
            ("namespace", Some(self.namespace)),
            ("location", self.location),
            ("checksums", self.checksums),
            ("visible_to", Some(self.visible_to)),
            ("metadata", self.metadata),
        ])
    }
}

#[derive(Debug, Clone, Args)]
pub struct IdentifierUpdateArgs {
    /// The identifier to update
    #[arg(long)]
    pub identifier: String,
    /// JSON list of URLs from which the referenced data may be retrieved
    #[arg(long)]
    pub location: Option<String>,
    /// JSON list of {value, function} checksum pairs for the target data
    #[arg(long)]
    pub checksums: Option<String>,
    /// JSON list of users allowed to view the identifier
    #[arg(long)]
    pub visible_to: Option<String>,
    /// Additional metadata in JSON format
    #[arg(long)]
    pub metadata: Option<String>,
}

impl IdentifierUpdateArgs {
    pub fn into_raw_args(self) -> RawArgs {
        raw_args([
            ("identifier", Some(self.identifier)),
            ("location", self.location),
            ("checksums", self.checksums),
            ("visible_to", self.visible_to),
            ("metadata", self.metadata),
        ])
    }
}

#[derive(Debug, Clone, Args)]
pub struct IdentifierDisplayArgs {
    /// The identifier to display
    #[arg(long)]
    pub identifier: String,
}

impl IdentifierDisplayArgs {
    pub fn into_raw_args(self) -> RawArgs {
        raw_args([("identifier", Some(self.identifier))])
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cli, Commands, Parser};

    #[test]
    fn test_create_flags_map_to_fields() {
        let cli = Cli::try_parse_from([
            "identifier",
            "identifier-create",
            "--namespace",
            "ns1",
            "--visible-to",
            r#"["public"]"#,
            "--metadata",
            r#"{"author":"A"}"#,
        ])
        .unwrap();

        let Commands::IdentifierCreate(args) = cli.command else {
            panic!("expected identifier-create");
        };
        let raw = args.into_raw_args();
        assert_eq!(raw["namespace"].as_deref(), Some("ns1"));
        assert_eq!(raw["visible_to"].as_deref(), Some(r#"["public"]"#));
        assert_eq!(raw["metadata"].as_deref(), Some(r#"{"author":"A"}"#));
        assert_eq!(raw["location"], None);
    }

    #[test]
    fn test_create_requires_visible_to() {
        assert!(
            Cli::try_parse_from(["identifier", "identifier-create", "--namespace", "ns1"]).is_err()
        );
    }

    #[test]
    fn test_display_takes_identifier() {
        let cli = Cli::try_parse_from([
            "identifier",
            "identifier-display",
            "--identifier",
            "ark:/57799/b9x",
        ])
        .unwrap();

        let Commands::IdentifierDisplay(args) = cli.command else {
            panic!("expected identifier-display");
        };
        assert_eq!(args.into_raw_args()["identifier"].as_deref(), Some("ark:/57799/b9x"));
    }
}
