// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Namespace subcommand arguments

use super::raw_args;
use clap::Args;
use idc_rest_client::RawArgs;

/// Landing page appearance for identifiers minted in a namespace
#[derive(Debug, Clone, Default, Args)]
pub struct LandingPageSkinArgs {
    /// HTML background color for header of landing page
    #[arg(long)]
    pub header_background: Option<String>,
    /// A URL for an image (icon) to be displayed in the header of the landing page
    #[arg(long)]
    pub header_icon_url: Option<String>,
    /// A URL for a hyperlink when the header icon is clicked on in the landing page
    #[arg(long)]
    pub header_icon_link: Option<String>,
    /// A short text string placed in the header of the landing page next to the icon
    #[arg(long)]
    pub header_text: Option<String>,
    /// A short text string placed in the page (tab) title
    #[arg(long)]
    pub page_title: Option<String>,
    /// A URL for the favicon displayed in the page/tab title
    #[arg(long)]
    pub favicon_url: Option<String>,
    /// Short text placed above the metadata of the identifier on the landing page
    #[arg(long)]
    pub preamble_text: Option<String>,
    /// Complete landing page skin as a JSON object
    #[arg(long)]
    pub landing_page_skin: Option<String>,
}

impl LandingPageSkinArgs {
    fn into_raw_args(self) -> RawArgs {
        raw_args([
            ("header_background", self.header_background),
            ("header_icon_url", self.header_icon_url),
            ("header_icon_link", self.header_icon_link),
            ("header_text", self.header_text),
            ("page_title", self.page_title),
            ("favicon_url", self.favicon_url),
            ("preamble_text", self.preamble_text),
            ("landing_page_skin", self.landing_page_skin),
        ])
    }
}

#[derive(Debug, Clone, Args)]
pub struct NamespaceCreateArgs {
    /// display_name of the new namespace
    #[arg(long)]
    pub display_name: String,
    /// description of the new namespace
    #[arg(long)]
    pub description: String,
    /// JSON principal URN(s) for the Globus Group whose members may add to
    /// this namespace (default: the admins value)
    #[arg(long)]
    pub creators: Option<String>,
    /// JSON principal URN(s) for the Globus Group whose members administer
    /// this namespace
    #[arg(long)]
    pub admins: String,
    /// JSON principal URN(s) for the Globus Group whose members administer
    /// identifiers created in this namespace
    #[arg(long)]
    pub identifier_admins: String,
    /// The type of the provider used for minting identifiers
    #[arg(long)]
    pub provider_type: String,
    /// Configuration for the identifier provider in JSON format
    #[arg(long)]
    pub provider_config: Option<String>,
    #[command(flatten)]
    pub skin: LandingPageSkinArgs,
}

impl NamespaceCreateArgs {
    pub fn into_raw_args(self) -> RawArgs {
        let mut raw = raw_args([
            ("display_name", Some(self.display_name)),
            ("description", Some(self.description)),
            ("creators", self.creators),
            ("admins", Some(self.admins)),
            ("identifier_admins", Some(self.identifier_admins)),
            ("provider_type", Some(self.provider_type)),
            ("provider_config", self.provider_config),
        ]);
        raw.extend(self.skin.into_raw_args());
        raw
    }
}

#[derive(Debug, Clone, Args)]
pub struct NamespaceUpdateArgs {
    /// The id for the namespace to update
    #[arg(long)]
    pub namespace_id: String,
    /// The updated display_name of the namespace
    #[arg(long)]
    pub display_name: Option<String>,
    /// The updated description of the namespace
    #[arg(long)]
    pub description: Option<String>,
    /// JSON principal URN(s) of the namespace creators
    #[arg(long)]
    pub creators: Option<String>,
    /// JSON principal URN(s) of the namespace admins
    #[arg(long)]
    pub admins: Option<String>,
    /// JSON principal URN(s) of the identifier admins
    #[arg(long)]
    pub identifier_admins: Option<String>,
    /// The type of the provider used for minting identifiers
    #[arg(long)]
    pub provider_type: Option<String>,
    /// Configuration for the identifier provider in JSON format
    #[arg(long)]
    pub provider_config: Option<String>,
    #[command(flatten)]
    pub skin: LandingPageSkinArgs,
}

impl NamespaceUpdateArgs {
    pub fn into_raw_args(self) -> RawArgs {
        let mut raw = raw_args([
            ("namespace_id", Some(self.namespace_id)),
            ("display_name", self.display_name),
            ("description", self.description),
            ("creators", self.creators),
            ("admins", self.admins),
            ("identifier_admins", self.identifier_admins),
            ("provider_type", self.provider_type),
            ("provider_config", self.provider_config),
        ]);
        raw.extend(self.skin.into_raw_args());
        raw
    }
}

/// Arguments for commands addressing a single namespace
#[derive(Debug, Clone, Args)]
pub struct NamespaceIdArgs {
    /// The id of the namespace
    #[arg(long)]
    pub namespace_id: String,
}

impl NamespaceIdArgs {
    pub fn into_raw_args(self) -> RawArgs {
        raw_args([("namespace_id", Some(self.namespace_id))])
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cli, Commands, Parser};
    use idc_rest_client::{ResourceKind, marshal};
    use serde_json::json;

    #[test]
    fn test_create_flags_map_to_fields() {
        let cli = Cli::try_parse_from([
            "identifier",
            "namespace-create",
            "--display-name",
            "Test",
            "--description",
            "A namespace",
            "--admins",
            r#""urn:globus:groups:id:G""#,
            "--identifier-admins",
            r#"["urn:globus:groups:id:I"]"#,
            "--provider-type",
            "globus",
            "--page-title",
            "Title",
        ])
        .unwrap();

        let Commands::NamespaceCreate(args) = cli.command else {
            panic!("expected namespace-create");
        };
        let mut raw = args.into_raw_args();
        assert_eq!(raw["creators"], None);

        marshal::default_creators(&mut raw);
        let marshaled = marshal::split(ResourceKind::Namespace, raw).unwrap();

        assert!(marshaled.query.is_empty());
        assert_eq!(marshaled.body["creators"], json!("urn:globus:groups:id:G"));
        assert_eq!(marshaled.body["landing_page_skin"], json!({"page_title": "Title"}));
        assert!(!marshaled.body.contains_key("header_text"));
    }

    #[test]
    fn test_create_requires_admins() {
        let result = Cli::try_parse_from([
            "identifier",
            "namespace-create",
            "--display-name",
            "Test",
            "--description",
            "A namespace",
            "--identifier-admins",
            "[]",
            "--provider-type",
            "globus",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_carries_namespace_id() {
        let cli = Cli::try_parse_from([
            "identifier",
            "namespace-update",
            "--namespace-id",
            "ns-42",
            "--description",
            "updated",
        ])
        .unwrap();

        let Commands::NamespaceUpdate(args) = cli.command else {
            panic!("expected namespace-update");
        };
        let raw = args.into_raw_args();
        assert_eq!(raw["namespace_id"].as_deref(), Some("ns-42"));
        assert_eq!(raw["description"].as_deref(), Some("updated"));
        assert_eq!(raw["admins"], None);
    }
}
