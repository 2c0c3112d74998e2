// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use clap::Subcommand;
use idc_logging::CliLoggingArgs;
use idc_rest_client::IdentifierClientError;
use std::path::PathBuf;

pub mod commands;

use commands::{
    CommandContext,
    auth::{LoginArgs, login, logout},
    identifier::{IdentifierCreateArgs, IdentifierDisplayArgs, IdentifierUpdateArgs},
    namespace::{NamespaceCreateArgs, NamespaceIdArgs, NamespaceUpdateArgs},
};

/// Printed to stderr when an operation needs credentials that are not stored
pub const NOT_LOGGED_IN_MESSAGE: &str = "Not logged in. Use:\n  identifier login\nto log in.";

#[derive(clap::Parser)]
#[command(
    name = "identifier",
    about = "Client for the Globus identifiers service",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every subcommand
#[derive(Debug, Clone, clap::Args)]
pub struct GlobalArgs {
    /// Credential file (default: ~/.globus_identifier)
    #[arg(long, env = "IDENTIFIER_CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Service environment: production or development
    #[arg(long, env = "IDENTIFIER_ENVIRONMENT", global = true)]
    pub environment: Option<String>,

    /// Per-request network timeout in seconds
    #[arg(long, default_value_t = 60, global = true)]
    pub timeout_secs: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in via Globus to get credentials for the Identifiers client
    Login(LoginArgs),
    /// Log out of the Identifiers client
    Logout,
    /// Create a new namespace
    NamespaceCreate(NamespaceCreateArgs),
    /// Update the properties of an existing namespace
    NamespaceUpdate(NamespaceUpdateArgs),
    /// Display a namespace
    NamespaceDisplay(NamespaceIdArgs),
    /// Remove an existing namespace
    NamespaceDelete(NamespaceIdArgs),
    /// Create a new identifier
    IdentifierCreate(IdentifierCreateArgs),
    /// Update the state of an identifier
    IdentifierUpdate(IdentifierUpdateArgs),
    /// Display the state of an identifier
    IdentifierDisplay(IdentifierDisplayArgs),
}

impl Commands {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Login(_) => "login",
            Commands::Logout => "logout",
            Commands::NamespaceCreate(_) => "namespace-create",
            Commands::NamespaceUpdate(_) => "namespace-update",
            Commands::NamespaceDisplay(_) => "namespace-display",
            Commands::NamespaceDelete(_) => "namespace-delete",
            Commands::IdentifierCreate(_) => "identifier-create",
            Commands::IdentifierUpdate(_) => "identifier-update",
            Commands::IdentifierDisplay(_) => "identifier-display",
        }
    }
}

impl Cli {
    /// Execute the selected subcommand
    pub async fn run(self) -> anyhow::Result<()> {
        let context = CommandContext::new(&self.global)?;
        tracing::debug!(
            command = self.command.name(),
            config = %context.store().path().display(),
            environment = %context.store().environment(),
            "Running command"
        );

        let response = match self.command {
            Commands::Login(args) => return login(&context, args).await,
            Commands::Logout => return logout(&context).await,
            Commands::NamespaceCreate(args) => {
                context.client().await?.create_namespace(args.into_raw_args()).await?
            }
            Commands::NamespaceUpdate(args) => {
                context.client().await?.update_namespace(args.into_raw_args()).await?
            }
            Commands::NamespaceDisplay(args) => {
                context.client().await?.get_namespace(args.into_raw_args()).await?
            }
            Commands::NamespaceDelete(args) => {
                context.client().await?.delete_namespace(args.into_raw_args()).await?
            }
            Commands::IdentifierCreate(args) => {
                context.client().await?.create_identifier(args.into_raw_args()).await?
            }
            Commands::IdentifierUpdate(args) => {
                context.client().await?.update_identifier(args.into_raw_args()).await?
            }
            Commands::IdentifierDisplay(args) => {
                context.client().await?.get_identifier(args.into_raw_args()).await?
            }
        };

        commands::print_json(&response)
    }
}

/// User-facing text for a failed command
pub fn render_error(command: &str, err: &anyhow::Error) -> String {
    match err.downcast_ref::<IdentifierClientError>() {
        Some(IdentifierClientError::NotLoggedIn) => NOT_LOGGED_IN_MESSAGE.to_string(),
        Some(IdentifierClientError::Api { status, detail }) => format!(
            "Command {} failed with HTTP Status code {}, details:\n{}",
            command,
            status.as_u16(),
            detail
        ),
        Some(typed) => typed.to_string(),
        None => format!("{:#}", err),
    }
}

pub use clap::Parser;
