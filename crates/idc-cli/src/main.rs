// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI is allowed to print to stdout/stderr

use idc_cli::{Cli, Parser, render_error};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = cli.logging.clone().init("idc-cli") {
        eprintln!("Failed to initialize logging: {:#}", err);
    }

    let command = cli.command.name();
    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::info!(command, error = %err, "Command failed");
            eprintln!("{}", render_error(command, &err));
            ExitCode::FAILURE
        }
    }
}
