// src/cli/mod.rs

//! Command-line entry points built on top of the resolution engine.

use clap::Parser;

/// Command handlers.
pub mod handlers;

/// lambda-config: inspect how deployment settings resolve for a project.
///
/// Options are resolved from the command line first, then from
/// `aws-lambda-tools-defaults.json` in the project location, and finally by
/// prompting when a required value is still missing.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The command to run (`describe-settings`, `list-defaults`).
    pub command: Option<String>,

    /// Options for the command, e.g. `--region us-west-2 --profile deploy`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
