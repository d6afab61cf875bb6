// src/bin/lambda-config.rs

//! Entry point: parses the command name and dispatches to its handler.

use anyhow::Result;
use clap::Parser;
use colored::*;
use lambda_config::cli::{Cli, handlers};
use lambda_config::core::prompt::PromptError;
use lambda_config::core::resolver::ResolutionError;
use lambda_config::core::roles::RoleError;

/// A command, its aliases and the handler that runs it. A handler reports
/// success with `Ok(true)` and a handled failure with `Ok(false)`.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    summary: &'static str,
    handler: fn(Vec<String>) -> Result<bool>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "describe-settings",
        aliases: &["settings"],
        summary: "Resolve region, credentials and clients and print the result",
        handler: handlers::describe_settings::handle,
    },
    CommandDefinition {
        name: "list-defaults",
        aliases: &["ls"],
        summary: "Print the entries of the project defaults file",
        handler: handlers::list_defaults::handle,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn print_commands() {
    println!("{}", "Available commands:".bold());
    for command in COMMAND_REGISTRY {
        println!("  {:<20} {}", command.name.cyan(), command.summary);
    }
}

fn main() {
    env_logger::init();

    match run_cli(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            if is_cancelled(&e) {
                std::process::exit(130);
            }
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// True when the user interrupted a prompt with Ctrl+C.
fn is_cancelled(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<ResolutionError>(),
            Some(ResolutionError::Prompt(PromptError::Cancelled))
                | Some(ResolutionError::Role(RoleError::Prompt(PromptError::Cancelled)))
        )
    })
}

fn run_cli(cli: Cli) -> Result<bool> {
    log::debug!("CLI args parsed: {:?}", cli);

    let Some(name) = cli.command else {
        print_commands();
        return Ok(true);
    };

    match find_command(&name) {
        Some(command) => (command.handler)(cli.args),
        None => {
            eprintln!("{} '{}'", "Unknown command".yellow(), name);
            print_commands();
            Ok(false)
        }
    }
}
