// src/cli/handlers/describe_settings.rs

//! `describe-settings`: show the effective region, profile, credentials and endpoint.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

use super::configure_interactivity;
use crate::command::{Collaborators, Command, CommandContext};
use crate::core::options::{DISABLE_INTERACTIVE, PROFILE, REGION, build_line_options};
use crate::models::{CredentialSource, OptionDescriptor, OptionValueKind, ValueProcessor};

static JSON_OUTPUT: OptionDescriptor = OptionDescriptor {
    switch: "--json",
    short_switch: None,
    name: "JSON Output",
    description: "Print the resolved settings as JSON",
    kind: OptionValueKind::Bool,
    processor: ValueProcessor::Verbatim,
};

/// The effective settings a deployment would run with.
#[derive(Debug, Serialize)]
struct SettingsReport {
    region: String,
    profile: Option<String>,
    credentials: CredentialSource,
    function_endpoint: String,
    user_agent: &'static str,
    defaults_file: Option<String>,
}

/// Resolves region, profile, credentials and the function client, then prints them.
#[derive(Debug)]
pub struct DescribeSettingsCommand {
    context: CommandContext,
    json: bool,
}

impl DescribeSettingsCommand {
    /// Parses `args` and sets up interactivity.
    pub fn new(working_directory: PathBuf, services: Collaborators, args: &[String]) -> Result<Self> {
        let options = build_line_options(&[&DISABLE_INTERACTIVE, &JSON_OUTPUT]);
        let (mut context, parsed) = CommandContext::from_args(working_directory, services, &options, args)?;
        configure_interactivity(&mut context, &parsed)?;
        let json = parsed
            .find(&JSON_OUTPUT)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        Ok(Self { context, json })
    }

    fn build_report(&mut self) -> Result<SettingsReport> {
        let ctx = &mut self.context;

        let explicit_region = ctx.settings.region.clone();
        let region = ctx
            .string_value_or_default(explicit_region.as_deref(), &REGION, true)?
            .context("No region configured. Pass --region or add \"region\" to the defaults file.")?;
        let explicit_profile = ctx.settings.profile.clone();
        let profile = ctx.string_value_or_default(explicit_profile.as_deref(), &PROFILE, false)?;

        let function_client = ctx.function_client()?;
        let defaults_file = ctx.defaults()?.source().map(|p| p.display().to_string());

        Ok(SettingsReport {
            region,
            profile,
            credentials: function_client.credentials().source.clone(),
            function_endpoint: function_client.endpoint().to_string(),
            user_agent: function_client.user_agent(),
            defaults_file,
        })
    }
}

impl Command for DescribeSettingsCommand {
    fn execute(&mut self) -> Result<bool> {
        let report = self.build_report()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(true);
        }

        println!("{}", "Resolved settings".bold());
        println!("  {:<18} {}", "Region:".cyan(), report.region);
        println!(
            "  {:<18} {}",
            "Profile:".cyan(),
            report.profile.as_deref().unwrap_or("-")
        );
        println!("  {:<18} {}", "Credentials:".cyan(), report.credentials);
        println!("  {:<18} {}", "Function endpoint:".cyan(), report.function_endpoint);
        println!("  {:<18} {}", "User agent:".cyan(), report.user_agent);
        println!(
            "  {:<18} {}",
            "Defaults file:".cyan(),
            report.defaults_file.as_deref().unwrap_or("(none)").dimmed()
        );
        Ok(true)
    }
}

/// Handler for `describe-settings`.
pub fn handle(args: Vec<String>) -> Result<bool> {
    let working_directory = env::current_dir().context("Could not determine the working directory")?;
    let mut command = DescribeSettingsCommand::new(working_directory, Collaborators::console(), &args)?;
    command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULTS_FILENAME;
    use crate::test_support::Fixture;
    use std::fs;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_report_uses_defaults_and_ambient_credentials() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULTS_FILENAME),
            r#"{ "region": "eu-north-1", "disable-interactive": true }"#,
        )
        .unwrap();
        let (fixture_ctx, counters) = Fixture::default().build(dir.path());

        let mut command = DescribeSettingsCommand::new(
            dir.path().to_path_buf(),
            fixture_ctx.services,
            &args(&["--json"]),
        )
        .unwrap();
        assert!(command.json);
        assert!(!command.context.enable_interactive);

        let report = command.build_report().unwrap();
        assert_eq!(report.region, "eu-north-1");
        assert_eq!(report.profile, None);
        assert_eq!(report.credentials, CredentialSource::DefaultChain);
        assert_eq!(report.function_endpoint, "https://lambda.eu-north-1.amazonaws.com");
        assert!(report.defaults_file.is_some());
        assert_eq!(counters.builds.get(), 1);
        assert!(command.execute().unwrap());
    }

    #[test]
    fn test_missing_region_fails_the_command() {
        let dir = TempDir::new().unwrap();
        let (fixture_ctx, counters) = Fixture::default().build(dir.path());

        let mut command = DescribeSettingsCommand::new(
            dir.path().to_path_buf(),
            fixture_ctx.services,
            &args(&["--disable-interactive"]),
        )
        .unwrap();
        assert!(command.execute().is_err());
        assert_eq!(counters.prompts.get(), 0);
    }
}
