// src/cli/handlers/list_defaults.rs

//! `list-defaults`: show the project defaults file.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::env;
use std::path::PathBuf;

use crate::command::{Collaborators, Command, CommandContext};
use crate::core::defaults::determine_project_location;
use crate::core::options::{build_line_options, find_option};

/// Prints every entry of the project defaults file, flagging keys that no known
/// option uses. Fails when the project has no defaults file.
#[derive(Debug)]
pub struct ListDefaultsCommand {
    context: CommandContext,
}

impl ListDefaultsCommand {
    /// Parses `args`.
    pub fn new(working_directory: PathBuf, services: Collaborators, args: &[String]) -> Result<Self> {
        let (context, _) =
            CommandContext::from_args(working_directory, services, &build_line_options(&[]), args)?;
        Ok(Self { context })
    }

    fn render_lines(&mut self) -> Result<Option<Vec<String>>> {
        let defaults = self.context.defaults()?;
        let Some(source) = defaults.source() else {
            return Ok(None);
        };

        let mut lines = vec![format!("Defaults from {}", source.display())];
        let mut entries: Vec<_> = defaults.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let known = find_option(&format!("--{}", key)).is_some();
            let marker = if known { "" } else { " (unknown option)" };
            lines.push(format!("  {} = {}{}", key, rendered, marker));
        }
        Ok(Some(lines))
    }

    fn missing_file_message(&self) -> String {
        let location = determine_project_location(
            self.context.working_directory(),
            self.context.settings.project_location.as_deref(),
        );
        format!("No defaults file found in '{}'.", location.display())
    }
}

impl Command for ListDefaultsCommand {
    fn execute(&mut self) -> Result<bool> {
        match self.render_lines()? {
            Some(lines) => {
                for line in lines {
                    println!("{}", line);
                }
                Ok(true)
            }
            None => {
                eprintln!("{}", self.missing_file_message().yellow());
                Ok(false)
            }
        }
    }
}

/// Handler for `list-defaults`.
pub fn handle(args: Vec<String>) -> Result<bool> {
    let working_directory = env::current_dir().context("Could not determine the working directory")?;
    let mut command = ListDefaultsCommand::new(working_directory, Collaborators::console(), &args)?;
    command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULTS_FILENAME;
    use crate::test_support::Fixture;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_sorted_entries_and_flags_unknown_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULTS_FILENAME),
            r#"{ "region": "us-west-2", "function-memory-size": 512, "custom": true }"#,
        )
        .unwrap();
        let services = Fixture::default().build(dir.path()).0.services;
        let mut command = ListDefaultsCommand::new(dir.path().to_path_buf(), services, &[]).unwrap();

        let lines = command.render_lines().unwrap().unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "  custom = true (unknown option)");
        assert_eq!(lines[2], "  function-memory-size = 512");
        assert_eq!(lines[3], "  region = us-west-2");
    }

    #[test]
    fn test_missing_defaults_file_is_a_false_result() {
        let dir = TempDir::new().unwrap();
        let services = Fixture::default().build(dir.path()).0.services;
        let mut command = ListDefaultsCommand::new(dir.path().to_path_buf(), services, &[]).unwrap();
        assert!(!command.execute().unwrap());
    }

    #[test]
    fn test_missing_file_message_names_the_project_location() {
        let dir = TempDir::new().unwrap();
        let services = Fixture::default().build(dir.path()).0.services;
        let args = vec!["-pl".to_string(), "nested/fn".to_string()];
        let mut command = ListDefaultsCommand::new(dir.path().to_path_buf(), services, &args).unwrap();

        assert!(command.render_lines().unwrap().is_none());
        let expected = dir.path().join("nested/fn");
        assert_eq!(
            command.missing_file_message(),
            format!("No defaults file found in '{}'.", expected.display())
        );
    }
}
