// src/core/prompt.rs

//! Console prompting and the per-command answer cache.

use dialoguer::{Input, theme::ColorfulTheme};
use std::collections::HashMap;
use thiserror::Error;

use crate::models::OptionDescriptor;

/// Failures while asking the user for input.
#[derive(Error, Debug)]
pub enum PromptError {
    /// The terminal could not be driven.
    #[error("User Interface Error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
    /// The user interrupted the prompt.
    #[error("Operation cancelled by user.")]
    Cancelled,
}

/// Reads one line of user input for a prompt. The console implementation blocks
/// until the user answers; tests substitute scripted input.
pub trait LineReader {
    /// Shows `prompt` and returns the raw answer.
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// Reads answers from the terminal through `dialoguer`.
#[derive(Debug, Default)]
pub struct ConsoleLineReader;

impl LineReader for ConsoleLineReader {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        let input = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        input.map_err(map_dialoguer_error)
    }
}

/// Ctrl+C while a prompt is open surfaces as `Cancelled` rather than an I/O error.
pub(crate) fn map_dialoguer_error(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            PromptError::Cancelled
        }
        other => PromptError::Dialoguer(other),
    }
}

/// The text shown when asking for an option's value.
pub fn prompt_label(option: &OptionDescriptor) -> String {
    format!("Enter {}: ({})", option.name, option.description)
}

/// Normalizes a raw answer: trimmed, with blank input meaning "no value".
pub fn normalize_answer(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Answers the user gave during one command run, keyed by option switch.
///
/// Entries are added at most once and never evicted, so an option is asked for
/// at most once per command instance.
#[derive(Debug, Default)]
pub struct PromptCache {
    answers: HashMap<&'static str, String>,
}

impl PromptCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached answer for an option.
    pub fn get(&self, option: &OptionDescriptor) -> Option<&str> {
        self.answers.get(option.switch).map(String::as_str)
    }

    /// Records an answer. An existing answer for the option is kept.
    pub fn insert(&mut self, option: &'static OptionDescriptor, answer: String) -> &str {
        self.answers.entry(option.switch).or_insert(answer)
    }

    /// Number of cached answers.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// True when nothing has been asked yet.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{FUNCTION_NAME, REGION};

    #[test]
    fn test_first_answer_is_kept() {
        let mut cache = PromptCache::new();
        assert_eq!(cache.insert(&REGION, "us-east-2".to_string()), "us-east-2");
        assert_eq!(cache.insert(&REGION, "eu-west-1".to_string()), "us-east-2");
        assert_eq!(cache.get(&REGION), Some("us-east-2"));
        assert_eq!(cache.get(&FUNCTION_NAME), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer("  value \n"), Some("value".to_string()));
        assert_eq!(normalize_answer("   "), None);
        assert_eq!(normalize_answer(""), None);
    }

    #[test]
    fn test_prompt_label_shows_name_and_description() {
        assert_eq!(
            prompt_label(&FUNCTION_NAME),
            "Enter Function Name: (AWS Lambda function name)"
        );
    }
}
