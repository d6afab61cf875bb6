// src/core/arg_parser.rs

//! Turns raw arguments into typed explicit option values.

use std::collections::HashMap;
use thiserror::Error;

use crate::core::commons::{self, ValueFormatError};
use crate::models::{OptionDescriptor, OptionValue, OptionValueKind};

/// Errors raised while tokenizing command-line arguments.
#[derive(Error, Debug)]
pub enum ArgParseError {
    /// A switch the command does not declare.
    #[error("Unknown option '{0}'.")]
    UnknownOption(String),
    /// A switch at the end of the line with no value after it.
    #[error("Option '{switch}' requires a value.")]
    MissingValue {
        /// The option's long switch.
        switch: &'static str,
    },
    /// A value that does not parse as the option's kind.
    #[error("Value '{value}' for option '{switch}' is not a valid {expected}.")]
    InvalidValue {
        /// The option's long switch.
        switch: &'static str,
        /// The rejected value.
        value: String,
        /// The expected kind.
        expected: &'static str,
    },
    /// A malformed key/value option.
    #[error("Value for option '{switch}' is invalid: {source}")]
    KeyValue {
        /// The option's long switch.
        switch: &'static str,
        /// The parse failure.
        #[source]
        source: ValueFormatError,
    },
}

/// The explicit values found on a command line, keyed by the option's long switch.
#[derive(Debug, Clone, Default)]
pub struct ParsedOptions {
    values: HashMap<&'static str, OptionValue>,
    arguments: Vec<String>,
}

impl ParsedOptions {
    /// Returns the explicit value given for an option, if any.
    pub fn find(&self, option: &OptionDescriptor) -> Option<&OptionValue> {
        self.values.get(option.switch)
    }

    /// The explicit string value given for an option, if any.
    pub fn find_string(&self, option: &OptionDescriptor) -> Option<&str> {
        self.find(option).and_then(OptionValue::as_str)
    }

    /// Tokens that were not consumed as an option or an option value.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Number of options given explicitly.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no option was given explicitly.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tokenizes raw command-line arguments against the options a command declares.
///
/// # Logic:
/// - A token matching a declared long or short switch starts an option; any other
///   token starting with `-` is rejected.
/// - String, list, map and integer options consume the following token as their value.
/// - Boolean options consume the following token only when it is `true` or `false`;
///   a bare boolean switch means `true`.
/// - Everything else is a positional argument.
pub fn parse_arguments(
    options: &[&'static OptionDescriptor],
    args: &[String],
) -> Result<ParsedOptions, ArgParseError> {
    let mut parsed = ParsedOptions::default();
    let mut tokens = args.iter().map(String::as_str).peekable();

    while let Some(token) = tokens.next() {
        if !token.starts_with('-') {
            parsed.arguments.push(token.to_string());
            continue;
        }

        let option = options
            .iter()
            .copied()
            .find(|o| o.switch == token || o.short_switch == Some(token))
            .ok_or_else(|| ArgParseError::UnknownOption(token.to_string()))?;

        let value = if option.kind == OptionValueKind::Bool {
            match tokens.peek().and_then(|next| commons::parse_bool(next)) {
                Some(b) => {
                    tokens.next();
                    OptionValue::Bool(b)
                }
                None => OptionValue::Bool(true),
            }
        } else {
            let raw = tokens.next().ok_or(ArgParseError::MissingValue {
                switch: option.switch,
            })?;
            parse_value(option, raw)?
        };

        log::trace!("Parsed option {} = {:?}", option.switch, value);
        parsed.values.insert(option.switch, value);
    }

    Ok(parsed)
}

fn parse_value(option: &'static OptionDescriptor, raw: &str) -> Result<OptionValue, ArgParseError> {
    match option.kind {
        OptionValueKind::String => Ok(OptionValue::String(raw.to_string())),
        OptionValueKind::CommaDelimitedList => Ok(OptionValue::List(commons::split_by_comma(raw))),
        OptionValueKind::KeyValuePairs => commons::parse_key_value_option(raw)
            .map(OptionValue::Map)
            .map_err(|source| ArgParseError::KeyValue {
                switch: option.switch,
                source,
            }),
        OptionValueKind::Int => {
            commons::parse_int(raw)
                .map(OptionValue::Int)
                .ok_or_else(|| ArgParseError::InvalidValue {
                    switch: option.switch,
                    value: raw.to_string(),
                    expected: "integer",
                })
        }
        OptionValueKind::Bool => {
            commons::parse_bool(raw)
                .map(OptionValue::Bool)
                .ok_or_else(|| ArgParseError::InvalidValue {
                    switch: option.switch,
                    value: raw.to_string(),
                    expected: "boolean",
                })
        }
    }
}
