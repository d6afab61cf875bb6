// src/core/resolver.rs

//! Option resolution: explicit value, then project defaults, then an interactive
//! prompt when the option is required and prompting is enabled.

use std::collections::HashMap;
use thiserror::Error;

use crate::command::{Collaborators, CommandContext};
use crate::constants::IAM_ARN_PREFIX;
use crate::core::clients::ClientError;
use crate::core::commons::{self, ValueFormatError, non_empty};
use crate::core::credentials::CredentialError;
use crate::core::defaults::{DefaultsError, ResolvedDefaults, determine_project_location};
use crate::core::prompt::{PromptError, normalize_answer, prompt_label};
use crate::core::roles::{IdentityService, RoleError, expand_role_name};
use crate::models::{OptionDescriptor, ServiceKind, ValueProcessor};

/// Every failure the resolution engine can raise.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The defaults file could not be loaded.
    #[error(transparent)]
    Defaults(#[from] DefaultsError),
    /// Credentials could not be resolved.
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    /// A service client could not be built.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A role could not be expanded or selected.
    #[error(transparent)]
    Role(#[from] RoleError),
    /// Prompting failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),
    /// A prompted answer does not parse as the option's kind.
    #[error("{value} cannot be parsed into {expected} for {option}")]
    MalformedScalar {
        /// The answer given.
        value: String,
        /// Display name of the option.
        option: &'static str,
        /// The expected kind.
        expected: &'static str,
    },
    /// A defaulted or prompted key/value string is malformed.
    #[error("Value for {option} is invalid: {source}")]
    MalformedKeyValue {
        /// Long switch of the option.
        option: &'static str,
        /// The parse failure.
        #[source]
        source: ValueFormatError,
    },
    /// No region could be resolved for a client that needs one.
    #[error("Region is required to create the {service} client. Set it with --region or in the project defaults.")]
    UnresolvedRegion {
        /// The service the client was for.
        service: ServiceKind,
    },
    /// Role handling was needed but no identity service is attached.
    #[error("{option} needs an identity service to look up roles, but none is configured.")]
    IdentityServiceUnavailable {
        /// Long switch of the option.
        option: &'static str,
    },
}

/// Result alias for the resolution engine.
pub type ResolutionResult<T> = Result<T, ResolutionError>;

impl CommandContext {
    /// The project defaults, loaded on first access.
    pub fn defaults(&mut self) -> ResolutionResult<&ResolvedDefaults> {
        let defaults = match self.defaults.take() {
            Some(defaults) => defaults,
            None => {
                let location = determine_project_location(
                    self.working_directory(),
                    self.settings.project_location.as_deref(),
                );
                ResolvedDefaults::load(&location)?
            }
        };
        let defaults: &ResolvedDefaults = self.defaults.insert(defaults);
        Ok(defaults)
    }

    /// Resolves a string option. Empty explicit values count as absent.
    pub fn string_value_or_default(
        &mut self,
        explicit: Option<&str>,
        option: &'static OptionDescriptor,
        required: bool,
    ) -> ResolutionResult<Option<String>> {
        if let Some(value) = non_empty(explicit) {
            return self.process_value(option, value).map(Some);
        }
        let default = self.defaults()?.get_string(option).map(str::to_string);
        if let Some(value) = default {
            return self.process_value(option, &value).map(Some);
        }
        if required && self.enable_interactive {
            return self.prompt_for_value(option);
        }
        Ok(None)
    }

    /// Resolves a comma delimited option. An explicit list is returned as given.
    pub fn string_values_or_default(
        &mut self,
        explicit: Option<&[String]>,
        option: &'static OptionDescriptor,
        required: bool,
    ) -> ResolutionResult<Option<Vec<String>>> {
        if let Some(values) = explicit {
            return Ok(Some(values.to_vec()));
        }
        if let Some(value) = self.defaults()?.get_string(option) {
            return Ok(Some(commons::split_by_comma(value)));
        }
        if required && self.enable_interactive {
            let answer = self.prompt_for_value(option)?;
            return Ok(answer.map(|a| commons::split_by_comma(&a)));
        }
        Ok(None)
    }

    /// Resolves a `<key>=<value>` pairs option. An explicit map is returned as given.
    pub fn key_value_pairs_or_default(
        &mut self,
        explicit: Option<&HashMap<String, String>>,
        option: &'static OptionDescriptor,
        required: bool,
    ) -> ResolutionResult<Option<HashMap<String, String>>> {
        if let Some(map) = explicit {
            return Ok(Some(map.clone()));
        }
        let default = self.defaults()?.get_string(option).map(str::to_string);
        let raw = match default {
            Some(value) => Some(value),
            None if required && self.enable_interactive => self.prompt_for_value(option)?,
            None => None,
        };
        raw.map(|r| {
            commons::parse_key_value_option(&r).map_err(|source| {
                ResolutionError::MalformedKeyValue {
                    option: option.switch,
                    source,
                }
            })
        })
        .transpose()
    }

    /// Resolves an integer option. Defaults are only used when stored as integers.
    pub fn int_value_or_default(
        &mut self,
        explicit: Option<i32>,
        option: &'static OptionDescriptor,
        required: bool,
    ) -> ResolutionResult<Option<i32>> {
        if explicit.is_some() {
            return Ok(explicit);
        }
        if let Some(value) = self.defaults()?.get_int(option) {
            return Ok(Some(value));
        }
        if required && self.enable_interactive {
            return self.prompt_for_scalar(option, "an integer", commons::parse_int);
        }
        Ok(None)
    }

    /// Resolves a boolean option. Defaults are only used when stored as booleans.
    pub fn bool_value_or_default(
        &mut self,
        explicit: Option<bool>,
        option: &'static OptionDescriptor,
        required: bool,
    ) -> ResolutionResult<Option<bool>> {
        if explicit.is_some() {
            return Ok(explicit);
        }
        if let Some(value) = self.defaults()?.get_bool(option) {
            return Ok(Some(value));
        }
        if required && self.enable_interactive {
            return self.prompt_for_scalar(option, "a boolean", commons::parse_bool);
        }
        Ok(None)
    }

    // --- Internals ---

    fn prompt_for_scalar<T>(
        &mut self,
        option: &'static OptionDescriptor,
        expected: &'static str,
        parse: fn(&str) -> Option<T>,
    ) -> ResolutionResult<Option<T>> {
        let Some(answer) = self.prompt_for_value(option)? else {
            return Ok(None);
        };
        parse(&answer)
            .map(Some)
            .ok_or(ResolutionError::MalformedScalar {
                value: answer,
                option: option.name,
                expected,
            })
    }

    /// Applies the option's value processor to a resolved string.
    fn process_value(
        &mut self,
        option: &'static OptionDescriptor,
        value: &str,
    ) -> ResolutionResult<String> {
        match option.processor {
            ValueProcessor::Verbatim => Ok(value.to_string()),
            // ARNs pass straight through; the identity client is never built for them.
            ValueProcessor::RoleArn if value.starts_with(IAM_ARN_PREFIX) => Ok(value.to_string()),
            ValueProcessor::RoleArn => {
                self.require_identity(option)?;
                let client = self.identity_client()?;
                let identity = self.identity(option)?;
                Ok(expand_role_name(identity, &client, value)?)
            }
        }
    }

    /// Asks the user for a value, at most once per option for this command.
    fn prompt_for_value(
        &mut self,
        option: &'static OptionDescriptor,
    ) -> ResolutionResult<Option<String>> {
        if let Some(cached) = self.prompts.get(option) {
            log::debug!("Reusing prompted value for {}.", option.switch);
            return Ok(Some(cached.to_string()));
        }

        let answer = match option.processor {
            ValueProcessor::RoleArn => {
                self.require_identity(option)?;
                let client = self.identity_client()?;
                let Collaborators {
                    identity,
                    role_selector,
                    ..
                } = &mut self.services;
                let identity = identity
                    .as_deref()
                    .ok_or(ResolutionError::IdentityServiceUnavailable {
                        option: option.switch,
                    })?;
                role_selector
                    .select_role(identity, &client)?
                    .and_then(|arn| normalize_answer(&arn))
            }
            ValueProcessor::Verbatim => {
                let raw = self.services.line_reader.read_line(&prompt_label(option))?;
                normalize_answer(&raw)
            }
        };

        Ok(answer.map(|a| self.prompts.insert(option, a).to_string()))
    }

    fn require_identity(&self, option: &'static OptionDescriptor) -> ResolutionResult<()> {
        self.identity(option).map(|_| ())
    }

    fn identity(
        &self,
        option: &'static OptionDescriptor,
    ) -> ResolutionResult<&dyn IdentityService> {
        self.services
            .identity
            .as_deref()
            .ok_or(ResolutionError::IdentityServiceUnavailable {
                option: option.switch,
            })
    }
}
