// src/core/mod.rs

//! Option, defaults, prompt, credential and client resolution.

/// Argument tokenizer.
pub mod arg_parser;
/// Service clients.
pub mod clients;
/// Value parsing helpers.
pub mod commons;
/// Credential resolution.
pub mod credentials;
/// Project defaults file.
pub mod defaults;
/// Option catalogue.
pub mod options;
/// Prompting.
pub mod prompt;
/// Option resolution engine.
pub mod resolver;
/// Role helpers.
pub mod roles;
