//! Configuration and credential resolution for serverless deployment commands.
//!
//! A command declares the options it understands, and a [`command::CommandContext`]
//! resolves each one from an explicit value, the project defaults file, or an
//! interactive prompt. Credentials and region-scoped service clients are built
//! lazily from the same context and cached for the lifetime of the command.

/// Command-line layer.
pub mod cli;
/// Per-command state.
pub mod command;
/// Fixed names.
pub mod constants;
/// Resolution core.
pub mod core;
/// Shared data types.
pub mod models;

#[cfg(test)]
mod test_support;
