// src/cli/handlers/mod.rs

//! One module per command. Each exposes a `handle` function for the binary's registry.

/// Resolve and print effective settings.
pub mod describe_settings;
/// Print the project defaults file.
pub mod list_defaults;

use crate::command::CommandContext;
use crate::core::options::DISABLE_INTERACTIVE;
use crate::core::arg_parser::ParsedOptions;
use crate::core::resolver::ResolutionResult;
use crate::models::OptionValue;

/// Turns prompting on unless `--disable-interactive` is set, either explicitly or
/// in the project defaults.
pub(crate) fn configure_interactivity(
    context: &mut CommandContext,
    parsed: &ParsedOptions,
) -> ResolutionResult<()> {
    let explicit = parsed.find(&DISABLE_INTERACTIVE).and_then(OptionValue::as_bool);
    let disabled = context
        .bool_value_or_default(explicit, &DISABLE_INTERACTIVE, false)?
        .unwrap_or(false);
    context.enable_interactive = !disabled;
    log::debug!("Interactive prompts enabled: {}", context.enable_interactive);
    Ok(())
}
