// textguard/src/commands/mod.rs
//! Command implementations and the plumbing they share: loading the guard,
//! parsing overrides, reading input and mapping failures to exit codes.
//!
//! Exit codes: `0` success, `1` invalid input (from `validate`) or an I/O
//! failure, `2` a configuration problem (unknown preset, bad step options,
//! unreadable config or theme, malformed `--set`).
//!
//! License: MIT OR APACHE 2.0

pub mod filter;
pub mod presets;
pub mod validate;

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use serde_json::Value;
use thiserror::Error;

use textguard_core::{
    load_config_by_name, merge_config, StepOptions, StepRegistry, TextGuard, TextGuardConfig, TextGuardError,
};

use crate::cli::{Cli, Commands, PresetsCommand};
use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

pub const EXIT_INVALID: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;

/// Failures attributed to configuration rather than to the input.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0:#}")]
    Config(anyhow::Error),
    #[error("--set must be a JSON object of step overrides, got: {0}")]
    OverridesNotAnObject(String),
}

/// Everything a command needs besides its own arguments.
pub struct AppContext {
    pub guard: TextGuard,
    pub theme: ThemeMap,
    pub quiet: bool,
}

impl AppContext {
    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            info_msg(msg, &self.theme);
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            warn_msg(msg, &self.theme);
        }
    }
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Builds the guard from the built-in presets, merged with `config` if given.
pub fn load_guard(config: Option<&str>) -> Result<TextGuard, CliError> {
    let defaults = TextGuardConfig::load_default().map_err(CliError::Config)?;
    let user = match config {
        Some(name_or_path) => {
            debug!("Loading user config '{}'", name_or_path);
            Some(load_config_by_name(name_or_path).map_err(CliError::Config)?)
        }
        None => None,
    };
    let merged = merge_config(defaults, user);
    TextGuard::new(merged, StepRegistry::with_builtin_steps()).map_err(|e| CliError::Config(e.into()))
}

/// Parses the `--set` argument into step overrides.
pub fn parse_overrides(set: Option<&str>) -> Result<Option<StepOptions>, CliError> {
    let Some(raw) = set else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(raw)
        .with_context(|| format!("Failed to parse --set as JSON: {}", raw))
        .map_err(CliError::Config)?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        other => Err(CliError::OverridesNotAnObject(other.to_string())),
    }
}

/// Reads the whole input, dropping one trailing line ending.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let mut input = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
            buffer
        }
    };
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    Ok(input)
}

/// Exit code for a failed command.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    let is_config = err.chain().any(|cause| {
        cause.is::<CliError>()
            || matches!(
                cause.downcast_ref::<TextGuardError>(),
                Some(
                    TextGuardError::UnknownPreset(_)
                        | TextGuardError::InvalidStepOptions { .. }
                        | TextGuardError::InvalidConfig(_)
                )
            )
    });
    if is_config { EXIT_CONFIG } else { EXIT_INVALID }
}

/// Runs the parsed command line.
pub fn run(cli: &Cli, theme: ThemeMap) -> Result<ExitCode> {
    let guard = load_guard(cli.config.as_deref())?;
    let ctx = AppContext { guard, theme, quiet: cli.quiet };

    match &cli.command {
        Commands::Filter(cmd) => filter::run_filter(&ctx, cmd),
        Commands::Validate(cmd) => validate::run_validate(&ctx, cmd),
        Commands::Steps => presets::run_list_steps(&ctx, &mut io::stdout().lock()),
        Commands::Presets(PresetsCommand::List) => presets::run_list_presets(&ctx, &mut io::stdout().lock()),
        Commands::Presets(PresetsCommand::Show { name }) => {
            presets::run_show_preset(&ctx, name, &mut io::stdout().lock())
        }
    }
}
