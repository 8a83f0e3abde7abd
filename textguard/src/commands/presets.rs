//! `textguard steps` and `textguard presets`: inspect the registry and the
//! preset table.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use textguard_core::presets::preset_to_yaml;
use textguard_core::{summarize_presets, TextGuardError};

use crate::commands::AppContext;

/// Prints the registered steps in execution order, with the presets that
/// enable each one.
pub fn run_list_steps<W: Write>(ctx: &AppContext, writer: &mut W) -> Result<ExitCode> {
    let summaries = summarize_presets(ctx.guard.config(), ctx.guard.registry());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Step", "Enabled in"]);

    for (index, step) in ctx.guard.list_steps().iter().enumerate() {
        let used_by: Vec<&str> = summaries
            .iter()
            .filter(|summary| summary.steps.contains(step))
            .map(|summary| summary.name.as_str())
            .collect();
        table.add_row(vec![(index + 1).to_string(), step.clone(), used_by.join(", ")]);
    }

    writeln!(writer, "{table}")?;
    Ok(ExitCode::SUCCESS)
}

/// Prints every preset with the steps it enables.
pub fn run_list_presets<W: Write>(ctx: &AppContext, writer: &mut W) -> Result<ExitCode> {
    let summaries = summarize_presets(ctx.guard.config(), ctx.guard.registry());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Preset", "Default", "Steps"]);

    for summary in &summaries {
        table.add_row(vec![
            summary.name.clone(),
            if summary.is_default { "yes".to_string() } else { String::new() },
            summary.steps.join(", "),
        ]);
        if !summary.ignored.is_empty() {
            ctx.warn(format!(
                "Preset '{}' names unknown step(s), ignored: {}",
                summary.name,
                summary.ignored.join(", ")
            ));
        }
    }

    writeln!(writer, "{table}")?;
    Ok(ExitCode::SUCCESS)
}

/// Prints one preset as YAML.
pub fn run_show_preset<W: Write>(ctx: &AppContext, name: &str, writer: &mut W) -> Result<ExitCode> {
    let preset = ctx
        .guard
        .preset_config(name)
        .ok_or_else(|| TextGuardError::UnknownPreset(name.to_string()))?;
    write!(writer, "{}", preset_to_yaml(name, preset)?)?;
    Ok(ExitCode::SUCCESS)
}
