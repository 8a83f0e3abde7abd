//! `textguard validate`: report what a preset would object to.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;

use textguard_core::ValidationReport;

use crate::cli::ValidateCommand;
use crate::commands::{parse_overrides, read_input, AppContext, EXIT_INVALID};
use crate::ui::output_format::paint;
use crate::ui::theme::{ThemeEntry, ThemeMap};

pub fn run_validate(ctx: &AppContext, cmd: &ValidateCommand) -> Result<ExitCode> {
    let overrides = parse_overrides(cmd.selection.set.as_deref())?;
    let input = read_input(cmd.selection.input_file.as_deref())?;
    let report = ctx
        .guard
        .validate(&input, cmd.selection.preset.as_deref(), overrides.as_ref())?;

    let stdout = io::stdout();
    let enable_colors = stdout.is_terminal();
    let mut writer = stdout.lock();
    if cmd.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize validation report")?;
        writeln!(writer, "{}", json)?;
    } else {
        print_report(&mut writer, &report, &ctx.theme, enable_colors)?;
    }

    Ok(if report.valid { ExitCode::SUCCESS } else { ExitCode::from(EXIT_INVALID) })
}

pub fn print_report<W: Write>(writer: &mut W, report: &ValidationReport, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    if report.valid {
        return writeln!(writer, "{}", paint("Valid", ThemeEntry::Success, theme, enable_colors));
    }
    writeln!(writer, "{}", paint("Invalid", ThemeEntry::Error, theme, enable_colors))?;
    for error in &report.errors {
        writeln!(writer, "  - {}", error)?;
    }
    Ok(())
}
