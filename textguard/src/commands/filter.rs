//! `textguard filter`: run input through a preset and write the result.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};

use textguard_core::{Pipeline, StepOptions, StepTrace};

use crate::cli::FilterCommand;
use crate::commands::{parse_overrides, read_input, AppContext};
use crate::ui::diff_viewer;
use crate::ui::output_format::paint;
use crate::ui::theme::{ThemeEntry, ThemeMap};

pub fn run_filter(ctx: &AppContext, cmd: &FilterCommand) -> Result<ExitCode> {
    info!("Starting filter operation.");
    let preset = cmd.selection.preset.as_deref();
    let overrides: Option<StepOptions> = parse_overrides(cmd.selection.set.as_deref())?;
    let pipeline = ctx.guard.pipeline_for(preset, overrides.as_ref())?;
    debug!(
        "Filtering with preset '{}': {}",
        preset.unwrap_or_else(|| ctx.guard.default_preset()),
        pipeline.step_names().join(" -> ")
    );

    let (mut writer, to_terminal): (Box<dyn Write>, bool) = match &cmd.output {
        Some(path) => {
            ctx.info(format!("Writing filtered text to file: {}", path.display()));
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(io::BufWriter::new(file)), false)
        }
        None => {
            let stdout = io::stdout();
            let to_terminal = stdout.is_terminal();
            (Box::new(stdout.lock()), to_terminal)
        }
    };

    if cmd.line_buffered {
        filter_lines(ctx, &pipeline, cmd, &mut writer)?;
    } else {
        let input = read_input(cmd.selection.input_file.as_deref())?;
        let output = if cmd.explain {
            let trace = pipeline.trace(input.clone());
            print_trace(&mut io::stderr(), &trace, &ctx.theme, io::stderr().is_terminal())?;
            trace.last().map_or_else(|| input.clone(), |last| last.output.clone())
        } else {
            ctx.guard.filter(&input, preset, overrides.as_ref())?
        };

        if cmd.diff {
            diff_viewer::print_diff(&input, &output, &mut writer, &ctx.theme, to_terminal)?;
        } else {
            writeln!(writer, "{}", output)?;
        }
    }

    writer.flush().context("Failed to flush output")?;
    info!("Filter operation completed.");
    Ok(ExitCode::SUCCESS)
}

/// Filters the input one line at a time, flushing after each line.
fn filter_lines(ctx: &AppContext, pipeline: &Pipeline, cmd: &FilterCommand, writer: &mut dyn Write) -> Result<()> {
    let reader: Box<dyn BufRead> = match &cmd.selection.input_file {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut count = 0usize;
    for line in reader.lines() {
        let line = line.context("Failed to read input line")?;
        writeln!(writer, "{}", pipeline.run(line))?;
        writer.flush()?;
        count += 1;
    }
    debug!("Filtered {} line(s).", count);
    if count == 0 {
        ctx.warn("No input lines received.");
    }
    Ok(())
}

/// Writes one line per step showing the text after that step.
pub fn print_trace<W: Write>(writer: &mut W, trace: &[StepTrace], theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    writeln!(writer, "{}", paint("--- Pipeline Trace ---", ThemeEntry::Header, theme, enable_colors))?;
    if trace.is_empty() {
        writeln!(writer, "(no steps enabled)")?;
    }
    for (index, entry) in trace.iter().enumerate() {
        let name = paint(&entry.step, ThemeEntry::StepName, theme, enable_colors);
        writeln!(writer, "{:>2}. {}: {:?}", index + 1, name, entry.output)?;
    }
    Ok(())
}
