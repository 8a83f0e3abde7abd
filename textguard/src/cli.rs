// textguard/src/cli.rs
//! Command-line interface definition for the `textguard` binary.
//! License: MIT OR APACHE 2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "textguard",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clean untrusted, human-entered text with named presets",
    long_about = "Textguard runs text through an ordered pipeline of small cleaning steps (HTML stripping, Unicode folding, invisible character removal, length limits and more). Which steps run is chosen by a named preset, loaded from the built-in set or from a YAML config file.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Path or name of a preset config merged over the built-in presets.
    #[arg(
        long = "config",
        short = 'c',
        value_name = "FILE",
        env = "TEXTGUARD_CONFIG",
        global = true,
        help = "Preset config file (YAML) merged over the built-in presets."
    )]
    pub config: Option<String>,

    /// Specify the path to a custom YAML theme file.
    #[arg(long = "theme", value_name = "FILE", global = true, help = "Specify the path to a custom YAML theme file.")]
    pub theme: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `textguard` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filters an input file or stdin through a preset.
    #[command(about = "Filters an input file or stdin through a preset.")]
    Filter(FilterCommand),

    /// Checks an input against a preset without changing it.
    #[command(about = "Checks an input against a preset without changing it.")]
    Validate(ValidateCommand),

    /// Lists the registered steps in execution order.
    #[command(about = "Lists the registered steps in execution order.")]
    Steps,

    /// Inspects the available presets.
    #[command(subcommand, about = "Inspects the available presets.")]
    Presets(PresetsCommand),
}

/// Preset selection shared by `filter` and `validate`.
#[derive(Args, Debug, Clone, Default)]
pub struct PresetArgs {
    /// Preset to apply (the config's default preset if omitted).
    #[arg(long = "preset", short = 'p', value_name = "NAME", help = "Preset to apply (defaults to the config's default preset).")]
    pub preset: Option<String>,

    /// Per-run step overrides as a JSON object.
    #[arg(
        long = "set",
        value_name = "JSON",
        help = "Step overrides as a JSON object, deep-merged onto the preset (e.g. '{\"truncate_length\": 20}')."
    )]
    pub set: Option<String>,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long = "input-file", short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,
}

/// Arguments for the `filter` command.
#[derive(Args, Debug)]
pub struct FilterCommand {
    #[command(flatten)]
    pub selection: PresetArgs,

    /// Write filtered output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Filter each input line on its own.
    #[arg(long = "line-buffered", conflicts_with = "diff", help = "Filter input line by line (useful for streaming data from pipes).")]
    pub line_buffered: bool,

    /// Show a unified diff to highlight the changes made.
    #[arg(long, short = 'D', help = "Show a unified diff to highlight the changes made.")]
    pub diff: bool,

    /// Print the text after every step to stderr.
    #[arg(long, conflicts_with = "line_buffered", help = "Print the text after every step to stderr.")]
    pub explain: bool,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub selection: PresetArgs,

    /// Print the report as JSON.
    #[arg(long, help = "Print the validation report as JSON.")]
    pub json: bool,
}

/// Subcommands for the `presets` command.
#[derive(Subcommand, Debug)]
pub enum PresetsCommand {
    #[command(about = "Lists all available presets and the steps they enable.")]
    List,
    #[command(about = "Prints one preset as YAML.")]
    Show {
        /// The preset to print.
        #[arg(value_name = "NAME", help = "The preset to print.")]
        name: String,
    },
}
