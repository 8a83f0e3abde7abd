// textguard/src/main.rs
//! TextGuard entry point.

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use textguard::cli::Cli;
use textguard::commands::{self, error_msg, exit_code_for, EXIT_CONFIG};
use textguard::logger;
use textguard::ui::theme::{build_theme_map, ThemeStyle};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let theme = match build_theme_map(cli.theme.as_deref()) {
        Ok(theme) => theme,
        Err(err) => {
            error_msg(format!("{:#}", err), &ThemeStyle::default_theme_map());
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match commands::run(&cli, theme.clone()) {
        Ok(code) => code,
        Err(err) => {
            error_msg(format!("{:#}", err), &theme);
            ExitCode::from(exit_code_for(&err))
        }
    }
}
