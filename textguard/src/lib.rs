// textguard/src/lib.rs
//! # TextGuard CLI
//!
//! Command-line front end for `textguard-core`: filter or validate text
//! from stdin or files with the built-in presets or a user config, and
//! inspect the step registry and preset table.
//!
//! License: MIT OR APACHE 2.0

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
