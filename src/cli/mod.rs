//! Command-line interface for brand-synth.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli, Commands, ServeArgs};
