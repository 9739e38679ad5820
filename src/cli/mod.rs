//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use keymint::key::{KeyError, KeyShape, LicenseKey};

/// One-line description shown by `--help`.
pub const ABOUT: &str =
    "Generate a random license key and print the SQL INSERT that registers it in `licenses`.";

/// The `keymint check` report line for `input`.
pub fn check_report(input: &str, shape: KeyShape, result: &Result<LicenseKey, KeyError>) -> String {
    use colored::Colorize;

    match result {
        Ok(key) => format!(
            "  {} {}  {}",
            "✔".green().bold(),
            key.as_str().bold(),
            format!("valid {shape} key").dimmed(),
        ),
        Err(e) => format!(
            "  {} {}  {}",
            "✖".red().bold(),
            input.bold(),
            e.to_string().red(),
        ),
    }
}

/// Print the outcome of `keymint check` to stdout.
pub fn print_check(input: &str, shape: KeyShape, result: &Result<LicenseKey, KeyError>) {
    println!("{}", check_report(input, shape, result));
}
