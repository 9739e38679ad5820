//! Bare SQL renderer, for piping straight into `psql`.

use crate::issue::IssuedKey;
use crate::output::OutputRenderer;

/// Statements only, separated by a blank line.
pub struct SqlRenderer;

impl OutputRenderer for SqlRenderer {
    fn render(&self, issued: &[IssuedKey]) -> String {
        issued
            .iter()
            .map(|item| format!("{}\n", item.statement.sql()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
