//! JSON output renderer.
//!
//! Outputs `[{"key": ..., "sql": ..., "params": [...]}, ...]`; `params` is
//! present only for parameterized statements.

use crate::issue::{IssuedKey, Statement};
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, issued: &[IssuedKey]) -> String {
        let items: Vec<serde_json::Value> = issued
            .iter()
            .map(|item| match &item.statement {
                Statement::Literal(sql) => serde_json::json!({
                    "key": item.key.as_str(),
                    "sql": sql,
                }),
                Statement::Parameterized(insert) => serde_json::json!({
                    "key": item.key.as_str(),
                    "sql": insert.sql,
                    "params": insert.params,
                }),
            })
            .collect();

        let mut out =
            serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string());
        out.push('\n');
        out
    }
}
