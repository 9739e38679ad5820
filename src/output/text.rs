//! Framed plain-text renderer (the default).
//!
//! ```text
//! --- Generated License Key ---
//! Key: XXXX-XXXX-XXXX-XXXX
//! -------------------------------
//! SQL command:
//! INSERT INTO licenses ...;
//! -------------------------------
//! ```

use crate::issue::{IssuedKey, Statement};
use crate::output::OutputRenderer;

const HEADER: &str = "--- Generated License Key ---";
const RULE: &str = "-------------------------------";

/// Framed text renderer.
pub struct TextRenderer;

impl OutputRenderer for TextRenderer {
    fn render(&self, issued: &[IssuedKey]) -> String {
        let mut out = String::new();

        for (i, item) in issued.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(HEADER);
            out.push('\n');
            out.push_str(&format!("Key: {}\n", item.key));
            out.push_str(RULE);
            out.push('\n');
            out.push_str("SQL command:\n");
            out.push_str(item.statement.sql());
            out.push('\n');

            if let Statement::Parameterized(insert) = &item.statement {
                out.push_str("Parameters:\n");
                for (n, value) in insert.params.iter().enumerate() {
                    let shown = serde_json::to_string(value).unwrap_or_default();
                    out.push_str(&format!("  ${} = {shown}\n", n + 1));
                }
            }

            out.push_str(RULE);
            out.push('\n');
        }

        out
    }
}
