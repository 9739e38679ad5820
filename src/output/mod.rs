//! Output renderers: framed text, bare SQL, JSON.

pub mod json;
pub mod sql;
pub mod text;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::issue::IssuedKey;

/// Trait for rendering issued keys to an output format.
pub trait OutputRenderer {
    /// Render issued keys to a string.
    fn render(&self, issued: &[IssuedKey]) -> String;
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Key and statement framed by separator lines.
    #[default]
    Text,
    /// Statements only.
    Sql,
    /// Pretty-printed JSON array.
    Json,
}

impl OutputFormat {
    /// Render issued keys using the renderer for this format.
    pub fn render(&self, issued: &[IssuedKey]) -> String {
        match self {
            OutputFormat::Text => text::TextRenderer.render(issued),
            OutputFormat::Sql => sql::SqlRenderer.render(issued),
            OutputFormat::Json => json::JsonRenderer.render(issued),
        }
    }
}
