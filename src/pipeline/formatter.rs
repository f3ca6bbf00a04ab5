//! User-visible response text for each path.

use crate::core::executor::Record;
use serde_json::Value;

pub const MUTATION_SUCCESS: &str = "Your request has been processed successfully.";
pub const MUTATION_FAILURE: &str = "An error occurred while processing your request.";
pub const NO_RESULTS: &str = "<p>No matching products found.</p>";
pub const RETRIEVAL_FAILURE: &str = "<p>An error occurred while retrieving products.</p>";
pub const REFUSAL: &str = "I'm sorry, but I can only assist with queries or information related to crystals, testimonials or user account management.";
pub const APOLOGY: &str = "I apologize, but I couldn't process your request due to an error.";

#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    escape_html: bool,
}

impl Formatter {
    pub fn new(escape_html: bool) -> Self {
        Self { escape_html }
    }

    /// Render catalog rows, in order, as one HTML fragment.
    pub fn products(&self, rows: &[Record]) -> String {
        if rows.is_empty() {
            return NO_RESULTS.to_string();
        }

        let body: String = rows.iter().map(|row| self.product(row)).collect();
        format!("<div>{}</div>", body)
    }

    fn product(&self, row: &Record) -> String {
        let name = self.field(row, "name");
        let description = self.field(row, "description");
        let photo_url = self.field(row, "photo_url");
        format!(
            r#"<div style="margin-bottom: 15px;"><h3 style="margin: 0;">{name}</h3><p style="margin: 5px 0;">{description}</p><img src="{photo_url}" alt="{name}" style="max-width: 200px; max-height: 200px;"/></div>"#
        )
    }

    /// Missing and null fields render empty; other scalars use their JSON text.
    fn field(&self, row: &Record, key: &str) -> String {
        let text = match row.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        if self.escape_html {
            escape_html(&text)
        } else {
            text
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
