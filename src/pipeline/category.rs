use std::fmt;

/// The handling path chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Data-changing request: testimonials, account updates.
    Action,
    /// Catalog search.
    Retrieve,
    /// In-domain informational or conversational question.
    General,
    /// Everything else, including any label the classifier should not emit.
    Irrelevant,
}

impl Category {
    /// Parse classifier output. Surrounding whitespace is trimmed, then the
    /// text must equal a label exactly; anything else is `Irrelevant`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "action" => Category::Action,
            "retrieve" => Category::Retrieve,
            "general" => Category::General,
            _ => Category::Irrelevant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Action => "action",
            Category::Retrieve => "retrieve",
            Category::General => "general",
            Category::Irrelevant => "irrelevant",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
