//! Gate between generated statements and the execution gateway.
//!
//! The default [`StatementPolicy::Permissive`] hands the model's text to the
//! database untouched, exactly as generated. This is a prompt-injection to
//! SQL-injection path and is kept on purpose for use as a vulnerable
//! reference target. [`StatementPolicy::Guarded`] must be opted into.

use crate::core::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StatementPolicy {
    /// Execute generated text as-is.
    #[default]
    Permissive,
    /// Allow only a single statement of the kind the path expects.
    Guarded,
}

/// What the dispatching path expects the statement to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Query,
    Mutation,
}

const FORBIDDEN_KEYWORDS: &[&str] = &[
    "delete", "drop", "alter", "truncate", "create", "grant", "revoke", "copy", "execute", "call",
    "do",
];

const MUTATION_KEYWORDS: &[&str] = &["insert", "update", "merge", "delete"];

impl StatementKind {
    fn leading_keywords(&self) -> &'static [&'static str] {
        match self {
            StatementKind::Query => &["select", "with"],
            StatementKind::Mutation => &["insert", "update"],
        }
    }

    fn matches(&self, statement: &Statement) -> bool {
        match self {
            StatementKind::Query => matches!(statement, Statement::Query { .. }),
            StatementKind::Mutation => {
                matches!(statement, Statement::Insert { .. } | Statement::Update { .. })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementGuard {
    policy: StatementPolicy,
}

impl StatementGuard {
    pub fn new(policy: StatementPolicy) -> Self {
        Self { policy }
    }

    /// Return the statement to execute, or `StatementRejected`.
    pub fn check(&self, kind: StatementKind, generated: &str) -> Result<String> {
        match self.policy {
            StatementPolicy::Permissive => Ok(generated.to_string()),
            StatementPolicy::Guarded => guarded(kind, generated),
        }
    }
}

fn rejected(reason: impl Into<String>) -> ChatError {
    ChatError::StatementRejected(reason.into())
}

fn guarded(kind: StatementKind, generated: &str) -> Result<String> {
    let statement = strip_code_fence(generated);
    let statement = statement
        .strip_suffix(';')
        .unwrap_or(statement)
        .trim_end();

    if statement.is_empty() {
        return Err(rejected("empty statement"));
    }

    // Lex with Postgres rules so dollar-quoted, escape and quoted-identifier
    // text is never mistaken for code, or code for text.
    let dialect = PostgreSqlDialect {};
    let tokens = Tokenizer::new(&dialect, statement)
        .tokenize()
        .map_err(|e| rejected(format!("unreadable statement: {}", e)))?;

    let mut keywords = Vec::new();
    for token in &tokens {
        match token {
            Token::SemiColon => return Err(rejected("multiple statements")),
            Token::Whitespace(Whitespace::SingleLineComment { .. })
            | Token::Whitespace(Whitespace::MultiLineComment(_)) => {
                return Err(rejected("comment in statement"));
            }
            Token::Word(word) if word.quote_style.is_none() => {
                keywords.push(word.value.to_ascii_lowercase());
            }
            _ => {}
        }
    }

    let leading = tokens
        .iter()
        .find(|t| !matches!(t, Token::Whitespace(_) | Token::LParen))
        .and_then(|t| match t {
            Token::Word(word) if word.quote_style.is_none() => {
                Some(word.value.to_ascii_lowercase())
            }
            _ => None,
        })
        .unwrap_or_default();
    if !kind.leading_keywords().iter().any(|k| *k == leading) {
        return Err(rejected(format!(
            "unexpected {:?} statement starting with {:?}",
            kind, leading
        )));
    }

    if let Some(found) = keywords
        .iter()
        .find(|k| FORBIDDEN_KEYWORDS.contains(&k.as_str()))
    {
        return Err(rejected(format!("forbidden keyword {:?}", found)));
    }

    // A query must not hide a data-modifying CTE.
    if kind == StatementKind::Query {
        if let Some(found) = keywords
            .iter()
            .find(|k| MUTATION_KEYWORDS.contains(&k.as_str()))
        {
            return Err(rejected(format!(
                "data-modifying keyword {:?} in query",
                found
            )));
        }
    }

    let parsed = Parser::parse_sql(&dialect, statement)
        .map_err(|e| rejected(format!("unparsable statement: {}", e)))?;
    match parsed.as_slice() {
        [single] if kind.matches(single) => Ok(statement.to_string()),
        [_] => Err(rejected(format!("statement is not a {:?}", kind))),
        _ => Err(rejected(format!("expected one statement, found {}", parsed.len()))),
    }
}

/// Extract the body of a markdown code block if there is one, otherwise
/// return the trimmed text.
fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();

    let Some(start_idx) = content.find("```") else {
        return content;
    };
    let after_start = &content[start_idx + 3..];
    let code_block = match after_start.find("```") {
        Some(end) => &after_start[..end],
        None => after_start,
    };

    // Drop the language tag on the opening fence line.
    match code_block.find('\n') {
        Some(first_newline) => code_block[first_newline + 1..].trim(),
        None => code_block.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> StatementGuard {
        StatementGuard::new(StatementPolicy::Guarded)
    }

    #[test]
    fn permissive_passes_text_through_unchanged() {
        let text = "```sql\nDROP TABLE product; --\n```";
        let out = StatementGuard::default()
            .check(StatementKind::Query, text)
            .unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn guarded_accepts_catalog_search() {
        let sql = "SELECT name, description, photo_url FROM product WHERE category ILIKE '%quartz%' OR description ILIKE '%quartz%';";
        let out = guard().check(StatementKind::Query, sql).unwrap();
        assert!(out.ends_with("'%quartz%'"));
    }

    #[test]
    fn guarded_strips_markdown_fence() {
        let text = "```sql\nSELECT name FROM product\n```";
        assert_eq!(
            guard().check(StatementKind::Query, text).unwrap(),
            "SELECT name FROM product"
        );
    }

    #[test]
    fn guarded_ignores_keywords_inside_literals() {
        let sql = "INSERT INTO testimonial (name, title, message, created_at, updated_at) VALUES ('Ann', 'Wow', 'I will never drop this stone; it''s great', now(), now())";
        assert!(guard().check(StatementKind::Mutation, sql).is_ok());
    }

    #[test]
    fn guarded_rejects_stacked_statements() {
        let sql = "SELECT name FROM product; DELETE FROM product";
        assert!(matches!(
            guard().check(StatementKind::Query, sql),
            Err(ChatError::StatementRejected(_))
        ));
    }

    #[test]
    fn guarded_rejects_wrong_kind_for_path() {
        assert!(guard()
            .check(StatementKind::Query, "UPDATE \"user\" SET is_admin = true")
            .is_err());
        assert!(guard()
            .check(StatementKind::Mutation, "SELECT * FROM \"user\"")
            .is_err());
    }

    #[test]
    fn guarded_rejects_comments_and_ddl() {
        assert!(guard()
            .check(StatementKind::Query, "SELECT name FROM product -- trailing")
            .is_err());
        assert!(guard()
            .check(StatementKind::Mutation, "UPDATE product SET name = 'x' WHERE id IN (SELECT 1) OR drop")
            .is_err());
    }

    #[test]
    fn guarded_rejects_data_modifying_cte() {
        let sql = "WITH gone AS (UPDATE product SET views_count = 0 RETURNING id) SELECT name FROM product";
        assert!(guard().check(StatementKind::Query, sql).is_err());
    }

    #[test]
    fn guarded_rejects_empty_text() {
        assert!(guard().check(StatementKind::Mutation, "  ;  ").is_err());
        assert!(guard().check(StatementKind::Mutation, "```\n```").is_err());
    }

    #[test]
    fn guarded_rejects_statements_hidden_by_dollar_quoting() {
        let sql = "SELECT name FROM product WHERE category = $$'$$; DROP TABLE product; --'";
        assert!(matches!(
            guard().check(StatementKind::Query, sql),
            Err(ChatError::StatementRejected(_))
        ));
    }

    #[test]
    fn guarded_rejects_statements_hidden_by_escape_strings() {
        let sql = r"UPDATE testimonial SET title = E'\'' ; DELETE FROM testimonial; --' WHERE id = 1";
        assert!(matches!(
            guard().check(StatementKind::Mutation, sql),
            Err(ChatError::StatementRejected(_))
        ));
    }

    #[test]
    fn guarded_rejects_statements_hidden_by_quoted_identifiers() {
        let sql = r#"SELECT "a'b" FROM product; DELETE FROM product; --'"#;
        assert!(guard().check(StatementKind::Query, sql).is_err());
    }

    #[test]
    fn guarded_accepts_literals_in_every_quoting_style() {
        let sql = r"SELECT name FROM product WHERE description ILIKE $$%rose; quartz%$$ OR name = E'it\'s -- fine'";
        assert!(guard().check(StatementKind::Query, sql).is_ok());
    }
}
