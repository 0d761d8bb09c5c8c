//! Parsing of client order-by expressions such as `"name desc, employeeNo"`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sort order
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn inverted(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }

    /// Accepts `asc` or `desc` in any letter case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Ascending)
        } else if word.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Descending)
        } else {
            None
        }
    }
}

/// One `field [asc|desc]` term, in the order the client wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub field: String,
    pub order: SortOrder,
}

impl SortClause {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Descending)
    }
}

/// Client-facing ordering failures. Both variants echo the client's text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("malformed sort clause '{token}'")]
    MalformedToken { token: String },

    #[error("unknown sort field '{field}'")]
    UnknownField { field: String },
}

/// Splits an order-by expression into clauses.
///
/// Blank input yields no clauses. Each comma-separated token must be a field
/// name optionally followed by a single direction keyword; anything else,
/// including an empty token between commas, is rejected as malformed.
pub fn parse_order_by(input: &str) -> Result<Vec<SortClause>, SortError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input.split(',').map(parse_token).collect()
}

fn parse_token(raw: &str) -> Result<SortClause, SortError> {
    let token = raw.trim();
    let malformed = || SortError::MalformedToken {
        token: token.to_string(),
    };

    let mut words = token.split_whitespace();
    let field = words.next().ok_or_else(malformed)?;
    let order = match words.next() {
        None => SortOrder::Ascending,
        Some(word) => SortOrder::from_keyword(word).ok_or_else(malformed)?,
    };
    if words.next().is_some() {
        return Err(malformed());
    }

    Ok(SortClause::new(field, order))
}
