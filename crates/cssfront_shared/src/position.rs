use core::fmt::{Display, Formatter};
use serde::Serialize;

/// Position of a token: a 1-based line, a 0-based column and the label of the source it was
/// found in, if known.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Position {
    /// Create a new Position
    pub fn new(line: usize, column: usize, source: Option<String>) -> Self {
        Self { line, column, source }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}:{}:{}", source, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Position::new(3, 14, None).to_string(), "3:14");
        assert_eq!(
            Position::new(1, 0, Some("one.css".into())).to_string(),
            "one.css:1:0"
        );
    }

    #[test]
    fn serialize_skips_missing_source() {
        let json = serde_json::to_value(Position::new(2, 1, None)).unwrap();
        assert_eq!(json, serde_json::json!({"line": 2, "column": 1}));
    }
}
