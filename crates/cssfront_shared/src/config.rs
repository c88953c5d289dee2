use crate::errors::{Error, Result};
use serde::Deserialize;

/// Default bound on the number of nested blocks (`@media { @supports { ... } }`) that are parsed.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Options holds the configuration shared by the tokenizer and the input source map tracker
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Raw source map (JSON) produced by an earlier step, like a preprocessor
    pub source_map: Option<String>,
    /// Base path the sources of the input source map are resolved against
    pub source_map_root: Option<String>,
    /// At-rules, on top of the built-in ones, whose body holds nested rules
    pub nested_at_rules: Vec<String>,
    /// At-rules, on top of the built-in ones, whose body holds declarations only
    pub flat_at_rules: Vec<String>,
    /// Nested blocks deeper than this are skipped
    pub max_nesting_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source_map: None,
            source_map_root: None,
            nested_at_rules: Vec::new(),
            flat_at_rules: Vec::new(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl Options {
    /// Loads options from a JSON document. Missing keys keep their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Options = serde_json::from_str(json)?;
        if options.max_nesting_depth == 0 {
            return Err(Error::Config("maxNestingDepth must be at least 1".into()));
        }

        Ok(options)
    }

    /// Returns the options with the given raw source map attached
    pub fn with_source_map(mut self, source_map: &str) -> Self {
        self.source_map = Some(source_map.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert!(options.source_map.is_none());
        assert_eq!(options.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn from_json() {
        let options = Options::from_json(
            r#"{"sourceMapRoot": "less/", "nestedAtRules": ["custom-media"], "maxNestingDepth": 8}"#,
        )
        .unwrap();

        assert_eq!(options.source_map_root.as_deref(), Some("less/"));
        assert_eq!(options.nested_at_rules, vec!["custom-media".to_string()]);
        assert!(options.flat_at_rules.is_empty());
        assert_eq!(options.max_nesting_depth, 8);
    }

    #[test]
    fn from_json_rejects_zero_depth() {
        let result = Options::from_json(r#"{"maxNestingDepth": 0}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn from_json_rejects_garbage() {
        let result = Options::from_json("{ nope");
        assert!(matches!(result, Err(Error::JsonSerde(_))));
    }
}
