use cssfront_shared::position::Position;
use serde::Serialize;

/// One comma separated part of a selector list
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectorPart {
    /// Text of the part. Only the first part has its leading whitespace removed.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl SelectorPart {
    pub fn new(text: &str, position: Option<Position>) -> Self {
        Self {
            text: text.to_string(),
            position,
        }
    }
}

/// Denormalized views on a selector or flat block, filled in metadata mode
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub selector: String,
    pub selectors_list: Vec<String>,
    /// All declarations joined by a comma
    pub body: String,
    pub bodies_list: Vec<String>,
}

impl Metadata {
    pub fn new(selector: &str, selectors_list: Vec<String>, body: &[Token]) -> Self {
        let bodies_list: Vec<String> = body
            .iter()
            .filter_map(|token| match token {
                Token::Property { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect();

        Self {
            selector: selector.to_string(),
            selectors_list,
            body: bodies_list.join(","),
            bodies_list,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Token {
    /// A rule: a selector list with its declarations
    Selector {
        value: Vec<SelectorPart>,
        body: Vec<Token>,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    /// A single declaration, `name:value`
    Property {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    /// An at-rule without a body, like `@import` or `@charset`, including the trailing `;`
    AtRule {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    /// An at-rule with a body. A flat block holds declarations, other blocks hold rules.
    Block {
        value: String,
        #[serde(rename = "isFlatBlock")]
        is_flat_block: bool,
        body: Vec<Token>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },
    /// Content kept as-is, like a preserved comment between rules
    Text { value: String },
}

impl Token {
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Selector { .. } => "selector",
            Token::Property { .. } => "property",
            Token::AtRule { .. } => "at-rule",
            Token::Block { .. } => "block",
            Token::Text { .. } => "text",
        }
    }

    /// Returns the body of a selector or block, and an empty list for all other tokens
    pub fn body(&self) -> &[Token] {
        match self {
            Token::Selector { body, .. } | Token::Block { body, .. } => body,
            _ => &[],
        }
    }

    /// Returns the position of the token. For a selector this is the position of its first part.
    pub fn position(&self) -> Option<&Position> {
        match self {
            Token::Property { position, .. }
            | Token::AtRule { position, .. }
            | Token::Block { position, .. } => position.as_ref(),
            Token::Selector { value, .. } => value.first().and_then(|part| part.position.as_ref()),
            Token::Text { .. } => None,
        }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Token::Selector { metadata, .. } | Token::Block { metadata, .. } => metadata.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_selector() {
        let token = Token::Selector {
            value: vec![SelectorPart::new("a", Some(Position::new(1, 0, None)))],
            body: vec![Token::Property {
                value: "color:red".into(),
                position: None,
            }],
            metadata: None,
        };

        assert_eq!(
            serde_json::to_value(&token).unwrap(),
            json!({
                "kind": "selector",
                "value": [{"text": "a", "position": {"line": 1, "column": 0}}],
                "body": [{"kind": "property", "value": "color:red"}]
            })
        );
    }

    #[test]
    fn serialize_block() {
        let token = Token::Block {
            value: "@font-face".into(),
            is_flat_block: true,
            body: vec![],
            position: None,
            metadata: Some(Metadata::new("@font-face", vec!["@font-face".into()], &[])),
        };

        assert_eq!(
            serde_json::to_value(&token).unwrap(),
            json!({
                "kind": "block",
                "value": "@font-face",
                "isFlatBlock": true,
                "body": [],
                "metadata": {
                    "selector": "@font-face",
                    "selectorsList": ["@font-face"],
                    "body": "",
                    "bodiesList": []
                }
            })
        );
    }

    #[test]
    fn metadata_joins_declarations() {
        let body = vec![
            Token::Property {
                value: "color:red".into(),
                position: None,
            },
            Token::Property {
                value: "display:block".into(),
                position: None,
            },
        ];

        let metadata = Metadata::new("a,div", vec!["a".into(), "div".into()], &body);
        assert_eq!(metadata.body, "color:red,display:block");
        assert_eq!(metadata.bodies_list, vec!["color:red", "display:block"]);
    }

    #[test]
    fn accessors() {
        let token = Token::AtRule {
            value: "@charset 'utf-8';".into(),
            position: Some(Position::new(1, 0, None)),
        };

        assert_eq!(token.kind(), "at-rule");
        assert!(token.body().is_empty());
        assert_eq!(token.position(), Some(&Position::new(1, 0, None)));
        assert!(token.metadata().is_none());
    }
}
