use crate::tokens::Token;
use cssfront_shared::position::Position;
use std::io::Write;

/// The walker is used to walk the token tree and print it to stdout.
pub struct Walker<'a> {
    tokens: &'a [Token],
}

impl<'a> Walker<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens }
    }

    pub fn walk_stdout(&self) {
        let mut stdout = std::io::stdout();
        let _ = self.walk(&mut stdout);
    }

    pub fn walk_to_string(&self) -> String {
        let mut output: Vec<u8> = Vec::new();

        let _ = self.walk(&mut output);

        String::from_utf8_lossy(&output).into_owned()
    }

    fn walk(&self, f: &mut dyn Write) -> Result<(), std::io::Error> {
        writeln!(f, "[Tokens ({})]", self.tokens.len())?;
        for token in self.tokens {
            inner_walk(token, 1, f)?;
        }

        Ok(())
    }
}

fn at(position: Option<&Position>) -> String {
    position.map(|position| format!(" @ {position}")).unwrap_or_default()
}

fn inner_walk(token: &Token, depth: usize, f: &mut dyn Write) -> Result<(), std::io::Error> {
    let prefix = " ".repeat(depth * 2);

    match token {
        Token::Selector { value, body, .. } => {
            writeln!(f, "{}[Selector ({})]", prefix, value.len())?;
            for part in value {
                writeln!(f, "{}  - {:?}{}", prefix, part.text, at(part.position.as_ref()))?;
            }
            for child in body {
                inner_walk(child, depth + 1, f)?;
            }
        }
        Token::Property { value, position } => {
            writeln!(f, "{}[Property] {}{}", prefix, value, at(position.as_ref()))?;
        }
        Token::AtRule { value, position } => {
            writeln!(f, "{}[AtRule] {}{}", prefix, value, at(position.as_ref()))?;
        }
        Token::Block {
            value,
            is_flat_block,
            body,
            position,
            ..
        } => {
            let kind = if *is_flat_block { "flat" } else { "nested" };
            writeln!(f, "{}[Block {}] {}{}", prefix, kind, value, at(position.as_ref()))?;
            for child in body {
                inner_walk(child, depth + 1, f)?;
            }
        }
        Token::Text { value } => {
            writeln!(f, "{}[Text] {}", prefix, value)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::SelectorPart;

    #[test]
    fn walk_to_string() {
        let tokens = vec![
            Token::AtRule {
                value: "@charset 'utf-8';".into(),
                position: Some(Position::new(1, 0, Some("one.css".into()))),
            },
            Token::Block {
                value: "@media screen".into(),
                is_flat_block: false,
                body: vec![Token::Selector {
                    value: vec![SelectorPart::new("a", None), SelectorPart::new("\ndiv", None)],
                    body: vec![Token::Property {
                        value: "color:red".into(),
                        position: Some(Position::new(3, 2, None)),
                    }],
                    metadata: None,
                }],
                position: None,
                metadata: None,
            },
            Token::Text {
                value: "__ESCAPED_COMMENT_SPECIAL_CLEAN_CSS0__".into(),
            },
        ];

        let expected = "\
[Tokens (3)]
  [AtRule] @charset 'utf-8'; @ one.css:1:0
  [Block nested] @media screen
    [Selector (2)]
      - \"a\"
      - \"\\ndiv\"
      [Property] color:red @ 3:2
  [Text] __ESCAPED_COMMENT_SPECIAL_CLEAN_CSS0__
";
        assert_eq!(Walker::new(&tokens).walk_to_string(), expected);
    }
}
