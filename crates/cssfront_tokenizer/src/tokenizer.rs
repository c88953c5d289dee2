use crate::at_rule::{AtRuleKind, AtRuleTable};
use crate::extract::{first_line_extent, normalize_declaration, split_selectors, strip_source_markers};
use crate::location::LocationTracker;
use crate::tokens::{Metadata, SelectorPart, Token};
use crate::Collaborators;
use cssfront_shared::config::Options;
use cssfront_shared::errors::{Error, Result};
use cssfront_shared::placeholder::{Placeholder, PlaceholderKind};
use cssfront_shared::position::Position;
use cssfront_shared::warnings::Warnings;
use cssfront_sourcemap::{InputSourceMapTracker, SourceTracker};

/// Turns escaped CSS into a tree of tokens.
///
/// The input is expected to have gone through the escaping pass: comments, quoted strings and
/// urls are replaced by placeholders, so the only structural characters left are `{`, `}`, `;`,
/// `,`, parentheses and brackets. Malformed input never fails: the tokenizer recovers by dropping
/// the broken part and adds a warning.
pub struct Tokenizer {
    source_tracker: SourceTracker,
    input_source_map_tracker: InputSourceMapTracker,
    options: Options,
    at_rules: AtRuleTable,
    warnings: Warnings,
    collect_metadata: bool,
    track_positions: bool,
}

impl Tokenizer {
    /// Creates a tokenizer. Fails when a collaborator needed for the requested mode is missing or
    /// not ready.
    pub fn new(collaborators: Collaborators, collect_metadata: bool, track_positions: bool) -> Result<Self> {
        let Collaborators {
            source_tracker,
            input_source_map_tracker,
            options,
            warnings,
        } = collaborators;

        let source_tracker = source_tracker.ok_or(Error::MissingCollaborator("source tracker"))?;

        let input_source_map_tracker = match input_source_map_tracker {
            Some(tracker) => tracker,
            None if track_positions => {
                return Err(Error::MissingCollaborator("input source map tracker"));
            }
            None => InputSourceMapTracker::inert(warnings.clone()),
        };

        if track_positions {
            if options.source_map.is_some() && !input_source_map_tracker.is_configured() {
                return Err(Error::Config(
                    "a source map is set in the options, but the input source map tracker has none".into(),
                ));
            }
            if input_source_map_tracker.is_pending() {
                return Err(Error::Config(
                    "the input source map has not been tracked yet".into(),
                ));
            }
        }

        Ok(Self {
            at_rules: AtRuleTable::from_options(&options),
            source_tracker,
            input_source_map_tracker,
            options,
            warnings,
            collect_metadata,
            track_positions,
        })
    }

    /// Tokenizes the given input
    pub fn to_tokens(&self, data: &str) -> Vec<Token> {
        let data = data.replace("\r\n", "\n");

        let mut scanner = Scanner::new(self, &data);
        let (tokens, _) = scanner.consume_rules(0);

        log::debug!("tokenized {} bytes into {} top-level tokens", data.len(), tokens.len());

        tokens
    }

    /// Warnings collected so far, shared with the input source map tracker
    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    pub fn source_tracker(&self) -> &SourceTracker {
        &self.source_tracker
    }

    pub fn input_source_map_tracker(&self) -> &InputSourceMapTracker {
        &self.input_source_map_tracker
    }
}

/// A single run of the tokenizer over one input
struct Scanner<'t> {
    tokenizer: &'t Tokenizer,
    data: &'t str,
    cursor: usize,
    location: Option<LocationTracker<'t>>,
}

impl<'t> Scanner<'t> {
    fn new(tokenizer: &'t Tokenizer, data: &'t str) -> Self {
        let location = tokenizer
            .track_positions
            .then(|| LocationTracker::new(data, &tokenizer.source_tracker));

        Self {
            tokenizer,
            data,
            cursor: 0,
            location,
        }
    }

    fn byte(&self) -> u8 {
        self.data.as_bytes()[self.cursor]
    }

    fn eof(&self) -> bool {
        self.cursor >= self.data.len()
    }

    fn warn(&self, message: String) {
        self.tokenizer.warnings.push(message);
    }

    /// Consumes rules, at-rules and blocks until the `}` closing the current block, or the end
    /// of the input. Returns the tokens and whether the closing `}` was found.
    fn consume_rules(&mut self, depth: usize) -> (Vec<Token>, bool) {
        let mut tokens = Vec::new();
        let mut head: Option<usize> = None;
        let mut nesting = 0usize;

        while !self.eof() {
            let byte = self.byte();

            if byte == b'_' {
                if let Some(placeholder) = Placeholder::find_at(self.data, self.cursor) {
                    let start = self.cursor;
                    self.cursor += placeholder.len;

                    if placeholder.kind.is_source_marker() || head.is_some() {
                        continue;
                    }

                    match placeholder.kind {
                        PlaceholderKind::Comment => {}
                        PlaceholderKind::CommentSpecial => tokens.push(Token::Text {
                            value: self.data[start..self.cursor].to_string(),
                        }),
                        _ => head = Some(start),
                    }
                    continue;
                }
            }

            match byte {
                b'\\' => {
                    head.get_or_insert(self.cursor);
                    self.cursor += 1;
                }
                b'{' if nesting == 0 => {
                    let start = head.take().unwrap_or(self.cursor);
                    let end = self.cursor;
                    self.cursor += 1;
                    self.consume_block(start, end, depth, &mut tokens);
                    continue;
                }
                b';' if nesting == 0 => match head {
                    Some(start) if self.data[start..].starts_with('@') => {
                        head = None;
                        self.cursor += 1;
                        let value = strip_source_markers(&self.data[start..self.cursor]).into_owned();
                        let position = self.position_at(start, first_line_extent(&value));
                        tokens.push(Token::AtRule { value, position });
                        continue;
                    }
                    // A stray semicolon between rules is dropped, one in a selector is kept
                    _ => {}
                },
                b'}' if nesting == 0 => {
                    if let Some(start) = head.take() {
                        let text = strip_source_markers(&self.data[start..self.cursor]);
                        self.warn(format!("Unexpected content: '{}'. Ignoring.", text.trim()));
                    }
                    self.cursor += 1;

                    if depth > 0 {
                        return (tokens, true);
                    }
                    self.warn("Unexpected '}'. Ignoring.".into());
                    continue;
                }
                b'(' | b'[' => {
                    head.get_or_insert(self.cursor);
                    nesting += 1;
                }
                b')' | b']' => {
                    head.get_or_insert(self.cursor);
                    nesting = nesting.saturating_sub(1);
                }
                _ if byte.is_ascii_whitespace() => {}
                _ => {
                    head.get_or_insert(self.cursor);
                }
            }

            self.cursor += 1;
        }

        if let Some(start) = head {
            let text = strip_source_markers(&self.data[start..]);
            let text = text.trim_end();

            if text.starts_with('@') {
                self.warn(format!("Broken declaration: '{text}'."));
            } else if depth == 0 && !text.is_empty() {
                tokens.push(Token::Text {
                    value: text.to_string(),
                });
            } else if !text.is_empty() {
                self.warn(format!("Missing '{{' after '{text}'. Ignoring."));
            }
        }

        (tokens, false)
    }

    /// Consumes the body of the block whose head spans `start..end`. The cursor is just past
    /// the opening `{`.
    fn consume_block(&mut self, start: usize, end: usize, depth: usize, tokens: &mut Vec<Token>) {
        let raw = strip_source_markers(&self.data[start..end]);

        if raw.trim().is_empty() {
            self.warn("Missing selector or at-rule before '{'. Ignoring block.".into());
            self.skip_block();
            return;
        }

        if raw.starts_with('@') {
            let value = raw.trim_end().to_string();
            let position = self.position_at(start, first_line_extent(&value));

            match self.tokenizer.at_rules.classify(&value) {
                AtRuleKind::Flat => {
                    let body = self.consume_declarations(&value);
                    let metadata = self
                        .tokenizer
                        .collect_metadata
                        .then(|| Metadata::new(&value, vec![value.clone()], &body));

                    tokens.push(Token::Block {
                        value,
                        is_flat_block: true,
                        body,
                        position,
                        metadata,
                    });
                }
                AtRuleKind::Nested => {
                    let max_depth = self.tokenizer.options.max_nesting_depth;
                    if depth + 1 > max_depth {
                        self.warn(format!(
                            "Block '{value}' is nested deeper than {max_depth} levels. Ignoring."
                        ));
                        self.skip_block();
                        return;
                    }

                    let (body, closed) = self.consume_rules(depth + 1);
                    if !closed {
                        self.warn(format!("Missing '}}' at the end of '{value}'."));
                    }

                    tokens.push(Token::Block {
                        value,
                        is_flat_block: false,
                        body,
                        position,
                        metadata: None,
                    });
                }
            }
            return;
        }

        let selector = raw.into_owned();
        let data = self.data;
        let parts: Vec<SelectorPart> = split_selectors(&data[start..end])
            .into_iter()
            .map(|part| {
                let text = strip_source_markers(part.text);
                let position = self.position_at(start + part.offset, first_line_extent(text.trim_start()));
                SelectorPart::new(&text, position)
            })
            .collect();

        let body = self.consume_declarations(&selector);
        let metadata = self.tokenizer.collect_metadata.then(|| {
            let selectors_list = parts.iter().map(|part| part.text.clone()).collect();
            Metadata::new(&selector, selectors_list, &body)
        });

        tokens.push(Token::Selector {
            value: parts,
            body,
            metadata,
        });
    }

    /// Consumes `;` separated declarations up to and including the closing `}`
    fn consume_declarations(&mut self, owner: &str) -> Vec<Token> {
        let mut body = Vec::new();
        let mut start: Option<usize> = None;
        let mut nesting = 0usize;

        while !self.eof() {
            let byte = self.byte();

            if byte == b'_' {
                if let Some(placeholder) = Placeholder::find_at(self.data, self.cursor) {
                    let placeholder_start = self.cursor;
                    self.cursor += placeholder.len;

                    if placeholder.kind.is_source_marker() {
                        continue;
                    }

                    if placeholder.kind.is_comment() && nesting == 0 {
                        // A comment inside a declaration stays part of it
                        if start.is_some() && !self.declaration_ends_at(self.cursor) {
                            continue;
                        }
                        if let Some(start) = start.take() {
                            self.push_declaration(&mut body, start, placeholder_start);
                        }
                        if placeholder.kind == PlaceholderKind::CommentSpecial {
                            let value = self.data[placeholder_start..self.cursor].to_string();
                            let position = self.position_at(placeholder_start, first_line_extent(&value));
                            body.push(Token::Property { value, position });
                        }
                        continue;
                    }

                    start.get_or_insert(placeholder_start);
                    continue;
                }
            }

            match byte {
                b'\\' => {
                    start.get_or_insert(self.cursor);
                    self.cursor += 1;
                }
                b';' if nesting == 0 => {
                    if let Some(start) = start.take() {
                        self.push_declaration(&mut body, start, self.cursor);
                    }
                }
                b'{' if nesting == 0 => {
                    if let Some(start) = start.take() {
                        let text = strip_source_markers(&self.data[start..self.cursor]);
                        self.warn(format!(
                            "Unexpected '{{' after '{}' in '{}'. Ignoring.",
                            text.trim(),
                            owner.trim()
                        ));
                    }
                    self.cursor += 1;
                    if !self.skip_block() {
                        break;
                    }
                    continue;
                }
                b'}' if nesting == 0 => {
                    if let Some(start) = start.take() {
                        self.push_declaration(&mut body, start, self.cursor);
                    }
                    self.cursor += 1;
                    return body;
                }
                b'(' | b'[' => {
                    start.get_or_insert(self.cursor);
                    nesting += 1;
                }
                b')' | b']' => {
                    start.get_or_insert(self.cursor);
                    nesting = nesting.saturating_sub(1);
                }
                _ if byte.is_ascii_whitespace() => {}
                _ => {
                    start.get_or_insert(self.cursor);
                }
            }

            self.cursor += 1;
        }

        self.warn(format!("Missing '}}' at the end of '{}'.", owner.trim()));
        body
    }

    /// Returns true when only whitespace and comments are left between `offset` and the `;` or
    /// `}` that ends the current declaration
    fn declaration_ends_at(&self, mut offset: usize) -> bool {
        let bytes = self.data.as_bytes();

        while offset < bytes.len() {
            match bytes[offset] {
                b';' | b'}' => return true,
                b'_' => match Placeholder::find_at(self.data, offset) {
                    Some(placeholder) if placeholder.kind.is_comment() || placeholder.kind.is_source_marker() => {
                        offset += placeholder.len;
                    }
                    _ => return false,
                },
                byte if byte.is_ascii_whitespace() => offset += 1,
                _ => return false,
            }
        }

        true
    }

    fn push_declaration(&mut self, body: &mut Vec<Token>, start: usize, end: usize) {
        let raw = strip_source_markers(&self.data[start..end]).into_owned();
        let Some(value) = normalize_declaration(&raw) else {
            return;
        };

        let position = self.position_at(start, first_line_extent(&raw));
        body.push(Token::Property { value, position });
    }

    /// Skips a `{ ... }` group. The cursor is just past the opening `{`. Returns false when the
    /// input ends before the group is closed.
    fn skip_block(&mut self) -> bool {
        let bytes = self.data.as_bytes();
        let mut depth = 1usize;

        while self.cursor < bytes.len() {
            match bytes[self.cursor] {
                b'\\' => self.cursor += 1,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.cursor += 1;
                        return true;
                    }
                }
                _ => {}
            }
            self.cursor += 1;
        }

        false
    }

    /// Position of the token starting at `offset`, when positions are tracked
    fn position_at(&mut self, offset: usize, extent: usize) -> Option<Position> {
        let location = self.location.as_mut()?;
        location.advance_to(offset);

        let (line, column) = (location.line(), location.column());
        let source = location.source();

        let tracker = &self.tokenizer.input_source_map_tracker;
        let mut position = if tracker.is_tracking() {
            tracker.resolve_within(line, column, extent)
        } else {
            Position::new(line, column, None)
        };

        if position.source.is_none() {
            position.source = source.map(str::to_string);
        }

        Some(position)
    }
}
