//! Helpers turning raw slices of the input into token values
use cssfront_shared::placeholder::{Placeholder, PREFIX};
use std::borrow::Cow;

/// A part of a selector list, as found by [`split_selectors`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitPart<'a> {
    pub text: &'a str,
    /// Offset, relative to the selector list, of the first non-whitespace character of the part
    pub offset: usize,
}

/// Splits a selector list on the commas that are not inside parentheses or brackets.
///
/// The list is expected to start at its first non-whitespace character. Whitespace inside the
/// parts is kept, so later parts keep their leading whitespace. Empty parts are dropped.
pub fn split_selectors(selectors: &str) -> Vec<SplitPart<'_>> {
    let bytes = selectors.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut nesting = 0usize;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 1,
            b'(' | b'[' => nesting += 1,
            b')' | b']' => nesting = nesting.saturating_sub(1),
            b',' if nesting == 0 => {
                push_part(&mut parts, selectors, start, idx);
                start = idx + 1;
            }
            _ => {}
        }
        idx += 1;
    }
    push_part(&mut parts, selectors, start, selectors.len());

    parts
}

fn push_part<'a>(parts: &mut Vec<SplitPart<'a>>, selectors: &'a str, start: usize, end: usize) {
    let text = &selectors[start..end];
    let leading = text.len() - text.trim_start().len();
    if leading == text.len() {
        return;
    }

    parts.push(SplitPart {
        text,
        offset: start + leading,
    });
}

/// Normalizes a declaration: the name and value are trimmed and joined by a `:`, and whitespace
/// around the arguments of function calls is removed. Returns `None` for an empty declaration.
pub fn normalize_declaration(declaration: &str) -> Option<String> {
    let declaration = declaration.trim();
    if declaration.is_empty() {
        return None;
    }

    let normalized = match declaration.split_once(':') {
        Some((name, value)) => format!("{}:{}", name.trim(), compact_functions(value.trim())),
        None => compact_functions(declaration),
    };

    Some(normalized)
}

/// Removes the whitespace after `(` and `,` and before `,` and `)` inside function calls, like
/// `rgba( 255, 0, 0 )`. Whitespace in plain parentheses and outside calls is kept as-is.
pub fn compact_functions(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    // True for every open parenthesis that belongs to a function call
    let mut calls: Vec<bool> = Vec::new();
    let mut rest = value;

    while let Some(c) = rest.chars().next() {
        if c == '_' {
            if let Some(placeholder) = Placeholder::parse(rest) {
                output.push_str(&rest[..placeholder.len]);
                rest = &rest[placeholder.len..];
                continue;
            }
        }

        if c.is_whitespace() && calls.last() == Some(&true) {
            let trimmed = rest.trim_start();
            let next = trimmed.chars().next();
            let previous = output.chars().last();

            if matches!(previous, Some('(' | ',')) || matches!(next, Some(',' | ')')) {
                rest = trimmed;
                continue;
            }
        }

        match c {
            '(' => {
                let is_call = output
                    .chars()
                    .last()
                    .is_some_and(|previous| previous.is_alphanumeric() || previous == '-' || previous == '_');
                calls.push(is_call);
            }
            ')' => {
                calls.pop();
            }
            _ => {}
        }

        output.push(c);
        rest = &rest[c.len_utf8()..];
    }

    output
}

/// Removes the source delimiters written by the source tracker from a slice of the input
pub fn strip_source_markers(text: &str) -> Cow<'_, str> {
    if !text.contains(PREFIX) {
        return Cow::Borrowed(text);
    }

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find(PREFIX) {
        output.push_str(&rest[..idx]);
        rest = &rest[idx..];

        match Placeholder::parse(rest) {
            Some(placeholder) if placeholder.kind.is_source_marker() => {
                rest = &rest[placeholder.len..];
            }
            _ => {
                output.push_str(PREFIX);
                rest = &rest[PREFIX.len()..];
            }
        }
    }
    output.push_str(rest);

    Cow::Owned(output)
}

/// Number of characters on the first line of a token. Never less than one.
pub fn first_line_extent(text: &str) -> usize {
    text.split('\n')
        .next()
        .map(|line| line.chars().count())
        .unwrap_or_default()
        .max(1)
}
