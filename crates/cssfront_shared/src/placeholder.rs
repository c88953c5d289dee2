//! Placeholders left behind by the escaping pass.
//!
//! Comments, quoted strings and urls are replaced before tokenization by markers of the form
//! `__ESCAPED_<KIND>_CLEAN_CSS<index>__`. When the replaced content spans more than its marker
//! would, the marker carries the extent of the original content:
//! `__ESCAPED_<KIND>_CLEAN_CSS<index>(<lines>,<columns>)__`.
//!
//! The `SOURCE` and `SOURCE_END` kinds are written by the source tracker around every stored
//! file.
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{space0, u32 as number};
use nom::combinator::{map, opt, value};
use nom::sequence::{delimited, separated_pair};
use nom::{IResult, Parser};

/// Every placeholder starts with this prefix
pub const PREFIX: &str = "__ESCAPED_";

const INFIX: &str = "_CLEAN_CSS";
const SUFFIX: &str = "__";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// A regular comment, which can be dropped
    Comment,
    /// A `/*! ... */` comment that must be preserved
    CommentSpecial,
    /// A quoted string
    FreeText,
    /// The content of a `url(...)`
    Url,
    /// Start of a file stored in the source tracker
    Source,
    /// End of a file stored in the source tracker
    SourceEnd,
}

impl PlaceholderKind {
    fn marker(&self) -> &'static str {
        match self {
            PlaceholderKind::Comment => "COMMENT",
            PlaceholderKind::CommentSpecial => "COMMENT_SPECIAL",
            PlaceholderKind::FreeText => "FREE_TEXT",
            PlaceholderKind::Url => "URL",
            PlaceholderKind::Source => "SOURCE",
            PlaceholderKind::SourceEnd => "SOURCE_END",
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, PlaceholderKind::Comment | PlaceholderKind::CommentSpecial)
    }

    pub fn is_source_marker(&self) -> bool {
        matches!(self, PlaceholderKind::Source | PlaceholderKind::SourceEnd)
    }
}

/// Lines and columns the escaped content spanned in the original text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub lines: u32,
    pub columns: u32,
}

/// A placeholder found in the tokenizer input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub index: u32,
    pub extent: Option<Extent>,
    /// Length in bytes of the marker text
    pub len: usize,
}

impl Placeholder {
    /// Parses the placeholder at the start of `input`
    pub fn parse(input: &str) -> Option<Placeholder> {
        if !input.starts_with(PREFIX) {
            return None;
        }

        let (rest, (kind, index, extent)) = placeholder(input).ok()?;
        Some(Placeholder {
            kind,
            index,
            extent,
            len: input.len() - rest.len(),
        })
    }

    /// Finds the placeholder that starts exactly at `offset` in `data`
    pub fn find_at(data: &str, offset: usize) -> Option<Placeholder> {
        if data.as_bytes().get(offset) != Some(&b'_') {
            return None;
        }

        Placeholder::parse(data.get(offset..)?)
    }

    /// Renders the marker text for a placeholder
    pub fn render(kind: PlaceholderKind, index: u32, extent: Option<Extent>) -> String {
        match extent {
            Some(extent) => format!(
                "{PREFIX}{}{INFIX}{index}({},{}){SUFFIX}",
                kind.marker(),
                extent.lines,
                extent.columns
            ),
            None => format!("{PREFIX}{}{INFIX}{index}{SUFFIX}", kind.marker()),
        }
    }
}

fn kind(input: &str) -> IResult<&str, PlaceholderKind> {
    // Longer markers first, as `COMMENT` is a prefix of `COMMENT_SPECIAL`
    alt((
        value(PlaceholderKind::CommentSpecial, tag("COMMENT_SPECIAL")),
        value(PlaceholderKind::Comment, tag("COMMENT")),
        value(PlaceholderKind::FreeText, tag("FREE_TEXT")),
        value(PlaceholderKind::Url, tag("URL")),
        value(PlaceholderKind::SourceEnd, tag("SOURCE_END")),
        value(PlaceholderKind::Source, tag("SOURCE")),
    ))
    .parse(input)
}

fn extent(input: &str) -> IResult<&str, Extent> {
    map(
        delimited(
            tag("("),
            separated_pair(
                delimited(space0, number, space0),
                tag(","),
                delimited(space0, number, space0),
            ),
            tag(")"),
        ),
        |(lines, columns)| Extent { lines, columns },
    )
    .parse(input)
}

fn placeholder(input: &str) -> IResult<&str, (PlaceholderKind, u32, Option<Extent>)> {
    let (rest, (_, kind, _, index, extent, _)) =
        (tag(PREFIX), kind, tag(INFIX), number, opt(extent), tag(SUFFIX)).parse(input)?;

    Ok((rest, (kind, index, extent)))
}
