//! Loader for version 3 source maps.
//!
//! Only what position lookups need is kept: the sources, their embedded content and, per
//! generated line, the mappings sorted by generated column.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("invalid source map json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported source map version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid mappings: {0}")]
    InvalidMappings(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
    version: u32,
    #[serde(default)]
    source_root: Option<String>,
    sources: Vec<String>,
    #[serde(default)]
    sources_content: Vec<Option<String>>,
    mappings: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Mapping {
    generated_column: u32,
    original: Option<OriginalLocation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OriginalLocation {
    source: usize,
    line: u32,
    column: u32,
}

/// Original position of a generated position. Lines and columns are 0-based, like in the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OriginalPosition<'a> {
    pub source: &'a str,
    pub line: u32,
    pub column: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SourceMap {
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    lines: Vec<Vec<Mapping>>,
}

impl SourceMap {
    /// Parses a source map. Source labels are prefixed with the map's `sourceRoot`.
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        Self::from_json_with_root(json, None)
    }

    /// Parses a source map, resolving the source labels against `root` on top of the map's
    /// own `sourceRoot`.
    pub fn from_json_with_root(json: &str, root: Option<&str>) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        if raw.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }

        let lines = decode_mappings(&raw.mappings, raw.sources.len())?;
        let sources = raw
            .sources
            .iter()
            .map(|source| resolve_label(root, raw.source_root.as_deref(), source))
            .collect();

        Ok(Self {
            sources,
            sources_content: raw.sources_content,
            lines,
        })
    }

    /// Labels of all sources in the map
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the original content of the given source, when it is embedded in the map
    pub fn source_content(&self, label: &str) -> Option<&str> {
        let index = self.sources.iter().position(|source| source == label)?;
        self.sources_content.get(index)?.as_deref()
    }

    /// Looks up the mapping with the greatest generated column not exceeding `column` on the
    /// given generated line. Both are 0-based.
    pub fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition<'_>> {
        let mappings = self.lines.get(line as usize)?;
        let index = mappings.partition_point(|mapping| mapping.generated_column <= column);
        let original = mappings.get(index.checked_sub(1)?)?.original?;

        Some(OriginalPosition {
            source: self.sources.get(original.source)?.as_str(),
            line: original.line,
            column: original.column,
        })
    }
}

fn resolve_label(root: Option<&str>, source_root: Option<&str>, source: &str) -> String {
    let mut path = match root {
        Some(root) if !root.is_empty() => Path::new(root).to_path_buf(),
        _ => Default::default(),
    };
    if let Some(source_root) = source_root.filter(|source_root| !source_root.is_empty()) {
        path.push(source_root);
    }
    path.push(source);

    path.to_string_lossy().into_owned()
}

fn decode_mappings(mappings: &str, source_count: usize) -> Result<Vec<Vec<Mapping>>, SourceMapError> {
    let mut lines = Vec::new();

    // Everything but the generated column is relative to the previous segment in the whole map
    let mut source: i64 = 0;
    let mut original_line: i64 = 0;
    let mut original_column: i64 = 0;

    for (line_nr, line) in mappings.split(';').enumerate() {
        let mut generated_column: i64 = 0;
        let mut entries = Vec::new();

        for segment in line.split(',').filter(|segment| !segment.is_empty()) {
            let fields = decode_vlq(segment)?;
            if !matches!(fields.len(), 1 | 4 | 5) {
                return Err(SourceMapError::InvalidMappings(format!(
                    "segment '{segment}' on line {line_nr} has {} fields",
                    fields.len()
                )));
            }

            generated_column += fields[0];
            let original = if fields.len() >= 4 {
                source += fields[1];
                original_line += fields[2];
                original_column += fields[3];

                let index = to_u32(source, segment)? as usize;
                if index >= source_count {
                    return Err(SourceMapError::InvalidMappings(format!(
                        "segment '{segment}' refers to unknown source {index}"
                    )));
                }

                Some(OriginalLocation {
                    source: index,
                    line: to_u32(original_line, segment)?,
                    column: to_u32(original_column, segment)?,
                })
            } else {
                None
            };

            entries.push(Mapping {
                generated_column: to_u32(generated_column, segment)?,
                original,
            });
        }

        entries.sort_by_key(|mapping| mapping.generated_column);
        lines.push(entries);
    }

    Ok(lines)
}

fn to_u32(value: i64, segment: &str) -> Result<u32, SourceMapError> {
    u32::try_from(value)
        .map_err(|_| SourceMapError::InvalidMappings(format!("segment '{segment}' is out of range")))
}

fn base64_value(byte: u8) -> Option<i64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };

    Some(value as i64)
}

/// Decodes the base64 VLQ values of a single segment
fn decode_vlq(segment: &str) -> Result<Vec<i64>, SourceMapError> {
    let mut values = Vec::with_capacity(5);
    let mut value: i64 = 0;
    let mut shift = 0;

    for byte in segment.bytes() {
        let digit = base64_value(byte).ok_or_else(|| {
            SourceMapError::InvalidMappings(format!("invalid base64 character '{}'", byte as char))
        })?;

        value += (digit & 0x1f) << shift;
        if digit & 0x20 != 0 {
            shift += 5;
            if shift > 60 {
                return Err(SourceMapError::InvalidMappings(format!(
                    "value in segment '{segment}' is too large"
                )));
            }
            continue;
        }

        let negative = value & 1 == 1;
        value >>= 1;
        values.push(if negative { -value } else { value });
        value = 0;
        shift = 0;
    }

    if shift != 0 {
        return Err(SourceMapError::InvalidMappings(format!(
            "segment '{segment}' ends in the middle of a value"
        )));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("A", vec![0]; "zero")]
    #[test_case("C", vec![1]; "one")]
    #[test_case("D", vec![-1]; "minus one")]
    #[test_case("AAAI", vec![0, 0, 0, 4]; "four fields")]
    #[test_case("EACF", vec![2, 0, 1, -2]; "negative delta")]
    #[test_case("gB", vec![16]; "continuation")]
    fn vlq(segment: &str, expected: Vec<i64>) {
        assert_eq!(decode_vlq(segment).unwrap(), expected);
    }

    #[test_case("g"; "unterminated")]
    #[test_case("A*"; "bad character")]
    fn vlq_rejects(segment: &str) {
        assert!(matches!(decode_vlq(segment), Err(SourceMapError::InvalidMappings(_))));
    }

    const STYLES_MAP: &str = r#"{
        "version": 3,
        "file": "styles.css",
        "sources": ["styles.less"],
        "sourcesContent": ["div {\n  > a {\n    color: red;\n  }\n}\n"],
        "names": [],
        "mappings": "IAAI;EACF"
    }"#;

    #[test]
    fn lookup_uses_greatest_lower_bound() {
        let map = SourceMap::from_json(STYLES_MAP).unwrap();
        assert_eq!(map.sources(), ["styles.less".to_string()]);

        // Nothing is mapped before column 4 on the first line
        assert_eq!(map.original_position_for(0, 3), None);

        let expected = OriginalPosition {
            source: "styles.less",
            line: 0,
            column: 4,
        };
        assert_eq!(map.original_position_for(0, 4), Some(expected.clone()));
        assert_eq!(map.original_position_for(0, 80), Some(expected));

        assert_eq!(
            map.original_position_for(1, 2),
            Some(OriginalPosition {
                source: "styles.less",
                line: 1,
                column: 2,
            })
        );
        assert_eq!(map.original_position_for(2, 0), None);
    }

    #[test]
    fn segments_with_one_field_are_unmapped() {
        let map = SourceMap::from_json(
            r#"{"version": 3, "sources": ["a.scss"], "mappings": "AAAA,G"}"#,
        )
        .unwrap();

        assert!(map.original_position_for(0, 2).is_some());
        assert_eq!(map.original_position_for(0, 3), None);
    }

    #[test]
    fn source_content() {
        let map = SourceMap::from_json(STYLES_MAP).unwrap();
        assert!(map.source_content("styles.less").unwrap().starts_with("div {"));
        assert_eq!(map.source_content("other.less"), None);
    }

    #[test]
    fn source_root_and_base_path() {
        let json = r#"{"version": 3, "sourceRoot": "less", "sources": ["styles.less"], "mappings": "AAAA"}"#;

        let map = SourceMap::from_json(json).unwrap();
        assert_eq!(map.sources(), [Path::new("less").join("styles.less").to_string_lossy().into_owned()]);

        let map = SourceMap::from_json_with_root(json, Some("assets")).unwrap();
        let expected = Path::new("assets").join("less").join("styles.less");
        assert_eq!(map.sources(), [expected.to_string_lossy().into_owned()]);
    }

    #[test]
    fn rejects_other_versions() {
        let result = SourceMap::from_json(r#"{"version": 2, "sources": [], "mappings": ""}"#);
        assert!(matches!(result, Err(SourceMapError::UnsupportedVersion(2))));
    }

    #[test]
    fn rejects_unknown_sources() {
        let result = SourceMap::from_json(r#"{"version": 3, "sources": [], "mappings": "AAAA"}"#);
        assert!(matches!(result, Err(SourceMapError::InvalidMappings(_))));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(SourceMap::from_json("{"), Err(SourceMapError::Json(_))));
    }
}
