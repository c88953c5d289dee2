use cssfront_shared::placeholder::{Placeholder, PlaceholderKind};
use cssfront_sourcemap::SourceTracker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct State {
    line: usize,
    column: usize,
    source: Option<usize>,
}

impl Default for State {
    /// Default to line 1, column 0
    fn default() -> Self {
        Self {
            line: 1,
            column: 0,
            source: None,
        }
    }
}

/// Keeps track of the line and column of an offset in the tokenizer input.
///
/// Lines and columns are counted as they were before escaping: a placeholder with an extent moves
/// the counters by that extent, and the source delimiters restart counting for every stored file.
pub struct LocationTracker<'t> {
    data: &'t str,
    sources: &'t SourceTracker,
    offset: usize,
    state: State,
    /// States of the enclosing files, restored at the end of a stored file
    saved: Vec<State>,
}

impl<'t> LocationTracker<'t> {
    pub fn new(data: &'t str, sources: &'t SourceTracker) -> Self {
        Self {
            data,
            sources,
            offset: 0,
            state: State::default(),
            saved: Vec::new(),
        }
    }

    pub fn line(&self) -> usize {
        self.state.line
    }

    pub fn column(&self) -> usize {
        self.state.column
    }

    /// Label of the stored file the current offset is in
    pub fn source(&self) -> Option<&'t str> {
        self.state.source.and_then(|index| self.sources.label(index))
    }

    /// Moves the tracker to the given offset. Offsets are normally requested in increasing order;
    /// an earlier offset restarts counting from the beginning of the input.
    pub fn advance_to(&mut self, target: usize) {
        if target < self.offset {
            log::trace!("rewinding location tracker from {} to {}", self.offset, target);
            self.offset = 0;
            self.state = State::default();
            self.saved.clear();
        }

        let bytes = self.data.as_bytes();
        let target = target.min(bytes.len());

        while self.offset < target {
            let byte = bytes[self.offset];

            if byte == b'_' {
                if let Some(placeholder) = Placeholder::find_at(self.data, self.offset) {
                    self.skip_placeholder(&placeholder);
                    self.offset += placeholder.len;
                    continue;
                }
            }

            match byte {
                b'\n' => {
                    self.state.line += 1;
                    self.state.column = 0;
                }
                // UTF-8 continuation bytes belong to the character already counted
                0x80..=0xBF => {}
                _ => self.state.column += 1,
            }
            self.offset += 1;
        }
    }

    fn skip_placeholder(&mut self, placeholder: &Placeholder) {
        match placeholder.kind {
            PlaceholderKind::Source => {
                self.saved.push(self.state);
                self.state = State {
                    source: Some(placeholder.index as usize),
                    ..State::default()
                };
            }
            PlaceholderKind::SourceEnd => {
                self.state = self.saved.pop().unwrap_or_default();
            }
            _ => match placeholder.extent {
                Some(extent) if extent.lines == 0 => self.state.column += extent.columns as usize,
                Some(extent) => {
                    self.state.line += extent.lines as usize;
                    self.state.column = extent.columns as usize;
                }
                None => self.state.column += placeholder.len,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(data: &str, sources: &SourceTracker, target: usize) -> (usize, usize, Option<String>) {
        let mut tracker = LocationTracker::new(data, sources);
        tracker.advance_to(target);

        (tracker.line(), tracker.column(), tracker.source().map(str::to_string))
    }

    #[test]
    fn counts_lines_and_columns() {
        let sources = SourceTracker::new();
        let data = "a{}\n\n  div{}";

        assert_eq!(location(data, &sources, 0), (1, 0, None));
        assert_eq!(location(data, &sources, 3), (1, 3, None));
        assert_eq!(location(data, &sources, 7), (3, 2, None));
    }

    #[test]
    fn counts_characters() {
        let sources = SourceTracker::new();
        let data = "ü{}a{}";

        assert_eq!(location(data, &sources, data.find('a').unwrap()), (1, 3, None));
    }

    #[test]
    fn replays_placeholder_extents() {
        let sources = SourceTracker::new();

        let data = "__ESCAPED_COMMENT_CLEAN_CSS0(0, 5)__a{}";
        assert_eq!(location(data, &sources, data.find('a').unwrap()), (1, 5, None));

        let data = "__ESCAPED_COMMENT_CLEAN_CSS0(2, 5)__a{}";
        assert_eq!(location(data, &sources, data.find('a').unwrap()), (3, 5, None));

        let data = "x__ESCAPED_URL_CLEAN_CSS0__a";
        assert_eq!(
            location(data, &sources, data.len() - 1),
            (1, data.len() - 1, None)
        );
    }

    #[test]
    fn restarts_for_every_source() {
        let mut sources = SourceTracker::new();
        let one = sources.store("one.css", "a{}");
        let two = sources.store("two.css", "\na{color:red}");
        let data = format!("{one}{two}b");

        let first = one.find("a{").unwrap();
        assert_eq!(location(&data, &sources, first), (1, 0, Some("one.css".into())));

        let second = one.len() + two.find("a{").unwrap();
        assert_eq!(location(&data, &sources, second), (2, 0, Some("two.css".into())));

        // Content after the last file continues where the buffer started
        assert_eq!(location(&data, &sources, data.len() - 1), (1, 0, None));
    }

    #[test]
    fn rewinds_for_earlier_offsets() {
        let sources = SourceTracker::new();
        let data = "a{}\ndiv{}";
        let mut tracker = LocationTracker::new(data, &sources);

        tracker.advance_to(6);
        assert_eq!((tracker.line(), tracker.column()), (2, 2));

        tracker.advance_to(1);
        assert_eq!((tracker.line(), tracker.column()), (1, 1));
    }
}
