use crate::source_map::SourceMap;
use cssfront_shared::config::Options;
use cssfront_shared::position::Position;
use cssfront_shared::warnings::Warnings;

/// Configuration bag the input source map tracker is built from
#[derive(Clone, Debug, Default)]
pub struct TrackerConfig {
    pub options: Options,
    pub warnings: Warnings,
}

#[derive(Clone, Debug)]
enum State {
    /// No source map was supplied
    Inert,
    /// A source map was supplied but not parsed yet
    Pending(String),
    Ready(SourceMap),
    /// The supplied source map could not be loaded
    Failed,
}

/// Resolves positions in the tokenizer input to positions in the original sources, using the
/// source map produced by the step that generated the CSS.
#[derive(Clone, Debug)]
pub struct InputSourceMapTracker {
    state: State,
    root: Option<String>,
    warnings: Warnings,
}

impl InputSourceMapTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let state = match config.options.source_map {
            Some(payload) => State::Pending(payload),
            None => State::Inert,
        };

        Self {
            state,
            root: config.options.source_map_root,
            warnings: config.warnings,
        }
    }

    /// Creates a tracker without a source map. Every lookup passes through.
    pub fn inert(warnings: Warnings) -> Self {
        Self {
            state: State::Inert,
            root: None,
            warnings,
        }
    }

    /// Returns true when a source map was supplied and it did not fail to load
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, State::Pending(_) | State::Ready(_))
    }

    /// Returns true when a source map was supplied, whether it loaded or not
    pub fn is_configured(&self) -> bool {
        !matches!(self.state, State::Inert)
    }

    /// Returns true while the supplied source map waits for [`InputSourceMapTracker::track`]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending(_))
    }

    /// Loads the supplied source map and calls `on_ready` once done. Loading happens only on the
    /// first call; a map that fails to load leaves the tracker inactive and adds a warning.
    pub fn track(&mut self, on_ready: impl FnOnce()) {
        if let State::Pending(payload) = &self.state {
            self.state = match SourceMap::from_json_with_root(payload, self.root.as_deref()) {
                Ok(map) => {
                    log::debug!("loaded input source map with {} sources", map.sources().len());
                    State::Ready(map)
                }
                Err(err) => {
                    self.warnings
                        .push(format!("Could not load input source map: {err}. Ignoring."));
                    State::Failed
                }
            };
        }

        on_ready();
    }

    /// Resolves a 1-based line and 0-based column to the original position
    pub fn resolve(&self, line: usize, column: usize) -> Position {
        self.resolve_within(line, column, 1)
    }

    /// Resolves the position of a token spanning `extent` characters from the given line and
    /// column. When the first character of the token is not mapped, the lookup is retried at its
    /// last character so the token still resolves to the content it covers.
    pub fn resolve_within(&self, line: usize, column: usize, extent: usize) -> Position {
        let passthrough = Position::new(line, column, None);

        let State::Ready(map) = &self.state else {
            return passthrough;
        };

        let lookup = |column: usize| {
            let generated_line = u32::try_from(line.checked_sub(1)?).ok()?;
            map.original_position_for(generated_line, u32::try_from(column).ok()?)
        };
        let found = lookup(column).or_else(|| lookup(column + extent.max(1) - 1));

        match found {
            Some(original) => Position::new(
                original.line as usize + 1,
                original.column as usize,
                Some(original.source.to_string()),
            ),
            None => {
                self.warnings.push(format!(
                    "No input source map mapping for {line}:{column}. Keeping the generated position."
                ));
                passthrough
            }
        }
    }

    /// Returns the original content of a source, when the source map embeds it
    pub fn sources_content(&self, label: &str) -> Option<&str> {
        match &self.state {
            State::Ready(map) => map.source_content(label),
            _ => None,
        }
    }
}
