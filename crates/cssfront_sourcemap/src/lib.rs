//! Position remapping for the tokenizer.
//!
//! Two independent remappings can apply to a token position:
//!
//! - [`SourceTracker`]: several files are concatenated into one buffer, and a position has to be
//!   reported relative to the file it came from.
//! - [`InputSourceMapTracker`]: the CSS was produced by an earlier step (a preprocessor, for
//!   example) and a source map leads back to the true original.

pub mod input_source_map;
pub mod source_map;
pub mod source_tracker;

pub use input_source_map::{InputSourceMapTracker, TrackerConfig};
pub use source_map::{OriginalPosition, SourceMap, SourceMapError};
pub use source_tracker::SourceTracker;
