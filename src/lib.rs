//! cssfront
//!
//! Tokenizing front end of a CSS optimizer. The work is split over the crates in `crates/`:
//!
//! - `cssfront_shared`: options, errors, placeholders, positions and warnings
//! - `cssfront_sourcemap`: the source tracker and the input source map tracker
//! - `cssfront_tokenizer`: the tokenizer and its token tree
//!
pub use cssfront_shared as shared;
pub use cssfront_sourcemap as sourcemap;
pub use cssfront_tokenizer as tokenizer;

pub mod testing;
