//! Fixture-driven testing of the tokenizer
//!
//! Fixtures are JSON files under [`FIXTURE_ROOT`], each holding a list of tests. The integration
//! tests and the benchmarks both run them.
use crate::shared::config::Options;
use crate::shared::errors::Result;
use crate::shared::warnings::Warnings;
use crate::sourcemap::{InputSourceMapTracker, SourceTracker, TrackerConfig};
use crate::tokenizer::{Collaborators, Token, Tokenizer};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const FIXTURE_ROOT: &str = "./tests/data/tokenizer";

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub tests: Vec<Test>,
}

/// A file to store in the source tracker before tokenizing
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub label: String,
    pub content: String,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub description: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub metadata: bool,
    #[serde(default)]
    pub positions: bool,
    /// When set, the input is made of these files instead of `input`
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Input source map, as raw JSON
    #[serde(default)]
    pub source_map: Option<String>,
    pub output: Value,
    /// Expected number of warnings, when checked
    #[serde(default)]
    pub warnings: Option<usize>,
}

/// The result of running a single test
pub struct Outcome {
    pub tokens: Vec<Token>,
    pub warnings: Warnings,
}

impl Test {
    /// Sets up the tokenizer for this test, and returns it with the data to tokenize
    pub fn tokenizer(&self) -> Result<(Tokenizer, String)> {
        let warnings = Warnings::new();
        let options = Options {
            source_map: self.source_map.clone(),
            ..Default::default()
        };

        let mut source_tracker = SourceTracker::new();
        let data = if self.sources.is_empty() {
            self.input.clone()
        } else {
            self.sources
                .iter()
                .map(|source| source_tracker.store(&source.label, &source.content))
                .collect()
        };

        let mut input_source_map_tracker = InputSourceMapTracker::new(TrackerConfig {
            options: options.clone(),
            warnings: warnings.clone(),
        });
        input_source_map_tracker.track(|| {});

        let tokenizer = Tokenizer::new(
            Collaborators {
                source_tracker: Some(source_tracker),
                input_source_map_tracker: Some(input_source_map_tracker),
                options,
                warnings,
            },
            self.metadata,
            self.positions,
        )?;

        Ok((tokenizer, data))
    }

    pub fn tokenize(&self) -> Result<Outcome> {
        let (tokenizer, data) = self.tokenizer()?;
        let tokens = tokenizer.to_tokens(&data);

        Ok(Outcome {
            tokens,
            warnings: tokenizer.warnings().clone(),
        })
    }
}

pub fn fixture_from_filename(filename: &str) -> Result<Root> {
    let path = PathBuf::from(FIXTURE_ROOT).join(filename);
    fixture_from_path(&path)
}

pub fn fixture_from_path<P>(path: &P) -> Result<Root>
where
    P: AsRef<Path>,
{
    let contents = fs::read_to_string(path).map_err(|err| {
        crate::shared::errors::Error::Config(format!(
            "could not read fixture {}: {err}",
            path.as_ref().display()
        ))
    })?;

    Ok(serde_json::from_str(&contents)?)
}

/// Returns all fixtures that could be loaded
pub fn fixtures() -> impl Iterator<Item = Root> {
    fs::read_dir(FIXTURE_ROOT)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .filter_map(|entry| fixture_from_path(&entry.path()).ok())
}
