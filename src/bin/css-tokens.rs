use anyhow::{anyhow, Result};
use cssfront::shared::config::Options;
use cssfront::shared::warnings::Warnings;
use cssfront::sourcemap::{InputSourceMapTracker, SourceTracker, TrackerConfig};
use cssfront::tokenizer::walker::Walker;
use cssfront::tokenizer::{Collaborators, Tokenizer};
use simple_logger::SimpleLogger;
use std::fs;

fn main() -> Result<()> {
    let matches = clap::Command::new("cssfront tokenizer")
        .version("0.1.0")
        .about("Tokenizes escaped CSS files and prints the token tree")
        .arg(
            clap::Arg::new("files")
                .help("The escaped CSS files to tokenize, in order")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            clap::Arg::new("debug")
                .help("Enable debug logging")
                .short('d')
                .long("debug")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("metadata")
                .help("Add metadata to selectors and flat blocks")
                .long("metadata")
                .short('m')
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("positions")
                .help("Track the position of every token")
                .long("positions")
                .short('p')
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("source-map")
                .help("Input source map of the files")
                .long("source-map")
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("config")
                .help("JSON file with tokenizer options")
                .long("config")
                .short('c')
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("json")
                .help("Print the tokens as JSON")
                .long("json")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("quiet")
                .help("Don't display the tokens")
                .long("quiet")
                .short('q')
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("debug") {
        SimpleLogger::new().init()?;
    }

    let mut options = match matches.get_one::<String>("config") {
        Some(path) => Options::from_json(&fs::read_to_string(path)?)?,
        None => Options::default(),
    };
    if let Some(path) = matches.get_one::<String>("source-map") {
        options = options.with_source_map(&fs::read_to_string(path)?);
    }

    let files: Vec<&String> = matches
        .get_many::<String>("files")
        .ok_or_else(|| anyhow!("no files given"))?
        .collect();

    let mut source_tracker = SourceTracker::new();
    let mut data = String::new();
    for path in files {
        let content = fs::read_to_string(path)?;
        data.push_str(&source_tracker.store(path, &content));
    }

    let warnings = Warnings::new();
    let mut input_source_map_tracker = InputSourceMapTracker::new(TrackerConfig {
        options: options.clone(),
        warnings: warnings.clone(),
    });
    input_source_map_tracker.track(|| log::debug!("input source map tracker is ready"));

    let tokenizer = Tokenizer::new(
        Collaborators {
            source_tracker: Some(source_tracker),
            input_source_map_tracker: Some(input_source_map_tracker),
            options,
            warnings,
        },
        matches.get_flag("metadata"),
        matches.get_flag("positions"),
    )?;
    log::debug!(
        "tokenizing {} sources, input source map: {}",
        tokenizer.source_tracker().len(),
        tokenizer.input_source_map_tracker().is_tracking()
    );

    let tokens = tokenizer.to_tokens(&data);

    if !matches.get_flag("quiet") {
        if matches.get_flag("json") {
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        } else {
            Walker::new(&tokens).walk_stdout();
        }
    }

    for warning in tokenizer.warnings().to_vec() {
        eprintln!("warning: {warning}");
    }

    Ok(())
}
