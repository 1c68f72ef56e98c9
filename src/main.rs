use quick_reader::{
    cli::Cli,
    config::{Config, get_app_data_prefix},
    logging::{self, LogLevel},
    models::Document,
    splitter::{split, word_count},
    ui::reader::{ApplicationState, Reader},
};

use clap::Parser;
use eyre::Result;

const LOG_FILE_NAME: &str = "quick-reader.log";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = load_config(&cli);
    let document = match &cli.file {
        Some(source) => Document::open(source)?,
        None => Document::welcome(),
    };
    logging::info(format!(
        "opened \"{}\" ({} words)",
        document.title,
        word_count(&document.text)
    ));

    let chunk_size = cli
        .chunk_size
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX));

    if cli.dump {
        let chunk_size = chunk_size.unwrap_or(config.settings.default_chunk_size);
        return dump_content(&document, chunk_size, cli.json);
    }

    let mut state = ApplicationState::new(config, document);
    if let Some(wpm) = cli.wpm {
        state.session.set_wpm(wpm);
    }
    if let Some(chunk_size) = chunk_size {
        state.session.set_chunk_size(chunk_size);
    }

    let mut reader = Reader::new(state)?;
    reader.run()
}

/// The TUI owns the terminal, so log lines go to a file unless dumping.
fn init_logging(cli: &Cli) {
    let level = LogLevel::from_verbosity(cli.verbose, cli.debug);
    let path = match &cli.log_file {
        Some(path) => Some(path.clone()),
        None if cli.dump => None,
        None => get_app_data_prefix()
            .ok()
            .map(|prefix| prefix.join(LOG_FILE_NAME)),
    };

    match path {
        Some(path) => {
            if let Err(err) = logging::init_with_file(level, &path) {
                logging::init(level);
                eprintln!("Warning: Could not open log file {}: {}", path.display(), err);
            }
        }
        None => logging::init(level),
    }
}

fn load_config(cli: &Cli) -> Config {
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path.clone()),
        None => Config::new(),
    };

    match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Warning: Could not load configuration: {}", err);
            eprintln!("Starting with default settings");
            logging::warn(format!("falling back to default configuration: {}", err));
            Config::in_memory()
        }
    }
}

fn dump_content(document: &Document, chunk_size: usize, json: bool) -> Result<()> {
    let chunks = split(&document.text, chunk_size);

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    for chunk in &chunks {
        println!("{}-{}\t{}", chunk.start_offset, chunk.stop_offset, chunk.text);
    }
    Ok(())
}
