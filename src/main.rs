//! @ai:module:intent CLI entry point for emmett doc comment extraction
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on aggregator, config, input, output, scanner

use clap::{Parser, Subcommand, ValueEnum};
use emmett::config::DEFAULT_CONFIG_FILE;
use emmett::{
    aggregate_with, format_catalog, format_events, read_sources, Config, Dispatcher, Event,
    Layout, OutputFormat, Scanner, Tag,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "emmett")]
#[command(author, version, about = "Extract javadoc-style doc comments into structured JSON")]
struct Cli {
    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the entity catalog from doc comments
    Extract {
        /// Files or directories to read; stdin when omitted or `-`
        paths: Vec<PathBuf>,

        /// Result shape
        #[arg(long, short, value_enum)]
        layout: Option<LayoutArg>,

        /// Output format
        #[arg(long, short, value_enum)]
        format: Option<Format>,

        /// Character that starts a tag
        #[arg(long)]
        tag_marker: Option<char>,

        /// Configuration file (defaults to ./emmett.toml when present)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Print the raw doc comment event stream
    Events {
        /// Files or directories to read; stdin when omitted or `-`
        paths: Vec<PathBuf>,

        /// Only print events for these tags
        #[arg(long = "tag", short)]
        tags: Vec<String>,

        /// Character that starts a tag
        #[arg(long)]
        tag_marker: Option<char>,

        /// Configuration file (defaults to ./emmett.toml when present)
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Tree,
    Flat,
}

impl From<LayoutArg> for Layout {
    fn from(l: LayoutArg) -> Self {
        match l {
            LayoutArg::Tree => Layout::Tree,
            LayoutArg::Flat => Layout::Flat,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            paths,
            layout,
            format,
            tag_marker,
            config,
        } => resolve_config(config.as_deref(), tag_marker).and_then(|mut config| {
            if let Some(layout) = layout {
                config.layout = layout.into();
            }
            if let Some(format) = format {
                config.format = format.into();
            }
            run_extract(&paths, &config)
        }),

        Commands::Events {
            paths,
            tags,
            tag_marker,
            config,
        } => resolve_config(config.as_deref(), tag_marker)
            .and_then(|config| run_events(&paths, &tags, &config)),

        Commands::Init { output } => Config::default().save(&output).map(|()| {
            println!("Wrote {}", output.display());
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("emmett=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("emmett=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the explicit or local config file, then apply the tag marker override.
fn resolve_config(path: Option<&Path>, tag_marker: Option<char>) -> emmett::Result<Config> {
    let local = Path::new(DEFAULT_CONFIG_FILE);
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None if local.is_file() => {
            tracing::debug!("using {}", DEFAULT_CONFIG_FILE);
            Config::load(local)?
        }
        None => Config::default(),
    };

    if let Some(marker) = tag_marker {
        config.tag_marker = marker;
        config.validate()?;
    }

    Ok(config)
}

fn run_extract(paths: &[PathBuf], config: &Config) -> emmett::Result<()> {
    let source = read_sources(paths)?;
    let scanner = Scanner::new(config.scanner_config());
    let catalog = aggregate_with(&source, &scanner, config.layout);

    println!("{}", format_catalog(&catalog, config.format)?);
    Ok(())
}

fn run_events(paths: &[PathBuf], tags: &[String], config: &Config) -> emmett::Result<()> {
    let source = read_sources(paths)?;
    let scanner = Scanner::new(config.scanner_config());
    let events: RefCell<Vec<Event>> = RefCell::new(Vec::new());

    let mut dispatcher = Dispatcher::new();
    if tags.is_empty() {
        dispatcher.on_any(|event| events.borrow_mut().push(event.clone()));
    } else {
        for tag in tags {
            dispatcher.on(Tag::from_name(tag), |event| {
                events.borrow_mut().push(event.clone())
            });
        }
    }
    scanner.scan(&source, &mut dispatcher);
    drop(dispatcher);

    print!("{}", format_events(&events.into_inner()));
    Ok(())
}
