use std::fmt;
use std::path::PathBuf;

use services::{AppServices, Clock, TrackerConfig};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use tracker_core::import::records_from_url_lines;

mod practice;
mod render;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDataPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDataPath { raw } => write!(f, "invalid --data value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  tracker [--data <path>] list");
    eprintln!("  tracker [--data <path>] stats");
    eprintln!("  tracker [--data <path>] show <playlist>");
    eprintln!("  tracker [--data <path>] add --name <playlist> --urls <file|->");
    eprintln!("  tracker [--data <path>] delete <playlist>");
    eprintln!("  tracker [--data <path>] practice <playlist>");
    eprintln!();
    eprintln!("The URL file holds one question link per line.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRACKER_DATA_PATH (default tracker-data.json)");
    eprintln!("  TRACKER_LOG or RUST_LOG (default info)");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Stats,
    Show { playlist: String },
    Add { name: String, urls: String },
    Delete { playlist: String },
    Practice { playlist: String },
}

struct Args {
    data_path: Option<PathBuf>,
    command: Command,
}

impl Args {
    fn parse(args: impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut data_path = None;
        let mut positional = Vec::new();
        let mut name = None;
        let mut urls = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => {
                    let value = require_value(&mut args, "--data")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDataPath { raw: value });
                    }
                    data_path = Some(PathBuf::from(value));
                }
                "--name" => name = Some(require_value(&mut args, "--name")?),
                "--urls" => urls = Some(require_value(&mut args, "--urls")?),
                "--help" | "-h" => return Ok(None),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(cmd) = positional.next() else {
            return Ok(None);
        };
        let mut playlist_arg = || {
            positional
                .next()
                .ok_or(ArgsError::MissingArgument { what: "playlist name" })
        };

        let command = match cmd.as_str() {
            "list" => Command::List,
            "stats" => Command::Stats,
            "show" => Command::Show {
                playlist: playlist_arg()?,
            },
            "delete" => Command::Delete {
                playlist: playlist_arg()?,
            },
            "practice" => Command::Practice {
                playlist: playlist_arg()?,
            },
            "add" => Command::Add {
                name: name.ok_or(ArgsError::MissingValue { flag: "--name" })?,
                urls: urls.ok_or(ArgsError::MissingValue { flag: "--urls" })?,
            },
            _ => return Err(ArgsError::UnknownCommand(cmd)),
        };

        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Some(Self { data_path, command }))
    }
}

fn init_logging(config: &TrackerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn read_url_source(source: &str) -> Result<String, std::io::Error> {
    if source == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(source).await
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = match Args::parse(std::env::args().skip(1)) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            print_usage();
            return Err(err.into());
        }
    };

    let mut config = TrackerConfig::from_env()?;
    if let Some(path) = parsed.data_path {
        config = config.with_data_path(path);
    }
    init_logging(&config);
    tracing::debug!(command = ?parsed.command, path = %config.data_path.display(), "starting");

    let services = AppServices::from_config(&config, Clock::default());
    let playlists = services.playlists();

    match parsed.command {
        Command::List => render::playlists(&playlists.list_playlists().await),
        Command::Stats => render::overall(&playlists.overall_stats().await),
        Command::Show { playlist } => render::details(&playlists.playlist_details(&playlist).await?),
        Command::Add { name, urls } => {
            let text = read_url_source(&urls).await?;
            let created = playlists
                .create_playlist(&name, records_from_url_lines(&text))
                .await?;
            println!("Created playlist {created}.");
        }
        Command::Delete { playlist } => {
            playlists.delete_playlist(&playlist).await?;
            println!("Deleted playlist {playlist}. Question history is kept.");
        }
        Command::Practice { playlist } => {
            practice::run(&services.practice(), &playlist).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
