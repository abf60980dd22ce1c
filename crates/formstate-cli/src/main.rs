//! Run one form event against a JSON-file store.
//!
//! The view is described by a TOML file (model plus field components); the
//! store is a JSON snapshot rewritten after every successful request. The
//! response envelope is printed to stdout.
use clap::Parser;
use formstate::{
    Error,
    core::{
        config::ViewConfig,
        store::{MemoryAccessor, StoreSnapshot},
        view::{FormView, ViewRequest},
    },
};
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};
use thiserror::Error as ThisError;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(name = "formstate", version, about = "Run one form event against a JSON-file store")]
struct Cli {
    /// View definition (TOML).
    #[arg(long, env = "FORMSTATE_CONFIG")]
    config: PathBuf,

    /// Store snapshot (JSON); created on first save.
    #[arg(long, env = "FORMSTATE_STORE")]
    store: PathBuf,

    /// Request envelope (JSON); `-` reads stdin.
    #[arg(long, conflicts_with = "event")]
    request: Option<PathBuf>,

    /// Event name, for requests without state.
    #[arg(long)]
    event: Option<String>,

    /// Event arguments, used with `--event`.
    #[arg(long = "arg", requires = "event")]
    args: Vec<String>,

    /// Default log level when `RUST_LOG` is unset.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,
}

///
/// CliError
///

#[derive(Debug, ThisError)]
enum CliError {
    #[error("failed to access '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("either --request or --event is required")]
    MissingRequest,

    #[error(transparent)]
    Formstate(#[from] Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = ViewConfig::load(&cli.config).map_err(Error::from)?;
    let snapshot = read_snapshot(&cli.store)?;
    let request = read_request(cli)?;

    let accessor = MemoryAccessor::from_snapshot(config.model.clone(), &snapshot);
    let response = {
        let mut view = FormView::from_config(&config, &accessor);
        view.handle(&request).map_err(Error::from)?
    };

    write_json(&cli.store, &accessor.snapshot())?;
    debug!(store = %cli.store.display(), rows = accessor.len(), "store written");

    let out = serde_json::to_string_pretty(&response).map_err(|source| CliError::Json {
        path: PathBuf::from("<stdout>"),
        source,
    })?;
    println!("{out}");

    Ok(())
}

fn read_snapshot(path: &Path) -> Result<StoreSnapshot, CliError> {
    if !path.exists() {
        debug!(store = %path.display(), "store missing, starting empty");
        return Ok(StoreSnapshot::default());
    }

    let source = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_json(path, &source)
}

fn read_request(cli: &Cli) -> Result<ViewRequest, CliError> {
    match (&cli.request, &cli.event) {
        (Some(path), _) if path.as_os_str() == "-" => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| CliError::Io {
                    path: path.clone(),
                    source,
                })?;
            parse_json(path, &source)
        }
        (Some(path), _) => {
            let source = fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            parse_json(path, &source)
        }
        (None, Some(event)) => {
            let mut request = ViewRequest::event(event);
            request.args.clone_from(&cli.args);
            Ok(request)
        }
        (None, None) => Err(CliError::MissingRequest),
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, source: &str) -> Result<T, CliError> {
    serde_json::from_str(source).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(path: &Path, snapshot: &StoreSnapshot) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(snapshot).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, out).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
