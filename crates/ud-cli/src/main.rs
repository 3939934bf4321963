//! CLI entry point for the uikit-docs tooling.
//!
//! Exposes the documentation site's building blocks on the command line so
//! they can be scripted and checked without a browser.
//!
//! # Usage
//!
//! ```bash
//! uikit-docs [OPTIONS] <COMMAND>
//!
//! # Parse loosely typed dates
//! uikit-docs date parse 2022025 5/3/24 31-02-2025
//!
//! # Read and update search params against a schema
//! uikit-docs params read --schema listing.json --query 'page=2&tags=a,b'
//! uikit-docs params write --schema listing.json --query 'page=2' --update '{"sortBy":"name"}'
//!
//! # Install snippets
//! uikit-docs install button card --all
//!
//! # Search the docs index
//! uikit-docs search --index docs-index.json "date picker"
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ud_core::{Config, PackageManager};
use ud_date::{DateParser, format_date};
use ud_docs::{InstallRequest, JsonFileBackend, PreferenceStore, load_index, search};
use ud_params::{Partial, QueryString, Schema, SearchParamBinder};

/// Preferences file used when the configuration does not name one.
const DEFAULT_PREFS_PATH: &str = "./.uikit-docs/preferences.json";

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Tooling for the UI kit documentation site.
///
/// Parses form dates, binds search params to schemas, renders install
/// snippets, manages preferences, and searches the docs index.
#[derive(Parser)]
#[command(name = "uikit-docs", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON configuration file.
    #[arg(short, long, global = true, env = "UIKIT_DOCS_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse or format day-month-year dates.
    Date {
        #[command(subcommand)]
        command: DateCommand,
    },

    /// Read or write search params against a schema.
    Params {
        #[command(subcommand)]
        command: ParamsCommand,
    },

    /// Print install commands for components or packages.
    Install {
        /// Component names (or npm packages with `--deps`).
        #[arg(required = true)]
        components: Vec<String>,

        /// Treat arguments as npm packages instead of registry components.
        #[arg(long)]
        deps: bool,

        /// Install as development dependencies.
        #[arg(short = 'D', long, requires = "deps")]
        dev: bool,

        /// Package manager (defaults to the saved preference).
        #[arg(short, long)]
        package_manager: Option<PackageManager>,

        /// Print the command for every package manager.
        #[arg(short, long, conflicts_with = "package_manager")]
        all: bool,
    },

    /// Show or change saved preferences.
    Prefs {
        #[command(subcommand)]
        command: Option<PrefsCommand>,
    },

    /// Search the documentation index.
    Search {
        /// Path to the JSON index.
        #[arg(short, long)]
        index: Utf8PathBuf,

        /// Search text.
        query: String,

        /// Maximum number of results.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

/// `date` subcommands.
#[derive(Subcommand)]
enum DateCommand {
    /// Parse inputs such as `5-3-24`, `05/03/2024` or `2022025`.
    Parse {
        /// Inputs to parse.
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Format an ISO date (`YYYY-MM-DD`) as `DD-MM-YYYY`.
    Format {
        /// ISO date.
        date: String,
    },
}

/// `params` subcommands.
#[derive(Subcommand)]
enum ParamsCommand {
    /// Print the validated state for a query string.
    Read {
        /// Path to the JSON schema.
        #[arg(short, long)]
        schema: Utf8PathBuf,

        /// Query string, with or without a leading `?`.
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Apply a partial update and print the resulting query string.
    Write {
        /// Path to the JSON schema.
        #[arg(short, long)]
        schema: Utf8PathBuf,

        /// Current query string.
        #[arg(short, long, default_value = "")]
        query: String,

        /// JSON object of fields to change.
        #[arg(short, long)]
        update: String,
    },
}

/// `prefs` subcommands.
#[derive(Subcommand)]
enum PrefsCommand {
    /// Print the saved preferences.
    Show,

    /// Set the preferred package manager.
    PackageManager {
        /// npm, pnpm, yarn or bun.
        manager: PackageManager,
    },

    /// Turn the wide layout on or off.
    Widescreen {
        /// New state.
        #[arg(value_enum)]
        state: Toggle,
    },
}

/// On/off switch value.
#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    /// Enable.
    On,
    /// Disable.
    Off,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `warn` level by default so
/// command output stays clean. Logs go to stderr.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Loads the configuration file if one was given.
///
/// # Errors
///
/// Returns an error if the file is missing, malformed, or invalid.
fn load_config(path: Option<&Utf8Path>) -> color_eyre::Result<Config> {
    let Some(path) = path else {
        debug!("No configuration file, using defaults");
        return Ok(Config::default());
    };
    let config = Config::load(path).wrap_err_with(|| format!("Failed to load config {path}"))?;
    info!(path = %path, "Loaded configuration");
    Ok(config)
}

fn open_preferences(config: &Config) -> PreferenceStore<JsonFileBackend> {
    let path = config
        .prefs
        .path
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_PREFS_PATH));
    PreferenceStore::open(JsonFileBackend::new(path))
}

fn read_binder(schema_path: &Utf8Path) -> color_eyre::Result<SearchParamBinder> {
    let contents = std::fs::read_to_string(schema_path)
        .wrap_err_with(|| format!("Failed to read schema {schema_path}"))?;
    let schema: Schema = serde_json::from_str(&contents)
        .wrap_err_with(|| format!("Invalid schema {schema_path}"))?;
    SearchParamBinder::from_schema(schema)
        .map_err(|e| eyre!("Schema {schema_path} has no usable default value: {e}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Parses each input and prints the date or the rejection reason.
fn run_date_parse(config: &Config, inputs: &[String]) -> color_eyre::Result<()> {
    let parser = DateParser::from_config(&config.date);
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    for input in inputs {
        match parser.parse_detailed(input) {
            Ok(date) => writeln!(handle, "{input}\t{}", format_date(date))?,
            Err(reason) => writeln!(handle, "{input}\tinvalid ({reason})")?,
        }
    }
    Ok(())
}

/// Formats an ISO date.
fn run_date_format(date: &str) -> color_eyre::Result<()> {
    let date = NaiveDate::from_str(date.trim())
        .wrap_err_with(|| format!("Expected an ISO date (YYYY-MM-DD), got '{date}'"))?;
    writeln!(std::io::stdout().lock(), "{}", format_date(date))?;
    Ok(())
}

/// Prints validated state as JSON.
fn run_params_read(schema: &Utf8Path, query: &str) -> color_eyre::Result<()> {
    let binder = read_binder(schema)?;
    let state = binder.read(&QueryString::parse(query).to_raw());

    let json = serde_json::to_string_pretty(&state)?;
    writeln!(std::io::stdout().lock(), "{json}")?;
    Ok(())
}

/// Applies an update and prints the new query string.
fn run_params_write(schema: &Utf8Path, query: &str, update: &str) -> color_eyre::Result<()> {
    let binder = read_binder(schema)?;
    let mut url = QueryString::parse(query);
    let current = binder.read(&url.to_raw());

    let partial: Partial =
        serde_json::from_str(update).wrap_err("--update must be a JSON object")?;
    let changes = binder
        .write(&current, partial)
        .wrap_err("Update rejected, query string unchanged")?;
    url.apply(&changes);

    writeln!(std::io::stdout().lock(), "{url}")?;
    Ok(())
}

/// Prints install commands.
fn run_install(
    config: &Config,
    components: &[String],
    deps: bool,
    dev: bool,
    package_manager: Option<PackageManager>,
    all: bool,
) -> color_eyre::Result<()> {
    let request = if deps {
        InstallRequest::dependencies(components.iter().cloned(), dev)?
    } else {
        InstallRequest::add(&config.install, components.iter().cloned())?
    };

    let commands = if all {
        request.all_managers()
    } else {
        let manager = package_manager.unwrap_or_else(|| open_preferences(config).package_manager());
        vec![request.command(manager)]
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for command in &commands {
        if all {
            writeln!(handle, "{:<5} {command}", command.manager.name())?;
        } else {
            writeln!(handle, "{command}")?;
        }
    }
    Ok(())
}

/// Shows or changes preferences.
fn run_prefs(config: &Config, command: Option<&PrefsCommand>) -> color_eyre::Result<()> {
    let store = open_preferences(config);

    match command {
        None | Some(PrefsCommand::Show) => {}
        Some(PrefsCommand::PackageManager { manager }) => {
            store.set_package_manager(*manager)?;
            info!(manager = %manager, "Saved package manager preference");
        }
        Some(PrefsCommand::Widescreen { state }) => {
            store.set_widescreen(matches!(state, Toggle::On))?;
            info!(widescreen = store.widescreen(), "Saved layout preference");
        }
    }

    let prefs = store.get();
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "package manager: {}", prefs.package_manager)?;
    writeln!(
        handle,
        "widescreen:      {}",
        if prefs.widescreen { "on" } else { "off" }
    )?;
    writeln!(handle, "file:            {}", store.backend().path())?;
    Ok(())
}

/// Prints matching documentation pages.
fn run_search(index: &Utf8Path, query: &str, limit: usize) -> color_eyre::Result<()> {
    let entries = load_index(index)?;
    let hits = search(&entries, query, limit);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if hits.is_empty() {
        writeln!(handle, "No results for '{query}'")?;
        return Ok(());
    }
    for hit in &hits {
        writeln!(
            handle,
            "{:>3}  {:<28} {:<16} {}",
            hit.score, hit.entry.title, hit.entry.category, hit.entry.href
        )?;
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Load configuration
    let config = load_config(cli.config.as_deref())?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Date { command } => match command {
            DateCommand::Parse { inputs } => run_date_parse(&config, inputs),
            DateCommand::Format { date } => run_date_format(date),
        },
        Commands::Params { command } => match command {
            ParamsCommand::Read { schema, query } => run_params_read(schema, query),
            ParamsCommand::Write {
                schema,
                query,
                update,
            } => run_params_write(schema, query, update),
        },
        Commands::Install {
            components,
            deps,
            dev,
            package_manager,
            all,
        } => run_install(&config, components, *deps, *dev, *package_manager, *all),
        Commands::Prefs { command } => run_prefs(&config, command.as_ref()),
        Commands::Search {
            index,
            query,
            limit,
        } => run_search(index, query, *limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_install_flags() {
        let cli = Cli::parse_from(["uikit-docs", "install", "button", "-p", "PNPM"]);
        match cli.command {
            Commands::Install {
                components,
                package_manager,
                all,
                ..
            } => {
                assert_eq!(components, ["button"]);
                assert_eq!(package_manager, Some(PackageManager::Pnpm));
                assert!(!all);
            }
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn test_dev_requires_deps() {
        assert!(Cli::try_parse_from(["uikit-docs", "install", "react", "--dev"]).is_err());
        assert!(Cli::try_parse_from(["uikit-docs", "install", "react", "--deps", "--dev"]).is_ok());
    }

    #[test]
    fn test_all_conflicts_with_package_manager() {
        assert!(
            Cli::try_parse_from(["uikit-docs", "install", "button", "--all", "-p", "npm"]).is_err()
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "uikit-docs",
            "date",
            "parse",
            "1-1-24",
            "--verbose",
            "--config",
            "ud.json",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Utf8Path::new("ud.json")));
    }

    #[test]
    fn test_prefs_widescreen_value() {
        let cli = Cli::parse_from(["uikit-docs", "prefs", "widescreen", "on"]);
        assert!(matches!(
            cli.command,
            Commands::Prefs {
                command: Some(PrefsCommand::Widescreen { state: Toggle::On })
            }
        ));
    }
}
