use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use blueprint_db::blueprint::{BlueprintItem, ModelError, classify, describe};
use blueprint_db::db::{BlueprintDb, RewriteReport, StoreError, StoreOutcome, StoredEntry};
use blueprint_db::exchange::{CodecError, ExchangeCodec, MapExchange, canonicalize};
use blueprint_db::{Config, ConfigError};

/// CLI-specific errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Library error (wraps all blueprint_db errors)
    #[error(transparent)]
    Library(#[from] blueprint_db::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file could not be read
    #[error("Cannot read '{}': {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON file given to `encode` is not valid JSON
    #[error("Invalid JSON in '{}': {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Nothing to store
    #[error("No exchange strings given")]
    MissingInput,

    /// `--index` with several inputs
    #[error("--index places a single item, but {0} exchange strings were given")]
    IndexNeedsSingleInput(usize),

    /// Some exchange strings could not be stored
    #[error("{failed} of {total} exchange strings could not be stored")]
    StoreFailures { failed: usize, total: usize },
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        Self::Library(e.into())
    }
}

impl From<ModelError> for AppError {
    fn from(e: ModelError) -> Self {
        Self::Library(e.into())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        Self::Library(e.into())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Library(e.into())
    }
}

#[derive(Parser)]
#[command(name = "bpdb")]
#[command(about = "Store Factorio blueprint exchange strings as a directory of JSON files")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "bpdb.toml", env = "BPDB_CONFIG")]
    config: PathBuf,

    /// Show debug logs (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Store root (overrides database.location)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode exchange strings and store them
    Store {
        /// Exchange strings
        #[arg(short, long = "string", num_args = 1..)]
        strings: Vec<String>,

        /// Files with one exchange string per line
        #[arg(short, long = "file", num_args = 1..)]
        files: Vec<PathBuf>,

        /// Place a single item into this book
        #[arg(long, requires = "index")]
        book: Option<String>,

        /// Slot of the item inside --book
        #[arg(long, requires = "book")]
        index: Option<u64>,
    },

    /// List stored books and their entries
    List {
        /// Only list this book
        book: Option<String>,
    },

    /// Describe an exchange string
    Info {
        /// Exchange string
        exchange: String,

        /// How many levels of nested books to show
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },

    /// Print the JSON inside an exchange string
    Decode {
        /// Exchange string
        exchange: String,

        /// Single-line canonical JSON
        #[arg(long)]
        compact: bool,
    },

    /// Build an exchange string from a JSON file
    Encode {
        /// JSON file
        file: PathBuf,

        /// Exchange version character (defaults to exchange.version)
        #[arg(long)]
        version: Option<u8>,
    },

    /// Print a stored book as an exchange string
    Export {
        /// Book name
        book: String,
    },

    /// Apply [migration.renames] to every stored item
    Migrate {
        /// Report files that would change without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Set every stored item's label to the name in its filename
    SyncLabels {
        /// Report files that would change without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect a map exchange string
    Map {
        /// Map exchange string (>>>...<<<)
        exchange: String,

        /// Write the raw map data to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only print the game version
        #[arg(long)]
        version_only: bool,
    },
}

/// Format an error for user-friendly display
fn format_error(err: &AppError) -> String {
    use std::io::IsTerminal;

    let use_colors = std::io::stderr().is_terminal();

    let (red, yellow, reset) = if use_colors {
        ("\x1b[0;31m", "\x1b[0;33m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    let mut output = format!("{}Error:{} {}\n", red, reset, err);

    if let Some(hint) = get_error_hint(err) {
        output.push_str(&format!("{}Hint:{} {}\n", yellow, reset, hint));
    }

    output
}

/// Get a helpful hint for common errors
fn get_error_hint(err: &AppError) -> Option<&'static str> {
    use blueprint_db::Error;

    match err {
        AppError::Library(Error::Codec(e)) if e.is_unsupported_version() => {
            Some("Add the version to [exchange] supported_versions to accept it")
        }
        AppError::Library(Error::Codec(e)) if e.is_malformed() => {
            Some("Copy the whole exchange string, including the leading version digit")
        }
        AppError::Library(Error::Model(ModelError::UnknownBlueprintType { .. })) => Some(
            "Expected one of blueprint, blueprint_book, deconstruction_planner, upgrade_planner",
        ),
        AppError::Library(Error::Store(StoreError::BookNotFound(_))) => {
            Some("Use 'bpdb list' to see stored books")
        }
        AppError::Library(Error::Store(StoreError::InvalidPlacement(_))) => {
            Some("Use --book together with --index, or neither for a standalone item")
        }
        AppError::Library(Error::Config(_)) => {
            Some("Check the configuration file given with --config or BPDB_CONFIG")
        }
        AppError::MissingInput => Some("Pass exchange strings with -s or files with -f"),
        AppError::StoreFailures { .. } => Some("Run with -v for details on each failure"),
        _ => None,
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprint!("{}", format_error(&err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(root) = &cli.db {
        config.database.location = root.display().to_string();
    }
    let codec = config.codec();
    let db = config.database();

    match cli.command {
        Commands::Store {
            strings,
            files,
            book,
            index,
        } => cmd_store(&codec, &db, strings, &files, book.as_deref(), index),
        Commands::List { book } => cmd_list(&db, book.as_deref()),
        Commands::Info { exchange, depth } => {
            let item = decode_item(&codec, &exchange)?;
            print!("{}", describe(&item, depth));
            Ok(())
        }
        Commands::Decode { exchange, compact } => {
            let value = codec.parse_value(&exchange)?;
            let text = if compact {
                canonicalize(&value)?
            } else {
                serde_json::to_string_pretty(&value).map_err(CodecError::from)?
            };
            println!("{text}");
            Ok(())
        }
        Commands::Encode { file, version } => {
            let text = std::fs::read_to_string(&file).map_err(|source| AppError::ReadInput {
                path: file.clone(),
                source,
            })?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .map_err(|source| AppError::InvalidJson { path: file, source })?;
            let version = version.unwrap_or(codec.default_version());
            println!(
                "{}",
                codec.generate_with_version(&canonicalize(&value)?, version)?
            );
            Ok(())
        }
        Commands::Export { book } => {
            let mut item = db.assemble_book(&book)?;
            if let Some(assembled) = item.as_book_mut() {
                assembled.sort_entries();
            }
            println!("{}", codec.generate_value(&item.to_value())?);
            Ok(())
        }
        Commands::Migrate { dry_run } => {
            let table = &config.migration.renames;
            if table.is_empty() {
                println!("No renames configured in [migration.renames]");
                return Ok(());
            }
            let report = db.migrate_entities(table, dry_run)?;
            print_rewrite_report(&report, dry_run);
            Ok(())
        }
        Commands::SyncLabels { dry_run } => {
            let report = db.reconcile_labels(dry_run)?;
            print_rewrite_report(&report, dry_run);
            Ok(())
        }
        Commands::Map {
            exchange,
            output,
            version_only,
        } => {
            let map = MapExchange::parse(&exchange)?;
            let version = map.game_version()?;
            if version_only {
                println!("{version}");
                return Ok(());
            }
            println!("Game version: {version}");
            println!("Compressed: {}", if map.compressed { "yes" } else { "no" });
            println!("Size: {} bytes", map.data.len());
            if let Some(path) = output {
                std::fs::write(&path, &map.data)?;
                println!("Wrote map data to {}", path.display());
            }
            Ok(())
        }
    }
}

fn decode_item(codec: &ExchangeCodec, exchange: &str) -> Result<BlueprintItem, AppError> {
    Ok(classify(codec.parse_value(exchange)?)?)
}

fn read_exchange_file(path: &Path) -> Result<Vec<String>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn cmd_store(
    codec: &ExchangeCodec,
    db: &BlueprintDb,
    strings: Vec<String>,
    files: &[PathBuf],
    book: Option<&str>,
    index: Option<u64>,
) -> Result<(), AppError> {
    let mut inputs = strings;
    for file in files {
        inputs.extend(read_exchange_file(file)?);
    }
    if inputs.is_empty() {
        return Err(AppError::MissingInput);
    }
    if index.is_some() && inputs.len() > 1 {
        return Err(AppError::IndexNeedsSingleInput(inputs.len()));
    }

    db.ensure_directories()?;

    let total = inputs.len();
    let mut failed = 0;
    for (position, input) in inputs.iter().enumerate() {
        if let Err(err) = store_one(codec, db, input, book, index) {
            failed += 1;
            eprint!("[{}/{}] {}", position + 1, total, format_error(&err));
        }
    }

    if failed > 0 {
        return Err(AppError::StoreFailures { failed, total });
    }
    Ok(())
}

fn store_one(
    codec: &ExchangeCodec,
    db: &BlueprintDb,
    input: &str,
    book: Option<&str>,
    index: Option<u64>,
) -> Result<(), AppError> {
    let item = decode_item(codec, input)?;

    let outcome = if book.is_some() || index.is_some() {
        StoreOutcome::Item(db.store_single(&item, index, book)?)
    } else {
        db.store_item(&item)?
    };

    match outcome {
        StoreOutcome::Book(report) => {
            println!(
                "{} book '{}' ({} entries, version {})",
                report.outcome,
                report.book,
                report.written.len(),
                item.version_string()
            );
            for failure in &report.failed {
                println!(
                    "  skipped entry {} '{}': {}",
                    failure.position, failure.name, failure.error
                );
            }
        }
        StoreOutcome::Item(stored) => {
            println!(
                "{} {} '{}' in {}",
                stored.outcome,
                item.kind(),
                stored.entry.name,
                stored.book
            );
        }
    }
    Ok(())
}

fn print_entries(entries: &mut [StoredEntry]) {
    entries.sort_by(|a, b| {
        (a.index.is_none(), a.index, &a.name).cmp(&(b.index.is_none(), b.index, &b.name))
    });
    for entry in entries.iter() {
        match entry.index {
            Some(index) => println!("  [{index}] {}", entry.name),
            None => println!("  {}", entry.name),
        }
    }
}

fn cmd_list(db: &BlueprintDb, book: Option<&str>) -> Result<(), AppError> {
    let books = match book {
        Some(book) => vec![book.to_string()],
        None => db.list_books()?,
    };
    if books.is_empty() {
        println!("No books stored in {}", db.root().display());
        return Ok(());
    }

    for name in books {
        let mut entries = db.list_book(&name)?;
        let version = db
            .read_version_marker(&name)
            .ok()
            .flatten()
            .map(blueprint_db::decode_version);
        match version {
            Some(version) => println!("{name} (version {version})"),
            None => println!("{name}"),
        }
        print_entries(&mut entries);
    }
    Ok(())
}

fn print_rewrite_report(report: &RewriteReport, dry_run: bool) {
    let verb = if dry_run { "Would rewrite" } else { "Rewrote" };
    for path in &report.modified {
        println!("{verb} {}", path.display());
    }
    println!(
        "{} of {} files {}",
        report.modified.len(),
        report.scanned,
        if dry_run { "would change" } else { "changed" }
    );
}
