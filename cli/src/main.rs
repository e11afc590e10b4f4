use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Parser, Subcommand};
use cns_phonetics_core::{DisplayMode, MappingRecord};
use cns_phonetics_sources::{BuildManifest, DataSource, PhoneticsConfig, SourceTables};
use cns_phonetics_sqlite::{Criteria, PhoneticStore, Verifier};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file written by `build` and read by the other commands.
const DEFAULT_DB_PATH: &str = "ShowChinesePhonetics_data.db";

/// CLI-specific display mode with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliDisplayMode {
    Bopomofo,
    Pinyin,
    WadeGiles,
}

impl From<CliDisplayMode> for DisplayMode {
    fn from(mode: CliDisplayMode) -> Self {
        match mode {
            CliDisplayMode::Bopomofo => Self::Bopomofo,
            CliDisplayMode::Pinyin => Self::PinyinTonal,
            CliDisplayMode::WadeGiles => Self::WadeGiles,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cns-phonetics")]
#[command(version, about = "Build and query the CNS 11643 phonetic database")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download or read the CNS 11643 tables and write the SQLite database.
    Build(BuildArgs),
    /// Check a database for record count, columns, samples and key format.
    Verify(VerifyArgs),
    /// Look up readings by code point, character or column filter.
    Lookup(LookupArgs),
    /// Write the flat `UNICODE<TAB>bopomofo,...` text table.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Output database path.
    #[arg(short, long, default_value = DEFAULT_DB_PATH)]
    output: PathBuf,
    /// Local checkout of CNS11643-OpenData (downloads from GitHub if not specified).
    #[arg(long)]
    cns_data_dir: Option<PathBuf>,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Do not write `<output>.manifest.json`.
    #[arg(long)]
    no_manifest: bool,
    /// Fail if any source file could not be loaded.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct VerifyArgs {
    /// Database file to verify.
    #[arg(default_value = DEFAULT_DB_PATH)]
    database: PathBuf,
    /// YAML configuration file with verification thresholds and samples.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("key").required(true).multiple(false)))]
struct LookupArgs {
    /// Database file path.
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,
    /// Which readings to print.
    #[arg(long, value_enum, default_value = "bopomofo")]
    mode: CliDisplayMode,
    /// Unicode code point in hex, with or without `U+`.
    #[arg(long, group = "key")]
    unicode: Option<String>,
    /// A single character.
    #[arg(long = "char", group = "key")]
    character: Option<char>,
    /// Column filter `COLUMN=VALUE`; repeat to combine with AND.
    #[arg(long = "where", value_name = "COLUMN=VALUE", group = "key")]
    filters: Vec<String>,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Database file path.
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,
    /// Output text file.
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Build(args) => run_build(args),
        Command::Verify(args) => run_verify(args),
        Command::Lookup(args) => run_lookup(args),
        Command::Export(args) => run_export(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// ---------------------------------------------------------------------------
// build command
// ---------------------------------------------------------------------------

fn run_build(args: BuildArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let source = match &args.cns_data_dir {
        Some(dir) => DataSource::local(dir),
        None => DataSource::remote(&config.source),
    };

    let tables = SourceTables::load(&source);
    if !tables.is_complete() {
        let failed: Vec<String> = tables
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.file, f.cause))
            .collect();
        if args.strict {
            return Err(format!(
                "{} source file(s) failed to load:\n  {}",
                failed.len(),
                failed.join("\n  ")
            ));
        }
        warn!(failed = failed.len(), "building from incomplete source tables");
    }

    let (records, report) = tables.build();
    info!(
        records = report.records,
        cns_without_phonetic = report.cns_without_phonetic,
        readings_without_pinyin = report.readings_without_pinyin,
        shared_code_points = report.shared_code_points,
        "merged source tables"
    );

    let mut store = PhoneticStore::new(&args.output);
    let stored = store
        .rebuild(&records)
        .map_err(|e| format!("Failed to write database '{}': {e}", args.output.display()))?;
    store.close();

    if !args.no_manifest {
        let manifest = BuildManifest::new(
            PACKAGE_VERSION,
            &source.describe(),
            &tables,
            &report,
            stored,
        );
        let manifest_path = BuildManifest::path_for(&args.output);
        if let Ok(previous) = BuildManifest::load(&manifest_path) {
            let changed = manifest.changed_sources(&previous);
            if changed.is_empty() {
                info!("source files unchanged since previous build");
            } else {
                info!(
                    "source files changed since previous build: {}",
                    changed.join(", ")
                );
            }
        }
        manifest
            .save(&manifest_path)
            .map_err(|e| format!("Failed to write manifest: {e}"))?;
        info!(path = %manifest_path.display(), "wrote build manifest");
    }

    println!("Generation complete!");
    println!("  Records: {stored}");
    println!("  Unicode mappings: {}", tables.cns_to_unicode.len());
    println!("  Phonetic entries: {}", tables.cns_to_phonetic.len());
    println!("  Pinyin mappings: {}", tables.bopomofo_to_pinyin.len());
    println!("  Output: {}", args.output.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// verify command
// ---------------------------------------------------------------------------

fn run_verify(args: VerifyArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let mut store = PhoneticStore::new(&args.database);

    println!("Verifying database: {}", args.database.display());
    let report = Verifier::new(config.verify).verify(&mut store);

    if report.passed {
        if let Some(count) = report.record_count {
            println!("Record count: {count} (OK)");
        }
        println!("All checks passed!");
        return Ok(());
    }

    println!("Verification FAILED:");
    for problem in &report.problems {
        println!("  - {problem}");
    }
    Err(format!("{} problem(s) found", report.problems.len()))
}

// ---------------------------------------------------------------------------
// lookup command
// ---------------------------------------------------------------------------

/// One lookup result as printed with `--json`.
#[derive(Debug, Serialize)]
struct LookupRow<'a> {
    unicode: &'a str,
    character: Option<char>,
    phonetic: &'a [String],
    pinyin_tonal: &'a [String],
    pinyin_alt: &'a [String],
    display: Vec<&'a str>,
}

impl<'a> LookupRow<'a> {
    fn new(record: &'a MappingRecord, mode: DisplayMode) -> Self {
        Self {
            unicode: record.unicode_hex(),
            character: record.character(),
            phonetic: record.phonetic_readings(),
            pinyin_tonal: record.pinyin_tonal(),
            pinyin_alt: record.pinyin_romanized_alt(),
            display: record.display_readings(mode),
        }
    }
}

fn run_lookup(args: LookupArgs) -> Result<(), String> {
    let mode = DisplayMode::from(args.mode);
    let mut store = PhoneticStore::new(&args.db);

    let result = if let Some(hex) = &args.unicode {
        store
            .get_by_unicode(hex)
            .map(|found| found.into_iter().collect::<Vec<_>>())
    } else if let Some(c) = args.character {
        store.get_by_character(c)
    } else {
        let criteria = parse_filters(&args.filters)?;
        if !criteria.ignored().is_empty() {
            eprintln!("ignored unknown columns: {}", criteria.ignored().join(", "));
        }
        store.find(&criteria)
    };
    let records = result.map_err(|e| format!("Lookup failed: {e}"))?;

    if args.json {
        let rows: Vec<LookupRow<'_>> = records.iter().map(|r| LookupRow::new(r, mode)).collect();
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| format!("Failed to serialize results: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if records.is_empty() {
        println!("No matching characters.");
        return Ok(());
    }
    for record in &records {
        let character = record.character().map(String::from).unwrap_or_default();
        println!(
            "{character}\tU+{}\t{}",
            record.unicode_hex(),
            record.display_readings(mode).join(", ")
        );
    }
    Ok(())
}

/// Splits `COLUMN=VALUE` arguments into criteria; unknown columns are kept
/// in [`Criteria::ignored`].
fn parse_filters(filters: &[String]) -> Result<Criteria, String> {
    let mut pairs = Vec::with_capacity(filters.len());
    for filter in filters {
        let (column, value) = filter
            .split_once('=')
            .ok_or_else(|| format!("Invalid filter '{filter}': expected COLUMN=VALUE"))?;
        pairs.push((column.trim(), value));
    }
    Ok(Criteria::from_pairs(pairs))
}

// ---------------------------------------------------------------------------
// export command
// ---------------------------------------------------------------------------

fn run_export(args: ExportArgs) -> Result<(), String> {
    let mut store = PhoneticStore::new(&args.db);
    let records = store
        .all_records()
        .map_err(|e| format!("Failed to read database '{}': {e}", args.db.display()))?;

    let write_err = |e: std::io::Error| format!("Failed to write '{}': {e}", args.output.display());
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let file = fs::File::create(&args.output).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    for record in &records {
        writeln!(out, "{}\t{}", record.unicode_hex(), record.joined_phonetic())
            .map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;

    println!(
        "Exported {} records to {}",
        records.len(),
        args.output.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<PhoneticsConfig, String> {
    PhoneticsConfig::load_or_default(path).map_err(|e| format!("Failed to load config: {e}"))
}
