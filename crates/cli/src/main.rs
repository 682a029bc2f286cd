//! `mt940` command-line interface.

mod render;

use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mt9x_core::{
    CurrencyTable, Error, Message, MessageParser, ReferenceTables, StatementIdentCodes,
    to_json_value, to_pretty_json, write_csv,
};
use mt9x_diagnostics::{self as diag, Diagnostic, codes};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::{Format, print_summary, render_diagnostics, render_diagnostics_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "mt940",
    version,
    about = "MT940 toolchain: parse, validate, summarise, and export SWIFT bank statements"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// ISO 4217 currency table (JSON array of {code, number, minor_units})
    /// replacing the bundled one.
    #[arg(long, global = true)]
    currencies: Option<String>,

    /// Statement identification code table (CSV `code,description`, no
    /// header) replacing the bundled one.
    #[arg(long, global = true)]
    sic_codes: Option<String>,

    /// Log lexer and grammar events to stderr.
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a statement file and print its message tree as JSON.
    Parse {
        file: String,
        /// Skip the network validated rules.
        #[arg(long)]
        no_validate: bool,
    },

    /// Parse and validate a statement file.
    Check { file: String },

    /// Print a human-readable summary of a statement file.
    Summary { file: String },

    /// Export statement lines of one or more files as a single CSV document.
    Csv {
        #[arg(required = true)]
        files: Vec<String>,
        /// Skip the network validated rules.
        #[arg(long)]
        no_validate: bool,
    },

    /// Explain a diagnostic ID (e.g. MT9303).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.trace);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = run(cli, format) {
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "success": false,
                    "error": "command_failed",
                    "message": format!("{err:#}"),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).expect("error JSON serialization cannot fail")
                );
            }
            Format::Pretty => eprintln!("error: {err:#}"),
        }
        process::exit(1);
    }
}

fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("mt9x_core=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli, format: Format) -> Result<()> {
    let tables = || load_tables(cli.currencies.as_deref(), cli.sic_codes.as_deref());

    match cli.cmd {
        Cmd::Parse { file, no_validate } => cmd_parse(&file, &tables()?, !no_validate, format),
        Cmd::Check { file } => cmd_check(&file, &tables()?, format),
        Cmd::Summary { file } => cmd_summary(&file, &tables()?, format),
        Cmd::Csv { files, no_validate } => cmd_csv(&files, &tables()?, !no_validate, format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(file: &str, tables: &ReferenceTables, validate: bool, format: Format) -> Result<()> {
    let loaded = load_message(file, parser(tables, validate))?;

    match (format, loaded.result) {
        (Format::Json, result) => {
            let (message, diagnostics) = match &result {
                Ok(msg) => (to_json_value(msg), Vec::new()),
                Err(e) => (serde_json::Value::Null, vec![e.to_diagnostic()]),
            };
            let out = serde_json::json!({
                "message": message,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            if result.is_err() {
                process::exit(1);
            }
        }
        (Format::Pretty, Ok(msg)) => println!("{}", to_pretty_json(&msg)),
        (Format::Pretty, Err(e)) => fail(&loaded.source, file, &e, format),
    }
    Ok(())
}

fn cmd_check(file: &str, tables: &ReferenceTables, format: Format) -> Result<()> {
    let loaded = load_message(file, parser(tables, true))?;
    let diagnostics: Vec<Diagnostic> = loaded
        .result
        .as_ref()
        .err()
        .map(Error::to_diagnostic)
        .into_iter()
        .collect();
    let ok = diagnostics.is_empty();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "file": file,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics(&loaded.source, file, &diagnostics, format);
            print_summary(&diagnostics);
            if ok {
                eprintln!("{file}: ok");
            }
        }
    }

    if !ok {
        process::exit(1);
    }
    Ok(())
}

fn cmd_summary(file: &str, tables: &ReferenceTables, format: Format) -> Result<()> {
    let loaded = load_message(file, parser(tables, true))?;
    let msg = match loaded.result {
        Ok(msg) => msg,
        Err(e) => fail(&loaded.source, file, &e, format),
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({ "file": file, "summary": msg.to_string() });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => println!("{msg}"),
    }
    Ok(())
}

fn cmd_csv(files: &[String], tables: &ReferenceTables, validate: bool, format: Format) -> Result<()> {
    let parser = parser(tables, validate);
    let mut messages = Vec::with_capacity(files.len());

    for file in files {
        let loaded = load_message(file, parser)?;
        let msg = match loaded.result {
            Ok(msg) => msg,
            Err(e) => fail(&loaded.source, file, &e, format),
        };
        if msg.statements.is_empty() {
            // stdout carries the CSV document, so warnings always go to stderr.
            let warning = Diagnostic::warn(
                codes::NO_STATEMENT_LINES,
                format!(
                    "message {} has no statement lines and contributes no rows",
                    msg.transaction_ref_no
                ),
                None,
            );
            render_diagnostics_pretty(&loaded.source, file, &[warning]);
        }
        messages.push(msg);
    }

    let stdout = io::stdout();
    write_csv(&messages, stdout.lock()).context("failed to write CSV")?;
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// A statement file and the outcome of parsing it.
struct Loaded {
    /// Lossy UTF-8 text of the file, used for source snippets.
    source: String,
    result: Result<Message, Error>,
}

fn load_message(file: &str, parser: MessageParser<'_>) -> Result<Loaded> {
    let bytes = fs::read(file).with_context(|| format!("failed to read '{file}'"))?;
    let result = parser.parse_bytes(&bytes);
    if let Err(e) = &result {
        tracing::debug!(file, code = e.code(), "statement rejected");
    }
    Ok(Loaded {
        source: String::from_utf8_lossy(&bytes).into_owned(),
        result,
    })
}

fn parser(tables: &ReferenceTables, validate: bool) -> MessageParser<'_> {
    let parser = MessageParser::new();
    if validate {
        parser.validate_with(tables)
    } else {
        parser
    }
}

/// Render a parse or validation failure and exit with code 1.
fn fail(source: &str, file: &str, err: &Error, format: Format) -> ! {
    let diagnostics = [err.to_diagnostic()];
    render_diagnostics(source, file, &diagnostics, format);
    if format == Format::Pretty {
        print_summary(&diagnostics);
    }
    process::exit(1);
}

/// Load the bundled reference tables, replacing either one with a table read
/// from an explicit path.
fn load_tables(currencies: Option<&str>, sic_codes: Option<&str>) -> Result<ReferenceTables> {
    let currencies = match currencies {
        Some(path) => CurrencyTable::from_json(&read_table(path)?)
            .with_context(|| format!("failed to load currency table '{path}'"))?,
        None => CurrencyTable::embedded().context("bundled currency table")?,
    };
    let sic_codes = match sic_codes {
        Some(path) => StatementIdentCodes::from_csv(&read_table(path)?)
            .with_context(|| format!("failed to load identification code table '{path}'"))?,
        None => StatementIdentCodes::embedded().context("bundled identification code table")?,
    };
    Ok(ReferenceTables::new(currencies, sic_codes))
}

fn read_table(path: &str) -> Result<String> {
    fs::read_to_string(Path::new(path)).with_context(|| format!("failed to read tables file '{path}'"))
}
