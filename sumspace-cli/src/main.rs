use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use sumspace_ingest::{parse_amex_text, ParsedStatement, StatementSummary, TextExtractor};

mod config;
mod output;
mod state;

use config::Config;
use output::Format;

#[derive(Parser, Debug)]
#[command(name = "sumspace", version, about = "Credit-card statement parser")]
struct Cli {
    /// Debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse AMEX statements (PDF or extracted text) into payments, credits and debits
    Parse {
        /// Statement files; `.pdf` goes through the extractor, anything else is read as text
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format (default from config)
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Only keep transactions dated in this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Per-section and per-card totals for one statement
    Summary {
        file: PathBuf,

        /// Only count transactions dated in this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Print the page-annotated text the parser would see
    Extract { file: PathBuf },

    /// Manage ~/.sumspace/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config (never overwrites)
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_logging(cli.verbose, &cfg);

    match cli.command {
        Command::Parse {
            files,
            format,
            month,
            compact,
        } => {
            let mut stmt = load_statements(files, &cfg).await?;
            if let Some(m) = month {
                let (year, month) = output::parse_month(&m)?;
                stmt = stmt.filter_month(year, month);
            }

            let format = format.unwrap_or(cfg.output.format);
            let pretty = cfg.output.pretty && !compact;
            output::write_statement(io::stdout().lock(), &stmt, format, pretty)?;
        }

        Command::Summary { file, month } => {
            let mut stmt = load_statements(vec![file], &cfg).await?;
            if let Some(m) = month {
                let (year, month) = output::parse_month(&m)?;
                stmt = stmt.filter_month(year, month);
            }
            let summary = StatementSummary::from_statement(&stmt);
            output::write_summary(io::stdout().lock(), &summary)?;
        }

        Command::Extract { file } => {
            let text = statement_text(&file, &cfg.extractor())?;
            println!("{text}");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_logging(verbose: bool, cfg: &Config) {
    let fallback = if verbose { "debug" } else { cfg.log.filter.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(fallback))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Parse every file on the blocking pool; results are merged in argument order.
async fn load_statements(files: Vec<PathBuf>, cfg: &Config) -> Result<ParsedStatement> {
    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let extractor = cfg.extractor();
        handles.push(tokio::task::spawn_blocking(move || -> Result<(PathBuf, ParsedStatement)> {
            let text = statement_text(&path, &extractor)?;
            Ok((path, parse_amex_text(&text)))
        }));
    }

    let mut merged = ParsedStatement::default();
    for handle in handles {
        let (path, stmt) = handle.await.context("parser task failed")??;
        info!(
            "{}: {} payments, {} credits, {} debits",
            path.display(),
            stmt.payments.len(),
            stmt.credits.len(),
            stmt.debits.len()
        );
        merged.append(stmt);
    }
    Ok(merged)
}

fn statement_text(path: &Path, extractor: &impl TextExtractor) -> Result<String> {
    if !path.exists() {
        bail!("statement not found: {}", path.display());
    }

    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Ok(extractor
            .extract(path)
            .with_context(|| format!("extracting {}", path.display()))?)
    } else {
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
    }
}
