use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use sumspace_ingest::{ParsedStatement, Section, StatementSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Csv,
    Table,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    section: Section,
    date: NaiveDate,
    description: &'a str,
    amount: Decimal,
    card_ending: Option<&'a str>,
}

pub fn write_statement<W: Write>(
    mut w: W,
    stmt: &ParsedStatement,
    format: Format,
    pretty: bool,
) -> Result<()> {
    match format {
        Format::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut w, stmt)?;
            } else {
                serde_json::to_writer(&mut w, stmt)?;
            }
            writeln!(w)?;
        }
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(w);
            for (section, t) in stmt.iter() {
                wtr.serialize(CsvRow {
                    section,
                    date: t.date,
                    description: &t.description,
                    amount: t.amount,
                    card_ending: t.card_ending.as_deref(),
                })
                .context("write csv row")?;
            }
            wtr.flush()?;
        }
        Format::Table => {
            for section in Section::ALL {
                let txns = stmt.section(section);
                writeln!(w, "## {} ({})", section, txns.len())?;
                for t in txns {
                    writeln!(
                        w,
                        "{} {:>12} {:<10} {}",
                        t.date,
                        t.amount,
                        t.card_ending.as_deref().unwrap_or("-"),
                        t.description
                    )?;
                }
                writeln!(w)?;
            }
        }
    }
    Ok(())
}

pub fn write_summary<W: Write>(mut w: W, summary: &StatementSummary) -> Result<()> {
    for section in Section::ALL {
        let totals = summary.section(section);
        writeln!(w, "{:<10} count={:<4} total=${:.2}", section, totals.count, totals.total)?;
    }
    writeln!(w, "{:<10} total=${:.2}", "net", summary.net())?;

    if !summary.cards.is_empty() {
        writeln!(w, "\nNew charges by card:")?;
        for c in &summary.cards {
            writeln!(
                w,
                "- {:<12} count={:<4} total=${:.2}",
                c.card_ending.as_deref().unwrap_or("(none)"),
                c.totals.count,
                c.totals.total
            )?;
        }
    }
    Ok(())
}

/// `YYYY-MM` as used by `--month`.
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let (y, m) = s
        .split_once('-')
        .with_context(|| format!("expected YYYY-MM, got {s:?}"))?;
    let year: i32 = y.parse().with_context(|| format!("bad year in {s:?}"))?;
    let month: u32 = m.parse().with_context(|| format!("bad month in {s:?}"))?;
    anyhow::ensure!((1..=12).contains(&month), "month out of range in {s:?}");
    Ok((year, month))
}
