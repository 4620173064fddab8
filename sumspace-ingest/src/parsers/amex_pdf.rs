//! American Express statement parser (PDF text)
//!
//! Input is the page-annotated text produced by a text extractor:
//!   --- Page 3 ---
//!   New Charges Details
//!   Card Ending 1-23456
//!   Date Description Amount
//!   02/10/24 COFFEE SHOP
//!   SEATTLE WA $4.50
//!   Fees
//!
//! A transaction starts at a dated line inside a `... Details` section and
//! runs until the next dated line, header, terminator or end of input.
//! Anything that does not resolve to a date and an amount is dropped.

use chrono::NaiveDate;
use log::{debug, trace};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::types::{ParsedStatement, Section, Transaction};

/// Footer/summary headings that close the transactional region.
///
/// Matched against whole lines only, so a description that happens to read
/// exactly like one of these ends the section early. The format has no escape.
pub const SECTION_TERMINATORS: &[&str] = &[
    "Fees",
    "Interest Charged",
    "About Trailing Interest",
    "Interest Charge Calculation",
    "Information on Pay Over Time and Purchasing Options",
    "New Charges Summary",
];

const PAGE_MARKER_PREFIX: &str = "--- Page";

/// Column headers and `*Indicates ...` footnotes.
const BOILERPLATE_PREFIXES: &[&str] = &["Date ", "*I"];

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}/\d{2}/\d{2})\*?\b").expect("date pattern"));
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\$[\d,]+\.\d{2}").expect("amount pattern"));
static CARD_ENDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Card Ending\s+([0-9-]+)").expect("card pattern"));

/// What a single trimmed line means to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    PageBreak,
    CardEnding(&'a str),
    Header(Section),
    Terminator,
    Boilerplate,
    /// Starts with an `MM/DD/YY` token (trailing `*` already stripped).
    Dated(&'a str),
    Text,
}

pub fn classify(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with(PAGE_MARKER_PREFIX) {
        return LineKind::PageBreak;
    }
    if let Some(caps) = CARD_ENDING_RE.captures(line) {
        if let Some(m) = caps.get(1) {
            return LineKind::CardEnding(m.as_str());
        }
    }
    if let Some(section) = Section::from_header(line) {
        return LineKind::Header(section);
    }
    if SECTION_TERMINATORS.contains(&line) {
        return LineKind::Terminator;
    }
    if BOILERPLATE_PREFIXES.iter().any(|p| line.starts_with(p)) {
        return LineKind::Boilerplate;
    }
    match leading_date(line) {
        Some(date) => LineKind::Dated(date),
        None => LineKind::Text,
    }
}

/// The leading `MM/DD/YY` token of a line, without its annotation asterisk.
pub fn leading_date(line: &str) -> Option<&str> {
    DATE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A `-$1,234.56` style token located in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken {
    pub start: usize,
    pub end: usize,
    pub value: Decimal,
}

impl AmountToken {
    pub fn text<'a>(&self, haystack: &'a str) -> &'a str {
        &haystack[self.start..self.end]
    }
}

/// Last amount token in `text`.
///
/// Statements can mention other dollar figures earlier in an entry
/// (`FOREIGN $20.00 CONVERSION FEE $22.10`); the total is printed last.
pub fn find_amount(text: &str) -> Option<AmountToken> {
    let m = AMOUNT_RE.find_iter(text).last()?;
    let cleaned = m.as_str().replace(['$', ','], "");
    let value = match Decimal::from_str(&cleaned) {
        Ok(v) => v,
        Err(e) => {
            debug!("unrepresentable amount {:?}: {e}", m.as_str());
            return None;
        }
    };
    Some(AmountToken {
        start: m.start(),
        end: m.end(),
        value,
    })
}

/// Where the scan is with respect to transaction sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    NoSection,
    InSection(Section),
}

impl ScanState {
    pub fn section(&self) -> Option<Section> {
        match self {
            ScanState::NoSection => None,
            ScanState::InSection(s) => Some(*s),
        }
    }
}

/// A dated line plus its continuation lines, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    section: Section,
    date: String,
    card_ending: Option<String>,
    fragments: Vec<String>,
}

impl Entry {
    fn into_transaction(self) -> Option<(Section, Transaction)> {
        let joined = self.fragments.join(" ");

        let Some(amount) = find_amount(&joined) else {
            debug!("dropping {} entry without amount: {joined:?}", self.section);
            return None;
        };
        let Ok(date) = NaiveDate::parse_from_str(&self.date, "%m/%d/%y") else {
            debug!("dropping {} entry with bad date {:?}", self.section, self.date);
            return None;
        };

        let txn = Transaction {
            date,
            description: describe(&joined, &self.date, &amount),
            amount: amount.value,
            card_ending: self.card_ending,
        };
        Some((self.section, txn))
    }
}

/// Entry text minus the leading date and the trailing amount.
fn describe(joined: &str, date: &str, amount: &AmountToken) -> String {
    let body_start = match joined.strip_prefix(date) {
        Some(rest) => {
            let rest = rest.trim_start().trim_start_matches('*').trim_start();
            joined.len() - rest.len()
        }
        None => 0,
    };

    let mut body = if amount.start >= body_start {
        &joined[body_start..amount.start]
    } else {
        &joined[body_start..]
    };

    // Some layouts print the total twice (`REFUND ADJ $10.00 $10.00`).
    let token = amount.text(joined);
    loop {
        let trimmed = body.trim_end();
        let Some(head) = trimmed.strip_suffix(token) else {
            break;
        };
        if !head.is_empty() && !head.ends_with(char::is_whitespace) {
            break;
        }
        body = head;
    }

    body.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Line-at-a-time statement scanner.
///
/// Card context lives beside the section state: it survives section changes
/// and is only replaced by the next `Card Ending` line.
#[derive(Debug, Default)]
pub struct Scanner {
    state: ScanState,
    card_ending: Option<String>,
    entry: Option<Entry>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn card_ending(&self) -> Option<&str> {
        self.card_ending.as_deref()
    }

    /// Whether a dated entry is open and collecting continuation lines.
    pub fn has_pending_entry(&self) -> bool {
        self.entry.is_some()
    }

    /// Consume one raw line, returning the transaction it completed, if any.
    pub fn feed(&mut self, raw_line: &str) -> Option<(Section, Transaction)> {
        let line = raw_line.trim();
        let kind = classify(line);
        trace!("{:?} <- {line:?}", kind);

        match kind {
            LineKind::Blank | LineKind::PageBreak | LineKind::Boilerplate => None,
            LineKind::CardEnding(card) => {
                self.card_ending = Some(card.to_string());
                None
            }
            LineKind::Header(section) => {
                let done = self.flush();
                self.state = ScanState::InSection(section);
                done
            }
            LineKind::Terminator => {
                let done = self.flush();
                self.state = ScanState::NoSection;
                done
            }
            LineKind::Dated(date) => {
                let ScanState::InSection(section) = self.state else {
                    return None;
                };
                let done = self.flush();
                self.entry = Some(Entry {
                    section,
                    date: date.to_string(),
                    card_ending: self.card_ending.clone(),
                    fragments: vec![line.to_string()],
                });
                done
            }
            LineKind::Text => {
                if self.state != ScanState::NoSection {
                    if let Some(entry) = self.entry.as_mut() {
                        entry.fragments.push(line.to_string());
                    }
                }
                None
            }
        }
    }

    /// End of input: flush whatever entry is still open.
    pub fn finish(mut self) -> Option<(Section, Transaction)> {
        self.flush()
    }

    fn flush(&mut self) -> Option<(Section, Transaction)> {
        self.entry.take().and_then(Entry::into_transaction)
    }
}

/// Parse page-annotated AMEX statement text into payments, credits and debits.
///
/// Never fails: unrecognised or incomplete fragments are skipped.
pub fn parse_amex_text(text: &str) -> ParsedStatement {
    let mut out = ParsedStatement::default();
    let mut scanner = Scanner::new();

    for line in text.lines() {
        if let Some((section, txn)) = scanner.feed(line) {
            out.push(section, txn);
        }
    }
    if let Some((section, txn)) = scanner.finish() {
        out.push(section, txn);
    }

    debug!(
        "parsed {} payments, {} credits, {} debits",
        out.payments.len(),
        out.credits.len(),
        out.debits.len()
    );
    out
}
