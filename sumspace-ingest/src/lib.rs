//! sumspace-ingest: statement text extraction seam and the AMEX PDF statement parser.

pub mod extract;
pub mod pages;
pub mod parsers;
pub mod summary;
pub mod types;

pub use extract::{ExtractError, Pdftotext, TextExtractor};
pub use parsers::amex_pdf::parse_amex_text;
pub use summary::StatementSummary;
pub use types::{ParsedStatement, Section, Transaction};
