//! Obtaining statement text from documents.
//!
//! The parser only ever sees text; turning a PDF into that text is somebody
//! else's job. [`TextExtractor`] is the seam, [`Pdftotext`] the stock adapter.

use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::pages::{join_pages, split_form_feeds};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0} not found on PATH")]
    NotFound(String),

    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed (exit {status}): {stderr}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("no text extracted from {}; scanned, encrypted or empty document?", .0.display())]
    Empty(PathBuf),
}

/// Produces page-annotated statement text (see [`crate::pages`]).
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Runs poppler's `pdftotext` and frames its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdftotext {
    pub command: String,
    /// Passed before the input path. `-layout` is opt-in: on two-column pages
    /// it can share a line between a section header and the other column.
    pub args: Vec<String>,
}

impl Default for Pdftotext {
    fn default() -> Self {
        Self {
            command: "pdftotext".to_string(),
            args: Vec::new(),
        }
    }
}

impl Pdftotext {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

impl TextExtractor for Pdftotext {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        which::which(&self.command).map_err(|_| ExtractError::NotFound(self.command.clone()))?;

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(path)
            .arg("-")
            .output()
            .map_err(|source| ExtractError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractError::Failed {
                command: self.command.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        if raw.trim().is_empty() {
            return Err(ExtractError::Empty(path.to_path_buf()));
        }

        let pages = split_form_feeds(&raw);
        debug!("{} pages extracted from {}", pages.len(), path.display());
        Ok(join_pages(pages))
    }
}
