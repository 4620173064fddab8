use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$SUMSPACE_HOME`, falling back to `~/.sumspace`.
pub fn sumspace_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SUMSPACE_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".sumspace"))
}

pub fn ensure_sumspace_home() -> Result<PathBuf> {
    let dir = sumspace_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
