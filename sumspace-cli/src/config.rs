use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sumspace_ingest::Pdftotext;

use crate::output::Format;
use crate::state::{ensure_sumspace_home, sumspace_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorSection,
    pub output: OutputSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSection {
    /// PDF-to-text command (default: "pdftotext")
    pub command: String,
    /// Extra args placed before the input path
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: Format,
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// env_logger filter used when RUST_LOG is unset
    pub filter: String,
}

impl Default for ExtractorSection {
    fn default() -> Self {
        let stock = Pdftotext::default();
        Self {
            command: stock.command,
            args: stock.args,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: Format::Json,
            pretty: true,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn extractor(&self) -> Pdftotext {
        Pdftotext::new(self.extractor.command.clone(), self.extractor.args.clone())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(sumspace_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_sumspace_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[output]
format = "csv"

[extractor]
args = ["-layout"]
"#,
        )
        .unwrap();

        assert_eq!(cfg.output.format, Format::Csv);
        assert!(cfg.output.pretty);
        assert_eq!(cfg.extractor.command, "pdftotext");
        assert_eq!(cfg.extractor.args, vec!["-layout".to_string()]);
        assert!(Config::default().extractor.args.is_empty());
        assert_eq!(cfg.log.filter, "warn");
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let cfg = load_config_from(Path::new("/nonexistent/sumspace/config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
