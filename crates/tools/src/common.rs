//! Common utilities and configuration for tools

use anyhow::{Context, Result};
use clap::Args;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Global configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize, Args)]
pub struct GlobalConfig {
    /// Configuration file path (TOML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

impl GlobalConfig {
    /// Maximum tracing level for these flags
    pub fn log_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::DEBUG
        } else if self.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

/// Progress reporter for long-running transmissions
pub struct ProgressReporter {
    total: usize,
    current: usize,
    last_percent: u8,
    verbose: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(total: usize, verbose: bool) -> Self {
        Self {
            total,
            current: 0,
            last_percent: 0,
            verbose,
        }
    }

    /// Update progress, printing each new tenth
    pub fn update(&mut self, current: usize) {
        self.current = current;

        if let Some(percent) = self.crossed_decile() {
            if self.verbose {
                println!("Progress: {}% ({}/{} bits)", percent, self.current, self.total);
            }
        }
    }

    /// Mark as complete
    pub fn complete(&mut self) {
        if self.verbose {
            println!("Complete: {}/{} (100%)", self.current, self.total);
        }
    }

    fn crossed_decile(&mut self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }

        let percent = ((self.current * 100) / self.total) as u8;
        let decile = percent - percent % 10;
        if decile > self.last_percent {
            self.last_percent = decile;
            Some(decile)
        } else {
            None
        }
    }
}

/// Print one delivered bit without a newline
pub fn print_bit(bit: u8, flipped: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if flipped {
        write!(stdout, "\x1b[31m{}\x1b[0m", bit)?;
    } else {
        write!(stdout, "{}", bit)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Initialize logging based on configuration
pub fn init_logging(config: &GlobalConfig) {
    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_target(false)
        .init();
}

/// Load configuration from file.
///
/// `.json` and `.toml` files are parsed in that format only; any other
/// extension is tried as JSON, then TOML.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).context("Invalid JSON configuration"),
        Some("toml") => toml::from_str(&content).context("Invalid TOML configuration"),
        _ => serde_json::from_str(&content)
            .or_else(|_| toml::from_str(&content))
            .with_context(|| format!("{} is neither JSON nor TOML", path.display())),
    }
}

/// Save configuration to file
pub fn save_config<T: Serialize>(config: &T, path: &Path) -> Result<()> {
    let content = if path.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        let mut config = GlobalConfig::default();
        assert_eq!(config.log_level(), tracing::Level::WARN);
        config.verbose = true;
        assert_eq!(config.log_level(), tracing::Level::INFO);
        config.debug = true;
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_progress_reporter() {
        let mut reporter = ProgressReporter::new(16, false);
        reporter.update(1);
        assert_eq!(reporter.current, 1);
        assert_eq!(reporter.last_percent, 0);

        reporter.update(8);
        assert_eq!(reporter.last_percent, 50);

        reporter.update(9);
        assert_eq!(reporter.last_percent, 50);

        reporter.update(16);
        assert_eq!(reporter.last_percent, 100);
        reporter.complete();
    }

    #[test]
    fn test_load_config_by_extension() {
        let global = GlobalConfig {
            config: None,
            verbose: true,
            debug: false,
        };
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("flags.json");
        save_config(&global, &json).unwrap();
        let loaded: GlobalConfig = load_config(&json).unwrap();
        assert!(loaded.verbose);

        // A .json file is never reinterpreted as TOML
        std::fs::write(&json, "verbose = true\ndebug = false\n").unwrap();
        assert!(load_config::<GlobalConfig>(&json).is_err());

        let bare = dir.path().join("flags");
        std::fs::write(&bare, "verbose = false\ndebug = true\n").unwrap();
        let loaded: GlobalConfig = load_config(&bare).unwrap();
        assert!(loaded.debug);
        assert!(!loaded.verbose);
    }

    #[test]
    fn test_progress_reporter_empty_total() {
        let mut reporter = ProgressReporter::new(0, true);
        reporter.update(0);
        assert_eq!(reporter.last_percent, 0);
    }
}
