//! Configuration management for MarsLink tools

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use marslink_channel::fec::{CorrectionScheme, Corrector};
use marslink_core::params::ChannelParameters;
use marslink_core::timing::{TimingReport, MARS_MEAN_DISTANCE_KM};

use crate::common::{load_config, save_config};

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub message: String,
    pub distance_km: f64,
    /// Delay between delivered bits
    pub tick_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub channel: ChannelParameters,
    pub correction: CorrectionScheme,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            message: "Hello Mars".to_string(),
            distance_km: MARS_MEAN_DISTANCE_KM,
            tick_ms: 50,
            seed: None,
            channel: ChannelParameters::default(),
            correction: CorrectionScheme::Oracle,
        }
    }
}

impl SimConfig {
    /// Check every value the session would reject
    pub fn validate(&self) -> Result<()> {
        self.channel.validate().context("Invalid channel parameters")?;
        TimingReport::new(self.distance_km).context("Invalid distance")?;
        Corrector::new(self.correction, self.channel.correction_enabled)
            .context("Invalid correction scheme")?;
        Ok(())
    }

    /// Load configuration from a TOML or JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = load_config(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration; the extension picks JSON or TOML
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        save_config(self, path)
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }
}

/// Command line overrides applied on top of a [`SimConfig`]
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Message to transmit
    #[arg(short, long)]
    pub text: Option<String>,

    /// Read the message from a text file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Per-bit flip probability (0.0-1.0)
    #[arg(short = 'p', long)]
    pub error_probability: Option<f64>,

    /// Coupling parameter lambda
    #[arg(long, allow_negative_numbers = true)]
    pub lambda: Option<f64>,

    /// Coupling parameter kappa
    #[arg(long, allow_negative_numbers = true)]
    pub kappa: Option<f64>,

    /// Disable error correction
    #[arg(long)]
    pub no_correction: bool,

    /// Use an N-fold repetition code instead of oracle correction
    #[arg(long, value_name = "N")]
    pub repetition: Option<usize>,

    /// Link distance in km
    #[arg(long)]
    pub distance_km: Option<f64>,

    /// Delay between bits in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ConfigOverrides {
    /// Apply every override that was given
    pub fn apply(&self, config: &mut SimConfig) -> Result<()> {
        if let Some(text) = &self.text {
            config.message = text.clone();
        } else if let Some(file) = &self.file {
            config.message = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read message file: {:?}", file))?;
        }

        if let Some(p) = self.error_probability {
            config.channel.error_probability = p;
        }
        if let Some(lambda) = self.lambda {
            config.channel.lambda = lambda;
        }
        if let Some(kappa) = self.kappa {
            config.channel.kappa = kappa;
        }
        if self.no_correction {
            config.channel.correction_enabled = false;
        }
        if let Some(copies) = self.repetition {
            config.correction = CorrectionScheme::Repetition { copies };
        }
        if let Some(distance_km) = self.distance_km {
            config.distance_km = distance_km;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_config_toml_roundtrip() {
        let config = SimConfig {
            message: "Hi".to_string(),
            seed: Some(99),
            correction: CorrectionScheme::Repetition { copies: 5 },
            ..SimConfig::default()
        };

        let temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("kind = \"repetition\""));

        let loaded = SimConfig::from_file(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = SimConfig::default();
        let temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let loaded = SimConfig::from_file(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            "message = \"Olympus\"\n\n[channel]\nerror_probability = 0.2\n",
        )
        .unwrap();

        let loaded = SimConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.message, "Olympus");
        assert_eq!(loaded.channel.error_probability, 0.2);
        assert_eq!(loaded.channel.lambda, 1.0);
        assert_eq!(loaded.correction, CorrectionScheme::Oracle);
        assert_eq!(loaded.tick_ms, 50);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "[channel]\nerror_probability = 2.0\n").unwrap();
        assert!(SimConfig::from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = SimConfig::default();
        let overrides = ConfigOverrides {
            text: Some("Phobos".to_string()),
            error_probability: Some(0.5),
            kappa: Some(-0.2),
            no_correction: true,
            repetition: Some(3),
            seed: Some(4),
            ..ConfigOverrides::default()
        };

        overrides.apply(&mut config).unwrap();
        assert_eq!(config.message, "Phobos");
        assert_eq!(config.channel.error_probability, 0.5);
        assert_eq!(config.channel.kappa, -0.2);
        assert!(!config.channel.correction_enabled);
        assert_eq!(config.correction, CorrectionScheme::Repetition { copies: 3 });
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.distance_km, MARS_MEAN_DISTANCE_KM);
    }

    #[test]
    fn test_overrides_rejected_when_invalid() {
        let mut config = SimConfig::default();
        let overrides = ConfigOverrides {
            error_probability: Some(-0.1),
            ..ConfigOverrides::default()
        };
        assert!(overrides.apply(&mut config).is_err());
    }
}
