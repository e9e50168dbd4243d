//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::zg01::protocol::MAX_INTER_BIT_GAP_TICKS;

/// Main configuration structure
///
/// Every field has a default, so a missing or partial file still yields a
/// working configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub decoder: DecoderConfig,
}

/// Capture serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Device path; empty means auto-detect across common paths
    #[serde(default)]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Decoder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DecoderConfig {
    /// Inter-bit gap threshold in timer ticks, above which the next bit
    /// starts a new frame
    #[serde(default = "default_max_gap_ticks")]
    pub max_gap_ticks: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_gap_ticks: default_max_gap_ticks(),
        }
    }
}

// Default value functions
fn default_baud_rate() -> u32 { 115_200 }
fn default_max_gap_ticks() -> u32 { MAX_INTER_BIT_GAP_TICKS }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.serial.baud_rate == 0 {
            return Err(crate::error::Zg01Error::Config(
                toml::de::Error::custom("serial baud_rate must be nonzero")
            ));
        }

        // An empty serial port means auto-detect, so it is always valid

        if self.decoder.max_gap_ticks == 0 {
            return Err(crate::error::Zg01Error::Config(
                toml::de::Error::custom("decoder max_gap_ticks must be at least 1")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.serial.port, "");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.decoder.max_gap_ticks, 3);
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            [serial]
            port = "/dev/ttyUSB3"
            baud_rate = 9600

            [decoder]
            max_gap_ticks = 5
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB3");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.decoder.max_gap_ticks, 5);
    }

    #[test]
    fn test_load_empty_file_yields_defaults() {
        let file = write_config("");

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.decoder.max_gap_ticks, 3);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let file = write_config(
            r#"
            [serial]
            port = "/dev/ttyACM1"
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyACM1");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.decoder.max_gap_ticks, 3);
    }

    #[test]
    fn test_zero_gap_threshold_fails_validation() {
        let file = write_config(
            r#"
            [decoder]
            max_gap_ticks = 0
            "#,
        );

        let result = Config::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_baud_rate_fails_validation() {
        let file = write_config(
            r#"
            [serial]
            baud_rate = 0
            "#,
        );

        let result = Config::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Config::load("/nonexistent/zg01-decoder.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let file = write_config("this is not toml [");
        let result = Config::load(file.path());
        assert!(result.is_err());
    }
}
