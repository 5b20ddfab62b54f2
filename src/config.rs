//! Configuration for the camera control tool.
//!
//! TOML-backed settings for exposure defaults, trigger pacing, and capture
//! storage, with load/save helpers and validation.

use crate::errors::MvCamError;
use crate::types::{AntiFlickerMode, ExposureSettings, WhiteBalanceMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MvCamConfig {
    pub exposure: ExposureConfig,
    pub trigger: TriggerConfig,
    pub storage: StorageConfig,
}

/// Exposure defaults applied after opening a camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Analog gain multiplier
    pub analog_gain: f32,
    /// White balance mode (off, once, continuous)
    pub white_balance: WhiteBalanceMode,
    /// Anti-flicker mode (off, 50hz, 60hz)
    pub anti_flicker: AntiFlickerMode,
    /// Exposure time in microseconds
    pub exposure_us: f64,
}

/// Software trigger pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Delay between trigger and exposure start, microseconds
    pub delay_us: f64,
    /// Interval between soft trigger shots, microseconds
    pub loop_interval_us: f64,
}

/// Storage and file naming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Output directory for captures
    pub output_directory: String,
    /// Prefix for generated file names
    pub file_prefix: String,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Embed a timestamp in generated file names
    pub timestamp_files: bool,
}

impl Default for MvCamConfig {
    fn default() -> Self {
        Self {
            exposure: ExposureConfig {
                analog_gain: 1.0,
                white_balance: WhiteBalanceMode::Off,
                anti_flicker: AntiFlickerMode::Off,
                exposure_us: 10_000.0,
            },
            trigger: TriggerConfig {
                delay_us: 0.0,
                loop_interval_us: 100_000.0,
            },
            storage: StorageConfig {
                output_directory: "./captures".to_string(),
                file_prefix: "mvcam".to_string(),
                jpeg_quality: 90,
                timestamp_files: true,
            },
        }
    }
}

impl ExposureConfig {
    /// The equivalent settings bundle for the control facade.
    pub fn settings(&self) -> ExposureSettings {
        ExposureSettings::new()
            .with_analog_gain(self.analog_gain)
            .with_white_balance(self.white_balance)
            .with_anti_flicker(self.anti_flicker)
            .with_exposure_us(self.exposure_us)
    }
}

impl TriggerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_us / 1_000_000.0)
    }

    pub fn loop_interval(&self) -> Duration {
        Duration::from_secs_f64(self.loop_interval_us / 1_000_000.0)
    }
}

impl MvCamConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MvCamError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            MvCamError::invalid_argument(format!("failed to read config file: {}", e))
        })?;

        let config: MvCamConfig = toml::from_str(&contents).map_err(|e| {
            MvCamError::invalid_argument(format!("failed to parse config file: {}", e))
        })?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MvCamError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MvCamError::invalid_argument(format!("failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| {
            MvCamError::invalid_argument(format!("failed to serialize config: {}", e))
        })?;

        fs::write(path, toml_string).map_err(|e| {
            MvCamError::invalid_argument(format!("failed to write config file: {}", e))
        })?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("mvcam.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.exposure.analog_gain.is_finite() || self.exposure.analog_gain <= 0.0 {
            return Err("Analog gain must be a positive number".to_string());
        }
        if !self.exposure.exposure_us.is_finite() || self.exposure.exposure_us <= 0.0 {
            return Err("Exposure time must be a positive number of microseconds".to_string());
        }

        if !self.trigger.delay_us.is_finite() || self.trigger.delay_us < 0.0 {
            return Err("Trigger delay must be zero or positive".to_string());
        }
        if !self.trigger.loop_interval_us.is_finite() || self.trigger.loop_interval_us <= 0.0 {
            return Err("Trigger loop interval must be positive".to_string());
        }

        if self.storage.jpeg_quality == 0 || self.storage.jpeg_quality > 100 {
            return Err("JPEG quality must be between 1 and 100".to_string());
        }
        if self.storage.output_directory.is_empty() {
            return Err("Output directory must not be empty".to_string());
        }
        if self.storage.file_prefix.is_empty() {
            return Err("File prefix must not be empty".to_string());
        }

        Ok(())
    }
}
