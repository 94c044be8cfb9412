//! Configuration types for layer generation.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so a
//! partial TOML file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`FormatConfig`] - Coordinate format digit counts.
//! - [`SoftwareConfig`] - Identity written into `.GenerationSoftware`.
//!
//! # Example
//!
//! ```
//! # use photoplot::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.format().coordinate_format().unwrap().render(), "26");
//! ```

use serde::Deserialize;

use photoplot_core::{Result, numeric::CoordinateFormat, types::Unit};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    format: FormatConfig,

    #[serde(default)]
    unit: Unit,

    #[serde(default)]
    software: SoftwareConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(format: FormatConfig, unit: Unit, software: SoftwareConfig) -> Self {
        Self {
            format,
            unit,
            software,
        }
    }

    pub fn format(&self) -> &FormatConfig {
        &self.format
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn software(&self) -> &SoftwareConfig {
        &self.software
    }
}

/// Digit counts of the coordinate format, identical for both axes.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_integer_digits")]
    integer_digits: u8,

    #[serde(default = "default_decimal_digits")]
    decimal_digits: u8,
}

fn default_integer_digits() -> u8 {
    2
}

fn default_decimal_digits() -> u8 {
    6
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            integer_digits: default_integer_digits(),
            decimal_digits: default_decimal_digits(),
        }
    }
}

impl FormatConfig {
    pub fn new(integer_digits: u8, decimal_digits: u8) -> Self {
        Self {
            integer_digits,
            decimal_digits,
        }
    }

    /// Validates the digit counts into a [`CoordinateFormat`].
    ///
    /// # Errors
    ///
    /// Returns [`photoplot_core::Error::Configuration`] if either count is out
    /// of range.
    pub fn coordinate_format(&self) -> Result<CoordinateFormat> {
        CoordinateFormat::new(self.integer_digits, self.decimal_digits)
    }
}

/// Vendor, application and version reported in every layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SoftwareConfig {
    vendor: String,
    application: String,
    version: String,
}

impl Default for SoftwareConfig {
    fn default() -> Self {
        Self {
            vendor: "Photoplot".to_string(),
            application: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl SoftwareConfig {
    pub fn new(
        vendor: impl Into<String>,
        application: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            application: application.into(),
            version: version.into(),
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use photoplot_core::Error;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.unit(), Unit::Inch);
        let format = config.format().coordinate_format().unwrap();
        assert_eq!(format.integer_digits(), 2);
        assert_eq!(format.decimal_digits(), 6);
        assert_eq!(config.software().application(), "photoplot");
    }

    #[test]
    fn test_out_of_range_format() {
        assert!(matches!(
            FormatConfig::new(2, 3).coordinate_format(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            FormatConfig::new(7, 6).coordinate_format(),
            Err(Error::Configuration(_))
        ));
    }
}
