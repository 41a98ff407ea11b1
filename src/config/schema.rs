//! Configuration schema types for `hqscale.toml`
//!
//! Defines the structure and validation rules for scaler configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::{CHROMA_MAX, LUMA_MAX};
use crate::hqx::FilterOptions;
use crate::metric::YuvThreshold;

/// Filter settings (`[filter]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Luma difference threshold, in 1/16 luma steps
    #[serde(default = "default_luma_threshold")]
    pub luma_threshold: u16,
    /// Blue-difference threshold, in 1/4 chroma steps
    #[serde(default = "default_chroma_u_threshold")]
    pub chroma_u_threshold: u16,
    /// Red-difference threshold, in 1/4 chroma steps
    #[serde(default = "default_chroma_v_threshold")]
    pub chroma_v_threshold: u16,
    /// Filter rows on all cores
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            luma_threshold: default_luma_threshold(),
            chroma_u_threshold: default_chroma_u_threshold(),
            chroma_v_threshold: default_chroma_v_threshold(),
            parallel: true,
        }
    }
}

impl FilterConfig {
    pub fn threshold(&self) -> YuvThreshold {
        YuvThreshold::new(self.luma_threshold, self.chroma_u_threshold, self.chroma_v_threshold)
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions { parallel: self.parallel }
    }
}

fn default_luma_threshold() -> u16 {
    YuvThreshold::DEFAULT_LUMA
}

fn default_chroma_u_threshold() -> u16 {
    YuvThreshold::DEFAULT_CHROMA_U
}

fn default_chroma_v_threshold() -> u16 {
    YuvThreshold::DEFAULT_CHROMA_V
}

fn default_true() -> bool {
    true
}

/// Output settings (`[output]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Appended to the input stem when no explicit output is given
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Directory for outputs; next to each input when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { suffix: default_suffix(), dir: None }
    }
}

fn default_suffix() -> String {
    "_hq4x".to_string()
}

/// Complete `hqscale.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HqConfig {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "filter.luma_threshold")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hqscale.toml: '{}' {}", self.field, self.message)
    }
}

impl HqConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: String| {
            if !ok {
                errors.push(ConfigValidationError { field: field.to_string(), message });
            }
        };

        check(
            self.filter.luma_threshold <= LUMA_MAX,
            "filter.luma_threshold",
            format!("must be at most {}", LUMA_MAX),
        );
        check(
            self.filter.chroma_u_threshold <= CHROMA_MAX,
            "filter.chroma_u_threshold",
            format!("must be at most {}", CHROMA_MAX),
        );
        check(
            self.filter.chroma_v_threshold <= CHROMA_MAX,
            "filter.chroma_v_threshold",
            format!("must be at most {}", CHROMA_MAX),
        );
        check(!self.output.suffix.is_empty(), "output.suffix", "must be a non-empty string".to_string());
        check(
            !self.output.suffix.contains(['/', '\\']),
            "output.suffix",
            "must not contain path separators".to_string(),
        );

        errors
    }

    /// Check if the configuration is valid
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
