//! Tunables for shadow fitting.
//!
//! Everything has a default matching the values the fitting was tuned with;
//! a JSON file only needs to name the fields it overrides:
//!
//! ```json
//! { "clip_tolerance": 0.02, "snap_texels": 2.0 }
//! ```

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clip::DEFAULT_CLIP_TOLERANCE;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    /// Corners farther than this (world units) outside a frustum plane are cut.
    pub clip_tolerance: f32,
    /// Quantization grid in shadow-map texels.
    pub snap_texels: f32,
    /// Also rescale the depth axis when fitting.
    pub tight_depth: bool,
    /// Clip volumes on the rayon pool once at least this many are registered.
    pub parallel_threshold: usize,
    /// Upper bound on the shadow distance regardless of volumes.
    pub maximum_distance: f32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            clip_tolerance: DEFAULT_CLIP_TOLERANCE,
            snap_texels: 1.0,
            tight_depth: false,
            parallel_threshold: 8,
            maximum_distance: f32::MAX,
        }
    }
}

/// Errors raised while loading a [`FitConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed fine but makes no sense.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl FitConfig {
    /// Read and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.clip_tolerance.is_finite() || self.clip_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "clip_tolerance must be finite and >= 0, got {}",
                self.clip_tolerance
            )));
        }
        if !(self.snap_texels > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "snap_texels must be > 0, got {}",
                self.snap_texels
            )));
        }
        if !(self.maximum_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "maximum_distance must be > 0, got {}",
                self.maximum_distance
            )));
        }
        Ok(())
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(FitConfig::from_json("{}").unwrap(), FitConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = FitConfig::from_json(r#"{ "clip_tolerance": 0.05, "tight_depth": true }"#).unwrap();
        assert_eq!(cfg.clip_tolerance, 0.05);
        assert!(cfg.tight_depth);
        assert_eq!(cfg.snap_texels, 1.0);
        assert_eq!(cfg.parallel_threshold, 8);
    }

    #[test]
    fn rejects_unknown_field() {
        let err = FitConfig::from_json(r#"{ "tolerance": 0.1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn rejects_nonsense_values() {
        for json in [
            r#"{ "clip_tolerance": -1.0 }"#,
            r#"{ "snap_texels": 0.0 }"#,
            r#"{ "maximum_distance": -5.0 }"#,
        ] {
            let err = FitConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{json}: got {err:?}");
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FitConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
