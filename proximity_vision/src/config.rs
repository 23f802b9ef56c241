// THEORY:
// Settings live in a small TOML document so a tuned skin-tone range can be saved and
// reused across sessions and lighting setups. Every key is optional; anything left
// out falls back to the built-in defaults, so an empty file is a valid config.
//
//     [pipeline]
//     min_contour_area = 1500.0
//     history_length = 8
//
//     [pipeline.hsv_range]
//     lower = { h = 0, s = 40, v = 60 }
//     upper = { h = 25, s = 255, v = 255 }
//
//     [display]
//     fullscreen = false

use crate::error::Result;
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Presentation options for the live runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub window_title: String,
    pub fullscreen: bool,
    /// Flip frames horizontally so the preview behaves like a mirror.
    pub mirror: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            window_title: "Motion Detector".to_string(),
            fullscreen: true,
            mirror: true,
        }
    }
}

/// The top-level settings document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub display: DisplaySettings,
}

impl Settings {
    /// Parses and validates settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.pipeline.validate()?;
        Ok(settings)
    }

    /// Reads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::hsv::Hsv;
    use crate::error::VisionError;

    #[test]
    fn empty_document_gives_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.display.window_title, "Motion Detector");
        assert_eq!(settings.pipeline.min_contour_area, 1000.0);
        assert_eq!(settings.pipeline.zones.object_radius, 60);
    }

    #[test]
    fn partial_document_overrides_only_named_keys() {
        let text = r#"
            [pipeline]
            history_length = 8

            [pipeline.hsv_range]
            lower = { h = 0, s = 40, v = 60 }
            upper = { h = 25, s = 255, v = 255 }

            [pipeline.zones]
            warning_margin = 150

            [display]
            fullscreen = false
        "#;
        let settings = Settings::from_toml_str(text).unwrap();
        assert_eq!(settings.pipeline.history_length, 8);
        assert_eq!(settings.pipeline.hsv_range.lower, Hsv::new(0, 40, 60));
        assert_eq!(settings.pipeline.hsv_range.upper, Hsv::new(25, 255, 255));
        assert_eq!(settings.pipeline.zones.warning_margin, 150);
        assert_eq!(settings.pipeline.zones.danger_margin, 60);
        assert_eq!(settings.pipeline.morphology.kernel_size, 5);
        assert!(!settings.display.fullscreen);
        assert!(settings.display.mirror);
    }

    #[test]
    fn range_with_one_bound_keeps_the_other_default() {
        let text = "[pipeline.hsv_range]\nupper = { h = 25, s = 255, v = 255 }";
        let settings = Settings::from_toml_str(text).unwrap();
        assert_eq!(settings.pipeline.hsv_range.lower, Hsv::new(0, 48, 80));
        assert_eq!(settings.pipeline.hsv_range.upper, Hsv::new(25, 255, 255));
    }

    #[test]
    fn bound_with_missing_channels_fills_from_its_own_default() {
        let text = r#"
            [pipeline.hsv_range.lower]
            h = 5

            [pipeline.hsv_range.upper]
            v = 200
        "#;
        let settings = Settings::from_toml_str(text).unwrap();
        assert_eq!(settings.pipeline.hsv_range.lower, Hsv::new(5, 48, 80));
        assert_eq!(settings.pipeline.hsv_range.upper, Hsv::new(20, 255, 200));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = Settings::from_toml_str("[pipeline\nhistory_length = ").unwrap_err();
        assert!(matches!(err, VisionError::ConfigParse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Settings::from_toml_str("[pipeline.morphology]\nkernel_size = 0").unwrap_err();
        assert!(matches!(err, VisionError::InvalidConfig(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("proximity_vision_settings_that_do_not_exist.toml");
        assert!(matches!(Settings::load(path), Err(VisionError::Io(_))));
    }
}
