//! Project configuration (sheetcut.yaml) parsing and validation.
//!
//! The config file defines where sheets are read from, how sprites are
//! detected and cleaned up, and how output files are named. Every field has
//! a default, so a missing or partial file merges cleanly with the built-in
//! configuration. Validation is fatal: the pipeline never runs with an
//! underspecified config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// The name of the config file.
pub const CONFIG_FILENAME: &str = "sheetcut.yaml";

/// Top-level configuration loaded from sheetcut.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Directory scanned for character sheet images in batch mode.
    pub input_dir: PathBuf,

    /// Directory where sprites and the asset manifest are written.
    pub output_dir: PathBuf,

    /// Output canvas size as [width, height] in pixels.
    pub sprite_size: [u32; 2],

    /// Padding added around each detected region before cropping.
    pub padding: u32,

    /// Grid detection settings.
    pub grid: GridDetection,

    /// Background removal settings.
    pub background: BackgroundRemoval,

    /// Sprite naming settings.
    pub naming: NamingConfig,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("sheets"),
            output_dir: PathBuf::from("assets"),
            sprite_size: [96, 96],
            padding: 5,
            grid: GridDetection::default(),
            background: BackgroundRemoval::default(),
            naming: NamingConfig::default(),
        }
    }
}

/// Grid detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDetection {
    /// Infer the grid from detected region positions. When false (or when
    /// inference disagrees with the candidate count), the manual grid is used.
    pub auto_detect: bool,

    /// Fallback row count.
    pub manual_rows: u32,

    /// Fallback column count.
    pub manual_cols: u32,

    /// Vertical distance (pixels) within which regions belong to one row.
    pub row_tolerance: u32,
}

impl Default for GridDetection {
    fn default() -> Self {
        Self {
            auto_detect: true,
            manual_rows: 4,
            manual_cols: 4,
            row_tolerance: 25,
        }
    }
}

/// Background removal method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalMethod {
    /// Key out pixels near a reference colour.
    ColorKey,
    /// Graduated transparency based on pixel whiteness.
    Graduated,
    /// External alpha matting. Not linked in this build; falls back to
    /// colour keying at startup.
    Matte,
}

/// Background removal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundRemoval {
    pub method: RemovalMethod,

    /// Reference background colour for colour keying and mask building.
    pub color_key: [u8; 3],

    /// Per-channel tolerance for colour keying (0-255).
    pub tolerance: u32,

    /// Whiteness below which pixels stay fully opaque (graduated method).
    pub graduated_low: u8,

    /// Whiteness at or above which pixels become fully transparent.
    pub graduated_high: u8,
}

impl Default for BackgroundRemoval {
    fn default() -> Self {
        Self {
            method: RemovalMethod::ColorKey,
            color_key: [255, 255, 255],
            tolerance: 30,
            graduated_low: 230,
            graduated_high: 245,
        }
    }
}

/// Sprite naming settings.
///
/// Either a built-in preset name, or explicit row/col label tables. Labels
/// are pure data: swapping a preset never changes extraction behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Built-in preset name (see `naming::NamingTable::preset`).
    /// Overrides `row_labels`/`col_labels` when set.
    pub preset: Option<String>,

    /// Label per grid row (e.g. animation action).
    pub row_labels: Vec<String>,

    /// Label per grid column (e.g. facing direction).
    pub col_labels: Vec<String>,

    /// Emit the column label before the row label.
    pub col_first: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            preset: None,
            row_labels: vec![
                "idle".to_string(),
                "walk".to_string(),
                "jump".to_string(),
                "fall".to_string(),
            ],
            col_labels: vec![
                "down".to_string(),
                "left".to_string(),
                "right".to_string(),
                "up".to_string(),
            ],
            col_first: false,
        }
    }
}

impl SliceConfig {
    /// Load configuration from a sheetcut.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SheetError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string and validate it.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| SheetError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.sprite_size[0] == 0 || self.sprite_size[1] == 0 {
            return Err(config_error(
                format!(
                    "sprite_size must be positive, got {}x{}",
                    self.sprite_size[0], self.sprite_size[1]
                ),
                "Set sprite_size to the output canvas dimensions, e.g. [96, 96]",
            ));
        }

        if self.grid.manual_rows == 0 || self.grid.manual_cols == 0 {
            return Err(config_error(
                format!(
                    "manual grid must be positive, got {} rows x {} cols",
                    self.grid.manual_rows, self.grid.manual_cols
                ),
                "manual_rows and manual_cols are the fallback when auto detection fails",
            ));
        }

        if self.grid.row_tolerance == 0 {
            return Err(config_error(
                "row_tolerance must be positive".to_string(),
                "Regions within this vertical distance are grouped into one row",
            ));
        }

        if self.background.tolerance > 255 {
            return Err(config_error(
                format!(
                    "background tolerance must be 0-255, got {}",
                    self.background.tolerance
                ),
                "Tolerance is a per-channel colour distance",
            ));
        }

        if self.background.graduated_low >= self.background.graduated_high {
            return Err(config_error(
                format!(
                    "graduated_low ({}) must be below graduated_high ({})",
                    self.background.graduated_low, self.background.graduated_high
                ),
                "Pixels between the two thresholds get partial transparency",
            ));
        }

        if self.naming.preset.is_none()
            && (self.naming.row_labels.is_empty() || self.naming.col_labels.is_empty())
        {
            return Err(config_error(
                "naming needs a preset or non-empty row_labels and col_labels".to_string(),
                "Try preset: frame-direction, or list labels explicitly",
            ));
        }

        Ok(())
    }
}

fn config_error(message: String, help: &str) -> SheetError {
    SheetError::Config {
        message,
        help: Some(help.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        SliceConfig::default().validate().unwrap();
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        // serde(default) on every level: an empty mapping is a full config
        let config = SliceConfig::parse("{}").unwrap();
        assert_eq!(config.sprite_size, [96, 96]);
        assert_eq!(config.grid.manual_rows, 4);
        assert_eq!(config.background.method, RemovalMethod::ColorKey);
    }

    #[test]
    fn test_parse_partial_overrides() {
        let yaml = r#"
sprite_size: [64, 64]
grid:
  auto_detect: false
  manual_rows: 2
  manual_cols: 8
background:
  method: graduated
"#;
        let config = SliceConfig::parse(yaml).unwrap();

        assert_eq!(config.sprite_size, [64, 64]);
        assert!(!config.grid.auto_detect);
        assert_eq!(config.grid.manual_rows, 2);
        assert_eq!(config.grid.manual_cols, 8);
        // Untouched sections keep defaults
        assert_eq!(config.grid.row_tolerance, 25);
        assert_eq!(config.background.method, RemovalMethod::Graduated);
        assert_eq!(config.background.color_key, [255, 255, 255]);
        assert_eq!(config.padding, 5);
    }

    #[test]
    fn test_zero_sprite_size_rejected() {
        let err = SliceConfig::parse("sprite_size: [0, 96]").unwrap_err();
        assert!(err.to_string().contains("sprite_size"));
    }

    #[test]
    fn test_zero_manual_grid_rejected() {
        let yaml = "grid:\n  manual_rows: 0\n";
        assert!(SliceConfig::parse(yaml).is_err());
    }

    #[test]
    fn test_excessive_tolerance_rejected() {
        let yaml = "background:\n  tolerance: 300\n";
        assert!(SliceConfig::parse(yaml).is_err());
    }

    #[test]
    fn test_inverted_graduated_thresholds_rejected() {
        let yaml = "background:\n  graduated_low: 250\n  graduated_high: 240\n";
        assert!(SliceConfig::parse(yaml).is_err());
    }

    #[test]
    fn test_custom_labels_without_preset() {
        let yaml = r#"
naming:
  row_labels: [stand, run]
  col_labels: [east, west]
  col_first: true
"#;
        let config = SliceConfig::parse(yaml).unwrap();
        assert_eq!(config.naming.row_labels, vec!["stand", "run"]);
        assert!(config.naming.col_first);
    }

    #[test]
    fn test_empty_labels_without_preset_rejected() {
        let yaml = "naming:\n  row_labels: []\n  col_labels: []\n";
        let parsed: SliceConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_matte_method_parses() {
        let config = SliceConfig::parse("background:\n  method: matte\n").unwrap();
        assert_eq!(config.background.method, RemovalMethod::Matte);
    }
}
