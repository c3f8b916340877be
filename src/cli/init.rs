//! Init command implementation.
//!
//! Generates a commented `sheetcut.yaml` with the default settings.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::CONFIG_FILENAME;
use crate::error::{Result, SheetError};
use crate::output::{display_path, Printer};

/// Initialize a sheetcut project by generating a sheetcut.yaml config
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing sheetcut.yaml
    #[arg(long)]
    pub force: bool,
}

/// Default config, hand-formatted so the generated file reads well.
const DEFAULT_CONFIG: &str = "\
# sheetcut configuration

input_dir: sheets
output_dir: assets

# Final canvas size for every sprite [width, height]
sprite_size: [96, 96]

# Extra pixels kept around each detected region
padding: 5

grid:
  # Infer rows/columns from the detected regions; the manual values
  # below are the fallback when inference fails
  auto_detect: true
  manual_rows: 4
  manual_cols: 4
  row_tolerance: 25

background:
  # color-key | graduated | matte
  method: color-key
  color_key: [255, 255, 255]
  tolerance: 30
  graduated_low: 230
  graduated_high: 245

naming:
  # Presets: frame-direction, direction-frame, rpg, frame-direction-alt.
  # Comment out `preset` to use the label lists below instead.
  preset: frame-direction
  row_labels: [idle, walk, jump, fall]
  col_labels: [down, left, right, up]
  col_first: false
";

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(SheetError::Config {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| SheetError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.success("Created", &display_path(&config_path));

    Ok(())
}
